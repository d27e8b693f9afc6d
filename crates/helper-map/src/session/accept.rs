/*
[INPUT]:  Task id chosen by the user
[OUTPUT]: Accept request; annotation and index entry removed once the backend answers
[POS]:    Session layer - task acceptance flow
[UPDATE]: When changing acceptance semantics or the in-flight guard
*/

use helper_map_adapter::{AcceptTaskRequest, HelperError};
use thiserror::Error;
use tracing::{error, info, warn};

use super::MapSession;
use crate::map_view::MapView;

pub const TASK_NOT_FOUND_MESSAGE: &str = "Error: Task details not found.";
pub const ACCEPT_FAILED_MESSAGE: &str = "Error accepting task";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// Backend answered; the task left the map. `status` is informational.
    Accepted { status: u16 },
    /// A submission for this id is still pending; nothing was sent.
    AlreadyInFlight,
}

#[derive(Debug, Error)]
pub enum AcceptError {
    #[error("task {0} is not on the map")]
    NotFound(i64),

    #[error("accept request failed: {0}")]
    Request(#[source] HelperError),
}

impl AcceptError {
    /// The request never got an HTTP response; trying again may help.
    pub fn is_network(&self) -> bool {
        matches!(self, AcceptError::Request(err) if err.is_network())
    }
}

impl<V: MapView> MapSession<V> {
    /// Accept one task from the current index.
    ///
    /// The task leaves the map only if the index still holds the same task
    /// when the backend answers.
    pub async fn accept_task(&self, task_id: i64) -> Result<AcceptOutcome, AcceptError> {
        let (task, key) = {
            let mut state = self.state.lock().await;
            let Some(task) = state.index.get(&task_id).cloned() else {
                state.view.notify(TASK_NOT_FOUND_MESSAGE);
                return Err(AcceptError::NotFound(task_id));
            };
            let key = (state.task_set, task_id);
            if !state.in_flight.insert(key) {
                info!(task_id, "accept already in flight");
                return Ok(AcceptOutcome::AlreadyInFlight);
            }
            (task, key)
        };

        let result = self.client.accept_task(&AcceptTaskRequest::from(&task)).await;

        let mut state = self.state.lock().await;
        state.in_flight.remove(&key);
        match result {
            Ok(ack) => {
                let status = ack.status.as_u16();
                if !ack.status.is_success() {
                    // Any JSON answer removes the task; the status is only logged.
                    warn!(task_id, status, body = %ack.body, "accept answered with error status");
                }
                if state.index.get(&task_id) == Some(&task) {
                    state.view.close_popup();
                    state.remove_task(task_id);
                    info!(task_id, status, "task accepted");
                } else {
                    info!(task_id, status, "task accepted after the task set was replaced");
                }
                Ok(AcceptOutcome::Accepted { status })
            }
            Err(err) => {
                error!(task_id, error = %err, network = err.is_network(), "error accepting task");
                state.view.notify(ACCEPT_FAILED_MESSAGE);
                Err(AcceptError::Request(err))
            }
        }
    }
}
