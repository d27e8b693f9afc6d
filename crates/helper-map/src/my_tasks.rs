/*
[INPUT]:  /api/my_tasks, cached user location
[OUTPUT]: Accepted task cards with distances; task deletion
[POS]:    Sibling view - accepted task list reading the shared location cache
[UPDATE]: When changing card contents or the list endpoints
*/

use std::sync::Arc;

use helper_map_adapter::{AcceptedTask, Coordinate, HelperClient, HelperError};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info};

use crate::distance::haversine_km;
use crate::storage::LocalStorage;

pub const NO_TASKS_MESSAGE: &str = "No accepted tasks yet.";
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this task?";

#[derive(Debug, Error)]
pub enum ListError {
    #[error("Error fetching tasks: {0}")]
    Fetch(#[source] HelperError),

    #[error("Error deleting task: {0}")]
    Delete(#[source] HelperError),
}

/// One rendered row of the accepted task list.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCard {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub description: String,
    pub reward: Decimal,
    /// "Distance: X km" when the user location is cached, raw coordinates otherwise.
    pub location_line: String,
}

impl TaskCard {
    pub fn new(task: &AcceptedTask, user_location: Option<Coordinate>) -> Self {
        let location_line = match user_location {
            Some(origin) => format!(
                "Distance: {:.2} km",
                haversine_km(origin, task.coordinate())
            ),
            None => format!("Location: {:.4}, {:.4}", task.lat, task.lng),
        };

        Self {
            id: task.id,
            title: task.title.clone(),
            status: task.status.clone(),
            description: task.description.clone(),
            reward: task.reward,
            location_line,
        }
    }
}

pub fn render_cards(cards: &[TaskCard]) -> String {
    if cards.is_empty() {
        return NO_TASKS_MESSAGE.to_string();
    }

    cards
        .iter()
        .map(|card| {
            format!(
                "#{} {} [{}]\n  {}\n  Reward: ${}  {}",
                card.id, card.title, card.status, card.description, card.reward, card.location_line
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accepted task list view.
#[derive(Debug)]
pub struct AcceptedTaskList {
    client: HelperClient,
    storage: Arc<LocalStorage>,
}

impl AcceptedTaskList {
    pub fn new(client: HelperClient, storage: Arc<LocalStorage>) -> Self {
        Self { client, storage }
    }

    pub async fn load(&self) -> Result<Vec<TaskCard>, ListError> {
        let user_location = self.storage.user_location().await;
        let response = self.client.my_tasks().await.map_err(|err| {
            error!(error = %err, "error fetching tasks");
            ListError::Fetch(err)
        })?;

        Ok(response
            .tasks
            .iter()
            .map(|task| TaskCard::new(task, user_location))
            .collect())
    }

    pub async fn delete(&self, task_id: i64) -> Result<(), ListError> {
        self.client
            .delete_task(task_id)
            .await
            .map_err(ListError::Delete)?;
        info!(task_id, "accepted task deleted");
        Ok(())
    }
}
