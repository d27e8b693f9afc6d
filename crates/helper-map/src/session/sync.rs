/*
[INPUT]:  Coordinate + resolution generation
[OUTPUT]: Task index and annotations rebuilt from /api/nearby, mirrored to the assistant store
[POS]:    Session layer - nearby task synchronization
[UPDATE]: When changing replacement semantics or the publish step
*/

use helper_map_adapter::Coordinate;
use tracing::{debug, error, info, warn};

use super::MapSession;
use crate::map_view::MapView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Index and annotations now hold exactly the fetched tasks.
    Rendered { count: usize, published: bool },
    /// The lookup failed; the previous task set was cleared.
    FetchFailed,
    /// A newer resolution started while this one was in flight.
    Superseded,
}

impl<V: MapView> MapSession<V> {
    pub(super) async fn sync(&self, at: Coordinate, generation: u64) -> SyncOutcome {
        let result = self.client.nearby(at).await;

        let rendered = {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                debug!(generation, current = state.generation, "dropping superseded nearby result");
                return SyncOutcome::Superseded;
            }

            state.clear_tasks();
            match result {
                Ok(response) => {
                    for task in response.tasks {
                        state.insert_task(task, at);
                    }
                }
                Err(err) => {
                    error!(error = %err, network = err.is_network(), lat = at.latitude, lng = at.longitude, "error fetching nearby tasks");
                    return SyncOutcome::FetchFailed;
                }
            }
            let tasks: Vec<_> = state.index.values().cloned().collect();
            tasks
        };

        info!(count = rendered.len(), generation, "nearby tasks rendered");

        let published = match self.client.store_available_tasks(&rendered).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to publish available tasks");
                false
            }
        };

        SyncOutcome::Rendered {
            count: rendered.len(),
            published,
        }
    }
}
