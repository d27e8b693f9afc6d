/*
[INPUT]:  Resolved locations, nearby task sets, user accept/highlight actions
[OUTPUT]: Map view kept in lockstep with the in-memory task index
[POS]:    Session layer - owns all mutable map state for one page lifetime
[UPDATE]: When changing what the session owns or how resolutions are applied
*/

mod accept;
mod sync;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use helper_map_adapter::{Coordinate, HelperClient, Task};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::DefaultView;
use crate::highlight::{HighlightHandler, HighlightOutcome};
use crate::location::{GeolocationSource, LocationResolver, LocationSource, ResolveError, Resolution};
use crate::map_view::{Annotation, CenterMode, MapView};
use crate::storage::LocalStorage;

pub use accept::{AcceptError, AcceptOutcome, ACCEPT_FAILED_MESSAGE, TASK_NOT_FOUND_MESSAGE};
pub use sync::SyncOutcome;

/// State of one map page: current location, task index and the view that
/// renders it.
///
/// Every id in the index has exactly one annotation in the view and vice
/// versa; both are only changed together under the state lock.
pub struct MapSession<V> {
    client: HelperClient,
    storage: Arc<LocalStorage>,
    default_view: DefaultView,
    state: Mutex<SessionState<V>>,
}

struct SessionState<V> {
    view: V,
    location: Option<Coordinate>,
    index: BTreeMap<i64, Task>,
    /// Bumped on every resolution; nearby results from older ones are dropped.
    generation: u64,
    /// Bumped whenever the index is rebuilt. Ids repeat across task sets.
    task_set: u64,
    in_flight: HashSet<(u64, i64)>,
}

impl<V: MapView> SessionState<V> {
    fn insert_task(&mut self, task: Task, origin: Coordinate) {
        if self.index.contains_key(&task.id) {
            self.view.remove_annotation(task.id);
        }
        self.view.add_annotation(Annotation::for_task(&task, origin));
        self.index.insert(task.id, task);
    }

    fn remove_task(&mut self, task_id: i64) -> Option<Task> {
        let task = self.index.remove(&task_id)?;
        self.view.remove_annotation(task_id);
        Some(task)
    }

    fn clear_tasks(&mut self) {
        let ids: Vec<i64> = self.index.keys().copied().collect();
        for id in ids {
            self.remove_task(id);
        }
        self.task_set += 1;
    }
}

impl<V: MapView> MapSession<V> {
    pub fn new(
        client: HelperClient,
        storage: Arc<LocalStorage>,
        view: V,
        default_view: DefaultView,
    ) -> Self {
        Self {
            client,
            storage,
            default_view,
            state: Mutex::new(SessionState {
                view,
                location: None,
                index: BTreeMap::new(),
                generation: 0,
                task_set: 0,
                in_flight: HashSet::new(),
            }),
        }
    }

    /// Resolve the user's location and render the tasks around it.
    ///
    /// Returns the resolved coordinate, or `None` when the default view is shown.
    pub async fn start<G: GeolocationSource>(
        &self,
        resolver: &LocationResolver<G>,
    ) -> Option<Coordinate> {
        match resolver.resolve().await {
            Ok(resolution) => {
                self.on_location_found(resolution).await;
                Some(resolution.coordinate)
            }
            Err(err) => {
                self.on_location_error(&err).await;
                None
            }
        }
    }

    /// Apply a resolved location: cache it, center on it, render nearby tasks.
    ///
    /// A later call is a location update and replaces the previous task set.
    pub async fn on_location_found(&self, resolution: Resolution) -> SyncOutcome {
        let at = resolution.coordinate;
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.location = Some(at);
            // Written under the lock so the cache follows resolution order.
            if let Err(err) = self.storage.set_user_location(at).await {
                warn!(error = %err, "failed to cache user location");
            }
            let mode = match resolution.source {
                LocationSource::Live => CenterMode::Force,
                LocationSource::Fallback => CenterMode::Soft,
            };
            state.view.set_view(at, self.default_view.zoom, mode);
            state.view.place_user_marker(at);
            state.generation
        };

        info!(
            lat = at.latitude,
            lng = at.longitude,
            source = ?resolution.source,
            generation,
            "location applied"
        );
        self.sync(at, generation).await
    }

    /// Neither live nor coarse location is available: show the default view.
    pub async fn on_location_error(&self, err: &ResolveError) {
        warn!(error = %err, "location unavailable; showing default view");
        let mut state = self.state.lock().await;
        state.view.notify(&err.to_string());
        state.view.set_view(
            self.default_view.center(),
            self.default_view.zoom,
            CenterMode::Force,
        );
    }

    /// Re-fetch the tasks around the current location.
    pub async fn refresh(&self) -> Option<SyncOutcome> {
        let (at, generation) = {
            let mut state = self.state.lock().await;
            let at = state.location?;
            state.generation += 1;
            (at, state.generation)
        };
        Some(self.sync(at, generation).await)
    }

    pub async fn location(&self) -> Option<Coordinate> {
        self.state.lock().await.location
    }

    pub async fn task_ids(&self) -> Vec<i64> {
        self.state.lock().await.index.keys().copied().collect()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.index.values().cloned().collect()
    }

    /// Read the view while holding the state lock.
    pub async fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        let state = self.state.lock().await;
        f(&state.view)
    }

    /// Center on a task's annotation and open its popup.
    pub async fn highlight_task(&self, task_id: i64) -> HighlightOutcome {
        let mut state = self.state.lock().await;
        let Some(position) = state.index.get(&task_id).map(Task::coordinate) else {
            return HighlightOutcome::NotFound;
        };
        state
            .view
            .set_view(position, self.default_view.zoom, CenterMode::Soft);
        state.view.open_popup(task_id);
        HighlightOutcome::Highlighted
    }
}

#[async_trait]
impl<V: MapView + 'static> HighlightHandler for MapSession<V> {
    async fn highlight(&self, task_id: i64) -> HighlightOutcome {
        self.highlight_task(task_id).await
    }
}

impl<V> std::fmt::Debug for MapSession<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSession")
            .field("base_url", &self.client.base_url().as_str())
            .field("storage", &self.storage.path())
            .finish_non_exhaustive()
    }
}
