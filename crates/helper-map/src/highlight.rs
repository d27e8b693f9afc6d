/*
[INPUT]:  Task ids from the assistant component
[OUTPUT]: Highlight requests forwarded to the registered map, or a loading placeholder
[POS]:    Integration seam - typed replacement for a global highlight callback
[UPDATE]: When changing the highlight contract or placeholder behavior
*/

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Shown while no map has registered a handler yet.
pub const MAP_LOADING_MESSAGE: &str = "The map is still loading, please try again in a moment.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightOutcome {
    Highlighted,
    NotFound,
    MapLoading,
}

/// Something that can bring a task's annotation into focus.
#[async_trait]
pub trait HighlightHandler: Send + Sync {
    async fn highlight(&self, task_id: i64) -> HighlightOutcome;
}

type Placeholder = Arc<dyn Fn(&str) + Send + Sync>;

/// Routes `highlight(task_id)` calls to the map once one is registered.
///
/// Usable before the map exists; early calls hit the placeholder.
#[derive(Clone)]
pub struct HighlightBus {
    handler: Arc<RwLock<Option<Arc<dyn HighlightHandler>>>>,
    placeholder: Placeholder,
}

impl HighlightBus {
    pub fn new() -> Self {
        Self::with_placeholder(|message| info!("{message}"))
    }

    /// Use `placeholder` to tell the user the map is not ready.
    pub fn with_placeholder(placeholder: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(RwLock::new(None)),
            placeholder: Arc::new(placeholder),
        }
    }

    pub async fn register(&self, handler: Arc<dyn HighlightHandler>) {
        *self.handler.write().await = Some(handler);
        debug!("highlight handler registered");
    }

    pub async fn unregister(&self) {
        self.handler.write().await.take();
    }

    pub async fn highlight(&self, task_id: i64) -> HighlightOutcome {
        let handler = self.handler.read().await.clone();
        match handler {
            Some(handler) => handler.highlight(task_id).await,
            None => {
                (self.placeholder)(MAP_LOADING_MESSAGE);
                HighlightOutcome::MapLoading
            }
        }
    }
}

impl Default for HighlightBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HighlightBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightBus").finish_non_exhaustive()
    }
}
