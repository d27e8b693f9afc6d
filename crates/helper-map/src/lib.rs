/*
[INPUT]:  Public API exports for the helper-map crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod distance;
pub mod highlight;
pub mod location;
pub mod map_view;
pub mod my_tasks;
pub mod session;
pub mod storage;

// Re-export main types for convenience
pub use config::{DefaultView, MapConfig};
pub use highlight::{HighlightBus, HighlightOutcome};
pub use location::{LocationResolver, StaticGeolocation};
pub use map_view::{Annotation, MapView, MemoryMap};
pub use session::MapSession;
pub use storage::LocalStorage;
