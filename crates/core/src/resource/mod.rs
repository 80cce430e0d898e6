//! Dataset loading and collection.

/// Paginated crawler producing local game snapshots.
pub mod collector;
/// Dataset sources, HTTP/file loading, and the in-memory catalog.
pub mod loader;

pub use collector::{CollectEvent, Collected, GameCollector, GamePage};
pub use loader::{Catalog, DatasetLoader, DatasetSource};
