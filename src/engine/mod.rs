//! Indexer facade and background service

mod events;
mod indexer;
mod service;

pub use events::SearchEvent;
pub use indexer::MovieIndexer;
pub use service::{SearchService, TaskHandle};
