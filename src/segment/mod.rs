//! Segment-based inverted index for full-text search
//!
//! # Architecture
//!
//! - `MutableBuffer`: private in-memory buffer of an open writer
//! - `SegmentWriter`: seals a buffer into an immutable segment
//! - `SegmentReader`: immutable per-field FST dictionaries, postings and stored rows
//! - `SegmentManifest`: index state (live segments and counters)
//! - `MovieIndex`: writer lock plus the atomically published `Snapshot`

mod types;
mod buffer;
mod term_dict;
mod reader;
mod writer;
mod manifest;
mod index;

pub use types::*;
pub use buffer::*;
pub use term_dict::*;
pub use reader::*;
pub use writer::SegmentWriter;
pub use manifest::*;
pub use index::*;
