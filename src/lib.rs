//! cinedex: full-text search and ranking over a movie catalog
//!
//! Records are turned into documents, appended to sealed index segments and
//! searched through immutable snapshots, so searches keep running while new
//! records are committed.
//!
//! ```
//! use cinedex::{EngineConfig, MovieIndexer, MovieRecord};
//!
//! let indexer = MovieIndexer::build(
//!     &[MovieRecord::new(1, "The Matrix").with_release_date("1999-03-31")],
//!     EngineConfig::default(),
//! )?;
//! assert_eq!(indexer.search("matrix")?[0].id, 1);
//! assert_eq!(indexer.search_by_year("1999")?.len(), 1);
//! # Ok::<(), cinedex::CinedexError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod models;
pub mod query;
pub mod segment;
pub mod source;
pub mod tokenizer;

pub use config::{AnalyzerConfig, EngineConfig, FieldBoosts, QueryConfig, ScoringConfig};
pub use engine::{MovieIndexer, SearchEvent, SearchService, TaskHandle};
pub use error::{CinedexError, Result};
pub use models::*;
pub use query::SearchRequest;
pub use source::{JsonFileSource, RecordSource, VecSource};
pub use tokenizer::Analyzer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
