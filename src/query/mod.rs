//! Query construction, scoring and ranking
//!
//! - `QueryBuilder` turns a `SearchRequest` into a `Query` tree
//! - `Scorer` evaluates a tree against a `Snapshot`
//! - `Searcher` keeps the best N documents
//! - `Materializer` rebuilds `MovieResult`s from stored values

pub mod ast;
pub mod builder;
pub mod fuzzy;
pub mod materializer;
pub mod scorer;
pub mod searcher;

pub use ast::{Clause, Occur, Query};
pub use builder::{QueryBuilder, SearchRequest};
pub use materializer::Materializer;
pub use scorer::{ScoreMap, Scorer};
pub use searcher::{ScoredDoc, Searcher};
