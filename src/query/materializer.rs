//! Rebuilds result records from stored field values

use super::searcher::ScoredDoc;
use crate::error::{CinedexError, Result};
use crate::models::{fields, MovieResult};
use crate::segment::{Snapshot, StoredFields};

/// Projects ranked documents into `MovieResult`s
pub struct Materializer<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Materializer<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Materialize ranked documents, preserving order
    pub fn materialize(&self, docs: &[ScoredDoc]) -> Result<Vec<MovieResult>> {
        docs.iter()
            .map(|scored| {
                let segment = self.snapshot.segment_for(scored.doc).ok_or_else(|| {
                    CinedexError::InternalInvariant(format!(
                        "doc {} is not owned by any segment of generation {}",
                        scored.doc,
                        self.snapshot.generation()
                    ))
                })?;
                let row = segment.stored(scored.doc).ok_or_else(|| {
                    CinedexError::InternalInvariant(format!(
                        "doc {} has no stored row in {}",
                        scored.doc,
                        segment.id()
                    ))
                })?;
                Ok(project(row))
            })
            .collect()
    }
}

fn project(row: &StoredFields) -> MovieResult {
    let text = |name: &str| row.get(name).cloned().unwrap_or_default();
    MovieResult {
        id: row
            .get(fields::ID)
            .and_then(|id| id.parse().ok())
            .unwrap_or(0),
        title: text(fields::TITLE),
        overview: text(fields::OVERVIEW),
        release_date: text(fields::RELEASE_DATE_FULL),
        actors: split_list(row.get(fields::ACTORS)),
        genres: split_list(row.get(fields::GENRES)),
        poster_path: None,
    }
}

/// Split a stored list field; absent or blank means no entries
fn split_list(value: Option<&String>) -> Vec<String> {
    match value {
        Some(v) if !v.trim().is_empty() => v
            .split(fields::LIST_SEPARATOR)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
