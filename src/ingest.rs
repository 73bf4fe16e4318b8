//! Incremental ingestion from a remote metadata provider
//!
//! The provider itself (HTTP client, API keys) lives outside the crate; this
//! module only describes its pull operations and turns one page of results
//! into complete records. Scheduling repeated fetches is the caller's job.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::MovieIndexer;
use crate::error::Result;
use crate::models::{MovieRecord, RecordId};
use crate::segment::CommitInfo;

/// Credited cast member
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
}

/// Genre as reported by the provider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: u64,
    pub name: String,
}

/// Per-movie details
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Pull operations of a movie metadata provider
///
/// Implementations report failures as `CinedexError::Provider`.
pub trait MetadataProvider {
    /// One page of popular movies; actors and genres may be empty
    fn popular_page(&self, page: u32) -> Result<Vec<MovieRecord>>;

    fn cast(&self, id: RecordId) -> Result<Vec<CastMember>>;

    fn details(&self, id: RecordId) -> Result<MovieDetails>;
}

/// Fetch one page and fill in each movie's actors and genres
pub fn assemble_page<P: MetadataProvider + ?Sized>(
    provider: &P,
    page: u32,
) -> Result<Vec<MovieRecord>> {
    let mut records = provider.popular_page(page)?;
    debug!(page, movies = records.len(), "Fetched provider page");

    for record in &mut records {
        record.actors = provider
            .cast(record.id)?
            .into_iter()
            .map(|c| c.name)
            .collect();
        record.genres = provider
            .details(record.id)?
            .genres
            .into_iter()
            .map(|g| g.name)
            .collect();
    }
    Ok(records)
}

/// Tracks which provider page was fetched last
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    last_page: u32,
}

impl PageCursor {
    pub fn new(last_page: u32) -> Self {
        Self { last_page }
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    pub fn next_page(&self) -> u32 {
        self.last_page + 1
    }

    /// Record that `page` was fetched
    pub fn advance(&mut self, page: u32) {
        self.last_page = page;
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self { last_page: 1 }
    }
}

/// Fetch the page after the cursor, index it and move the cursor
///
/// The cursor only moves once the page is committed, so a failed fetch is
/// retried from the same page next time.
pub fn ingest_next_page<P: MetadataProvider + ?Sized>(
    provider: &P,
    cursor: &mut PageCursor,
    indexer: &MovieIndexer,
) -> Result<Option<CommitInfo>> {
    let page = cursor.next_page();
    let records = assemble_page(provider, page)?;
    let commit = indexer.add_documents(&records)?;
    cursor.advance(page);
    info!(
        page,
        movies = records.len(),
        total_docs = indexer.doc_count(),
        "Ingested provider page"
    );
    Ok(commit)
}
