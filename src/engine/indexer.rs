//! Indexer facade owning one movie index

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{CinedexError, Result};
use crate::models::{DocumentBuilder, MovieRecord, MovieResult};
use crate::query::{Materializer, QueryBuilder, ScoredDoc, SearchRequest, Searcher};
use crate::segment::{CommitInfo, MovieIndex, SegmentManifest, Snapshot};
use crate::source::RecordSource;
use crate::tokenizer::Analyzer;

/// Builds, extends and searches one movie index
///
/// Share it between threads through `Arc<MovieIndexer>`; searches and
/// `add_documents` may run concurrently.
pub struct MovieIndexer {
    index: MovieIndex,
    documents: DocumentBuilder,
    queries: QueryBuilder,
    config: EngineConfig,
}

impl MovieIndexer {
    /// Create an indexer over an empty index
    pub fn new(config: EngineConfig) -> Self {
        let analyzer = Analyzer::new(&config.analyzer);
        Self {
            index: MovieIndex::new(analyzer.clone()),
            documents: DocumentBuilder::new(analyzer.clone()),
            queries: QueryBuilder::new(analyzer, config.query.clone()),
            config,
        }
    }

    /// Build an index from an initial record collection
    ///
    /// Returns once the records are committed and searchable.
    pub fn build(records: &[MovieRecord], config: EngineConfig) -> Result<Self> {
        let indexer = Self::new(config);
        indexer.add_documents(records)?;
        info!(docs = indexer.doc_count(), "Built movie index");
        Ok(indexer)
    }

    /// Build an index from a record source
    pub fn from_source(source: &dyn RecordSource, config: EngineConfig) -> Result<Self> {
        let records = source.load_records().map_err(|e| match e {
            CinedexError::SourceRead(_) => e,
            other => CinedexError::SourceRead(other.to_string()),
        })?;
        Self::build(&records, config)
    }

    /// Append records and publish them in one new segment
    ///
    /// Earlier segments are left untouched. Returns `None` for an empty slice.
    pub fn add_documents(&self, records: &[MovieRecord]) -> Result<Option<CommitInfo>> {
        let mut writer = self.index.writer();
        for record in records {
            writer.add(&self.documents.build(record));
        }
        writer.commit()
    }

    pub fn search(&self, query: &str) -> Result<Vec<MovieResult>> {
        self.search_with_limit(query, self.config.default_limit)
    }

    pub fn search_with_limit(&self, query: &str, limit: usize) -> Result<Vec<MovieResult>> {
        self.execute(&SearchRequest::boosted(query), limit)
    }

    pub fn search_without_boost(&self, query: &str) -> Result<Vec<MovieResult>> {
        self.search_without_boost_with_limit(query, self.config.default_limit)
    }

    pub fn search_without_boost_with_limit(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MovieResult>> {
        self.execute(&SearchRequest::unboosted(query), limit)
    }

    pub fn search_by_year(&self, year: &str) -> Result<Vec<MovieResult>> {
        self.search_by_year_with_limit(year, self.config.default_limit)
    }

    pub fn search_by_year_with_limit(&self, year: &str, limit: usize) -> Result<Vec<MovieResult>> {
        self.execute(&SearchRequest::year(year), limit)
    }

    pub fn search_with_genres<S: AsRef<str>>(
        &self,
        query: &str,
        genres: &[S],
    ) -> Result<Vec<MovieResult>> {
        self.search_with_genres_with_limit(query, genres, self.config.default_limit)
    }

    pub fn search_with_genres_with_limit<S: AsRef<str>>(
        &self,
        query: &str,
        genres: &[S],
        limit: usize,
    ) -> Result<Vec<MovieResult>> {
        let request = SearchRequest::genres(query, genres.iter().map(|g| g.as_ref()));
        self.execute(&request, limit)
    }

    /// Boosted search that reports malformed input instead of recovering it
    pub fn try_search(&self, query: &str) -> Result<Vec<MovieResult>> {
        self.try_execute(&SearchRequest::boosted(query), self.config.default_limit)
    }

    /// Genre search that reports malformed input instead of recovering it
    pub fn try_search_with_genres<S: AsRef<str>>(
        &self,
        query: &str,
        genres: &[S],
    ) -> Result<Vec<MovieResult>> {
        let request = SearchRequest::genres(query, genres.iter().map(|g| g.as_ref()));
        self.try_execute(&request, self.config.default_limit)
    }

    /// Run a request, turning malformed input into an empty result set
    pub fn execute(&self, request: &SearchRequest, limit: usize) -> Result<Vec<MovieResult>> {
        match self.try_execute(request, limit) {
            Err(CinedexError::InvalidQuery(reason)) => {
                warn!(mode = request.mode(), %reason, "Ignoring invalid query");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Run a request against the current snapshot
    pub fn try_execute(&self, request: &SearchRequest, limit: usize) -> Result<Vec<MovieResult>> {
        let snapshot = self.index.snapshot();
        let ranked = self.rank_in(&snapshot, request, limit)?;
        Materializer::new(&snapshot).materialize(&ranked)
    }

    /// Ranked document numbers and scores for a request
    pub fn rank(&self, request: &SearchRequest, limit: usize) -> Result<Vec<ScoredDoc>> {
        self.rank_in(&self.index.snapshot(), request, limit)
    }

    fn rank_in(
        &self,
        snapshot: &Arc<Snapshot>,
        request: &SearchRequest,
        limit: usize,
    ) -> Result<Vec<ScoredDoc>> {
        let Some(query) = self.queries.build(request)? else {
            return Ok(Vec::new());
        };
        let ranked = Searcher::new(Arc::clone(snapshot), &self.config.scoring).search(&query, limit);
        debug!(
            mode = request.mode(),
            generation = snapshot.generation(),
            hits = ranked.len(),
            "Search complete"
        );
        Ok(ranked)
    }

    /// Current snapshot, for callers that want several consistent reads
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.index.snapshot()
    }

    pub fn manifest(&self) -> SegmentManifest {
        self.index.snapshot().manifest().clone()
    }

    pub fn generation(&self) -> u64 {
        self.index.generation()
    }

    pub fn doc_count(&self) -> u64 {
        self.index.doc_count()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl std::fmt::Debug for MovieIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieIndexer")
            .field("index", &self.index)
            .field("default_limit", &self.config.default_limit)
            .finish()
    }
}
