use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Number of results returned when the caller does not ask for a limit
pub const DEFAULT_LIMIT: usize = 30;

/// Top-level engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub analyzer: AnalyzerConfig,
    pub query: QueryConfig,
    pub scoring: ScoringConfig,
    pub default_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::default(),
            query: QueryConfig::default(),
            scoring: ScoringConfig::default(),
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file; absent keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Set the default result limit
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Replace the analyzer configuration
    pub fn with_analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Replace the query configuration
    pub fn with_query(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }
}

/// Text analysis configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub min_token_length: usize,
    pub max_token_length: usize,
    pub remove_stopwords: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_token_length: 1,
            max_token_length: 64,
            remove_stopwords: false,
        }
    }
}

/// Per-field clause boosts for the boosted search mode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldBoosts {
    pub title: f32,
    pub year: f32,
    pub actors: f32,
    pub genres: f32,
}

impl FieldBoosts {
    /// Every clause weighted equally
    pub fn uniform() -> Self {
        Self {
            title: 1.0,
            year: 1.0,
            actors: 1.0,
            genres: 1.0,
        }
    }
}

impl Default for FieldBoosts {
    fn default() -> Self {
        Self {
            title: 8.0,
            year: 4.0,
            actors: 3.0,
            genres: 2.0,
        }
    }
}

/// Query construction configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub boosts: FieldBoosts,
    /// Upper bound on fuzzy edit distance
    pub max_edits: u32,
    /// Queries with more tokens than this are rejected as malformed
    pub max_query_terms: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            boosts: FieldBoosts::default(),
            max_edits: 2,
            max_query_terms: 32,
        }
    }
}

impl QueryConfig {
    /// Set the fuzzy edit distance bound
    pub fn with_max_edits(mut self, max_edits: u32) -> Self {
        self.max_edits = max_edits;
        self
    }

    /// Set the maximum number of query tokens
    pub fn with_max_query_terms(mut self, max_query_terms: usize) -> Self {
        self.max_query_terms = max_query_terms;
        self
    }
}

/// Relevance scoring parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Term frequency saturation parameter
    pub k1: f32,
    /// Largest bonus repeated terms can add on top of a single occurrence;
    /// kept below the smallest ratio between adjacent field boosts minus one
    pub tf_weight: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            k1: 1.2,
            tf_weight: 0.25,
        }
    }
}
