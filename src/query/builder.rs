//! Query construction for the four search modes

use tracing::debug;

use super::ast::{Clause, Query};
use super::fuzzy::max_edits_for;
use crate::config::{FieldBoosts, QueryConfig};
use crate::error::{CinedexError, Result};
use crate::models::fields;
use crate::tokenizer::Analyzer;

/// A raw search request in one of the supported modes
#[derive(Clone, Debug, PartialEq)]
pub enum SearchRequest {
    /// Title, year, actors and genres with field boosts
    Boosted(String),
    /// Same clauses as `Boosted`, every boost 1.0
    Unboosted(String),
    /// Exact release year
    Year(String),
    /// Fuzzy title search restricted to documents carrying every genre
    Genres { query: String, genres: Vec<String> },
}

impl SearchRequest {
    pub fn boosted(query: impl Into<String>) -> Self {
        SearchRequest::Boosted(query.into())
    }

    pub fn unboosted(query: impl Into<String>) -> Self {
        SearchRequest::Unboosted(query.into())
    }

    pub fn year(year: impl Into<String>) -> Self {
        SearchRequest::Year(year.into())
    }

    pub fn genres<I, S>(query: impl Into<String>, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchRequest::Genres {
            query: query.into(),
            genres: genres.into_iter().map(Into::into).collect(),
        }
    }

    /// Mode name for logging
    pub fn mode(&self) -> &'static str {
        match self {
            SearchRequest::Boosted(_) => "boosted",
            SearchRequest::Unboosted(_) => "unboosted",
            SearchRequest::Year(_) => "year",
            SearchRequest::Genres { .. } => "genres",
        }
    }

    /// Raw query text
    pub fn text(&self) -> &str {
        match self {
            SearchRequest::Boosted(q) | SearchRequest::Unboosted(q) | SearchRequest::Year(q) => q,
            SearchRequest::Genres { query, .. } => query,
        }
    }
}

/// Turns search requests into query trees
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    analyzer: Analyzer,
    config: QueryConfig,
}

impl QueryBuilder {
    pub fn new(analyzer: Analyzer, config: QueryConfig) -> Self {
        Self { analyzer, config }
    }

    /// Build the query for a request
    ///
    /// `Ok(None)` means the input was blank and the result set is empty.
    pub fn build(&self, request: &SearchRequest) -> Result<Option<Query>> {
        let query = match request {
            SearchRequest::Boosted(text) => self.field_query(text, &self.config.boosts)?,
            SearchRequest::Unboosted(text) => self.field_query(text, &FieldBoosts::uniform())?,
            SearchRequest::Year(year) => self.year_query(year),
            SearchRequest::Genres { query, genres } => self.genre_query(query, genres)?,
        };

        if let Some(query) = &query {
            debug!(
                mode = request.mode(),
                leaves = query.leaf_count(),
                query = %query,
                "Built query"
            );
        }
        Ok(query)
    }

    fn tokens(&self, text: &str) -> Result<Vec<String>> {
        let tokens = self.analyzer.normalize(text);
        if tokens.len() > self.config.max_query_terms {
            return Err(CinedexError::InvalidQuery(format!(
                "query has {} terms, at most {} are allowed",
                tokens.len(),
                self.config.max_query_terms
            )));
        }
        Ok(tokens)
    }

    fn fuzzy(&self, field: &str, token: &str) -> Query {
        Query::fuzzy(field, token, max_edits_for(token, self.config.max_edits))
    }

    fn field_query(&self, text: &str, boosts: &FieldBoosts) -> Result<Option<Query>> {
        let tokens = self.tokens(text)?;
        if tokens.is_empty() {
            return Ok(None);
        }

        let mut clauses = Vec::with_capacity(tokens.len() * 5);
        for token in &tokens {
            clauses.push(Clause::should(Query::prefix(fields::TITLE, token), boosts.title));
            clauses.push(Clause::should(self.fuzzy(fields::TITLE, token), boosts.title));
            clauses.push(Clause::should(Query::term(fields::YEAR, token), boosts.year));
            clauses.push(Clause::should(self.fuzzy(fields::ACTORS, token), boosts.actors));
            clauses.push(Clause::should(Query::term(fields::GENRES, token), boosts.genres));
        }
        Ok(Some(Query::Boolean(clauses)))
    }

    fn year_query(&self, year: &str) -> Option<Query> {
        let year = year.trim();
        if year.is_empty() {
            return None;
        }
        Some(Query::term(fields::YEAR, year))
    }

    fn genre_query(&self, text: &str, genres: &[String]) -> Result<Option<Query>> {
        let tokens = self.tokens(text)?;
        if tokens.is_empty() {
            return Ok(None);
        }

        let mut clauses: Vec<Clause> = tokens
            .iter()
            .map(|token| Clause::should(self.fuzzy(fields::TITLE, token), 1.0))
            .collect();

        let mut keys: Vec<String> = Vec::with_capacity(genres.len());
        for genre in genres {
            if self.analyzer.is_blank(genre) {
                return Err(CinedexError::InvalidQuery(format!(
                    "genre {:?} has no searchable characters",
                    genre
                )));
            }
            let key = self.analyzer.keyword(genre);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        clauses.extend(
            keys.into_iter()
                .map(|key| Clause::must(Query::term(fields::GENRE_KEYS, key))),
        );

        Ok(Some(Query::Boolean(clauses)))
    }
}
