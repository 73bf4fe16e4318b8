//! Relevance scoring over a snapshot
//!
//! A leaf clause expands its token into the indexed terms it matches and
//! scores a document by its best term: `similarity × saturate(tf)`. Boolean
//! nodes sum boosted SHOULD scores over their candidate set, which is the
//! intersection of MUST clauses when any exist and otherwise the union of
//! SHOULD clauses.

use std::collections::HashMap;

use roaring::RoaringBitmap;

use super::ast::{Clause, Occur, Query};
use super::fuzzy::{bounded_distance, similarity};
use crate::config::ScoringConfig;
use crate::segment::{FieldIndex, Posting, Snapshot};

/// Document number to score for every matching document
///
/// Documents that only satisfy MUST clauses are present with score 0.0.
pub type ScoreMap = HashMap<u32, f32>;

/// Evaluates queries against one snapshot
pub struct Scorer<'a> {
    snapshot: &'a Snapshot,
    k1: f32,
    tf_weight: f32,
}

impl<'a> Scorer<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &ScoringConfig) -> Self {
        Self {
            snapshot,
            k1: config.k1,
            tf_weight: config.tf_weight,
        }
    }

    /// Term frequency saturation, 1.0 at tf = 1 and strictly below
    /// `1 + tf_weight`, so repeats never lift a field past a higher boost
    pub fn saturate(&self, tf: u32) -> f32 {
        let extra = tf.saturating_sub(1) as f32;
        1.0 + self.tf_weight * extra / (extra + self.k1)
    }

    /// Score every document matching the query
    pub fn score(&self, query: &Query) -> ScoreMap {
        match query {
            Query::Term { field, token } => self.leaf(field, |index, out| {
                if let Some(postings) = index.postings(token) {
                    self.accumulate(out, postings, 1.0);
                }
            }),
            Query::Prefix { field, token } => self.leaf(field, |index, out| {
                for (_, postings) in index.prefix_postings(token) {
                    self.accumulate(out, postings, 1.0);
                }
            }),
            Query::Fuzzy {
                field,
                token,
                max_edits,
            } => self.leaf(field, |index, out| {
                if *max_edits == 0 {
                    if let Some(postings) = index.postings(token) {
                        self.accumulate(out, postings, 1.0);
                    }
                    return;
                }
                for (term, ordinal) in index.terms().iter_terms() {
                    let Some(distance) = bounded_distance(token, &term, *max_edits) else {
                        continue;
                    };
                    if let Some(postings) = index.postings_at(ordinal) {
                        self.accumulate(out, postings, similarity(token, &term, distance));
                    }
                }
            }),
            Query::Boolean(clauses) => self.boolean(clauses),
        }
    }

    /// Candidate document set of a query
    pub fn matches(&self, query: &Query) -> RoaringBitmap {
        self.score(query).into_keys().collect()
    }

    fn leaf<F>(&self, field: &str, expand: F) -> ScoreMap
    where
        F: Fn(&FieldIndex, &mut ScoreMap),
    {
        let mut out = ScoreMap::new();
        for segment in self.snapshot.segments() {
            if let Some(index) = segment.field(field) {
                expand(index, &mut out);
            }
        }
        out
    }

    /// Keep the best relevance seen per document
    fn accumulate(&self, out: &mut ScoreMap, postings: &[Posting], similarity: f32) {
        for posting in postings {
            let relevance = similarity * self.saturate(posting.term_frequency);
            let entry = out.entry(posting.docno.as_u32()).or_insert(relevance);
            if relevance > *entry {
                *entry = relevance;
            }
        }
    }

    fn boolean(&self, clauses: &[Clause]) -> ScoreMap {
        let mut required: Option<RoaringBitmap> = None;
        let mut optional: Vec<(f32, ScoreMap)> = Vec::new();

        for clause in clauses {
            match clause.occur {
                Occur::Must => {
                    let docs = self.matches(&clause.query);
                    required = Some(match required {
                        Some(acc) => acc & docs,
                        None => docs,
                    });
                }
                Occur::Should => optional.push((clause.boost, self.score(&clause.query))),
            }
        }

        let mut scores = ScoreMap::new();
        match required {
            Some(candidates) => {
                for doc in candidates.iter() {
                    let score = optional
                        .iter()
                        .filter_map(|(boost, matches)| matches.get(&doc).map(|s| boost * s))
                        .sum();
                    scores.insert(doc, score);
                }
            }
            None => {
                for (boost, matches) in &optional {
                    for (doc, relevance) in matches {
                        *scores.entry(*doc).or_insert(0.0) += boost * relevance;
                    }
                }
            }
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentBuilder, MovieRecord};
    use crate::segment::MovieIndex;

    fn index(records: &[MovieRecord]) -> MovieIndex {
        let index = MovieIndex::default();
        let builder = DocumentBuilder::new(index.analyzer().clone());
        let mut writer = index.writer();
        for record in records {
            writer.add(&builder.build(record));
        }
        writer.commit().unwrap();
        index
    }

    fn scenario() -> MovieIndex {
        index(&[
            MovieRecord::new(1, "The Matrix")
                .with_release_date("1999-03-31")
                .with_actors(["Keanu Reeves"])
                .with_genres(["Action", "Sci-Fi"]),
            MovieRecord::new(2, "The Matrix Reloaded")
                .with_release_date("2003-05-15")
                .with_actors(["Keanu Reeves"])
                .with_genres(["Action"]),
            MovieRecord::new(3, "Speed")
                .with_release_date("1994-06-09")
                .with_actors(["Keanu Reeves", "Sandra Bullock"])
                .with_genres(["Action", "Thriller"]),
        ])
    }

    #[test]
    fn test_saturation() {
        let snapshot = Snapshot::empty();
        let scorer = Scorer::new(&snapshot, &ScoringConfig::default());
        assert!((scorer.saturate(1) - 1.0).abs() < 1e-6);
        assert!(scorer.saturate(2) > scorer.saturate(1));
        assert!(scorer.saturate(1000) < 1.25);
        assert!((scorer.saturate(0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_repeated_actor_stays_below_year() {
        let index = index(&[
            MovieRecord::new(1, "Nothing").with_actors(["1984", "1984", "1984"]),
            MovieRecord::new(2, "Nothing").with_release_date("1984-01-01"),
        ]);
        let snapshot = index.snapshot();
        let scorer = Scorer::new(&snapshot, &ScoringConfig::default());

        let query = Query::Boolean(vec![
            Clause::should(Query::term("year", "1984"), 4.0),
            Clause::should(Query::fuzzy("actors", "1984", 1), 3.0),
        ]);
        let scores = scorer.score(&query);
        assert!(scores[&1] > scores[&0]);
        assert!(scores[&0] > 3.0);
    }

    #[test]
    fn test_term_query() {
        let index = scenario();
        let snapshot = index.snapshot();
        let scorer = Scorer::new(&snapshot, &ScoringConfig::default());

        let scores = scorer.score(&Query::term("year", "1999"));
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get(&0), Some(&1.0));
        assert!(scorer.score(&Query::term("year", "2042")).is_empty());
        assert!(scorer.score(&Query::term("missing", "x")).is_empty());
    }

    #[test]
    fn test_prefix_query() {
        let index = scenario();
        let snapshot = index.snapshot();
        let scorer = Scorer::new(&snapshot, &ScoringConfig::default());

        let docs = scorer.matches(&Query::prefix("title", "mat"));
        assert_eq!(docs.iter().collect::<Vec<_>>(), vec![0, 1]);
        let docs = scorer.matches(&Query::prefix("title", "reload"));
        assert_eq!(docs.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_fuzzy_prefers_exact_terms() {
        let index = scenario();
        let snapshot = index.snapshot();
        let scorer = Scorer::new(&snapshot, &ScoringConfig::default());

        let typo = scorer.score(&Query::fuzzy("title", "matirx", 2));
        let exact = scorer.score(&Query::fuzzy("title", "matrix", 2));
        assert_eq!(typo.len(), 2);
        assert!(typo[&0] < exact[&0]);
        assert!(scorer.score(&Query::fuzzy("title", "matirx", 0)).is_empty());
    }

    #[test]
    fn test_must_clauses_filter() {
        let index = scenario();
        let snapshot = index.snapshot();
        let scorer = Scorer::new(&snapshot, &ScoringConfig::default());

        let query = Query::Boolean(vec![
            Clause::should(Query::fuzzy("title", "matrix", 2), 1.0),
            Clause::must(Query::term("genreKeys", "action")),
        ]);
        let scores = scorer.score(&query);

        // Speed satisfies the filter but not the title clause
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[&2], 0.0);
        assert!(scores[&0] > 0.0);

        let query = Query::Boolean(vec![
            Clause::should(Query::fuzzy("title", "matrix", 2), 1.0),
            Clause::must(Query::term("genreKeys", "action")),
            Clause::must(Query::term("genreKeys", "sci fi")),
        ]);
        let scores = scorer.score(&query);
        assert_eq!(scores.keys().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_should_clauses_sum_boosts() {
        let index = scenario();
        let snapshot = index.snapshot();
        let scorer = Scorer::new(&snapshot, &ScoringConfig::default());

        let query = Query::Boolean(vec![
            Clause::should(Query::term("title", "speed"), 8.0),
            Clause::should(Query::term("year", "1994"), 4.0),
        ]);
        let scores = scorer.score(&query);
        assert_eq!(scores.len(), 1);
        assert!((scores[&2] - 12.0).abs() < 1e-6);
    }
}
