//! Top-N ranking against a single snapshot

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

use ordered_float::OrderedFloat;

use super::ast::Query;
use super::scorer::Scorer;
use crate::config::ScoringConfig;
use crate::segment::{DocNo, Snapshot};

/// A ranked document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredDoc {
    pub doc: DocNo,
    pub score: f32,
}

/// Heap entry where "greater" means "ranks higher"
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Ranked {
    score: OrderedFloat<f32>,
    doc: DocNo,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.doc.cmp(&self.doc))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs queries against the snapshot it was created with
pub struct Searcher {
    snapshot: Arc<Snapshot>,
    scoring: ScoringConfig,
}

impl Searcher {
    pub fn new(snapshot: Arc<Snapshot>, scoring: &ScoringConfig) -> Self {
        Self {
            snapshot,
            scoring: scoring.clone(),
        }
    }

    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.snapshot
    }

    /// Best `limit` documents by descending score, ties by ascending doc
    pub fn search(&self, query: &Query, limit: usize) -> Vec<ScoredDoc> {
        if limit == 0 || self.snapshot.is_empty() {
            return Vec::new();
        }

        let scores = Scorer::new(&self.snapshot, &self.scoring).score(query);

        // Min-heap of the current top `limit`
        let mut heap: BinaryHeap<Reverse<Ranked>> =
            BinaryHeap::with_capacity(limit.min(scores.len()));
        for (doc, score) in scores {
            let entry = Ranked {
                score: OrderedFloat(score),
                doc: DocNo(doc),
            };
            if heap.len() < limit {
                heap.push(Reverse(entry));
            } else if let Some(Reverse(worst)) = heap.peek() {
                if entry > *worst {
                    heap.pop();
                    heap.push(Reverse(entry));
                }
            }
        }

        let mut ranked: Vec<Ranked> = heap.into_iter().map(|Reverse(e)| e).collect();
        ranked.sort_by(|a, b| b.cmp(a));
        ranked
            .into_iter()
            .map(|r| ScoredDoc {
                doc: r.doc,
                score: r.score.into_inner(),
            })
            .collect()
    }
}
