//! Term dictionary using FST (Finite State Transducer)
//!
//! Each sealed field maps its terms to an ordinal into the field's posting
//! lists. FST provides O(|key|) lookups and ordered prefix streams.

use std::io;

use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, MapBuilder, Streamer};

/// Term dictionary backed by FST
///
/// The FST output value is the term's ordinal in the owning field's
/// posting list array.
pub struct TermDictionary {
    fst: Map<Vec<u8>>,
}

impl TermDictionary {
    /// Look up a term and return its ordinal
    pub fn get(&self, term: &str) -> Option<usize> {
        self.fst.get(term.as_bytes()).map(|ord| ord as usize)
    }

    /// Check if a term exists
    pub fn contains(&self, term: &str) -> bool {
        self.fst.contains_key(term.as_bytes())
    }

    /// Get the number of terms
    pub fn len(&self) -> usize {
        self.fst.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.fst.is_empty()
    }

    /// All terms starting with `prefix`, in lexicographic order
    pub fn prefix_search(&self, prefix: &str) -> Vec<(String, usize)> {
        let matcher = Str::new(prefix).starts_with();
        let mut stream = self.fst.search(matcher).into_stream();
        let mut results = Vec::new();
        while let Some((key, ord)) = stream.next() {
            if let Ok(term) = std::str::from_utf8(key) {
                results.push((term.to_string(), ord as usize));
            }
        }
        results
    }

    /// Iterate over all terms in the dictionary
    pub fn iter_terms(&self) -> Vec<(String, usize)> {
        let mut results = Vec::with_capacity(self.len());
        let mut stream = self.fst.stream();
        while let Some((key, ord)) = stream.next() {
            if let Ok(term) = std::str::from_utf8(key) {
                results.push((term.to_string(), ord as usize));
            }
        }
        results
    }
}

impl std::fmt::Debug for TermDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermDictionary")
            .field("terms", &self.len())
            .finish()
    }
}

/// Builder for term dictionaries
pub struct TermDictionaryBuilder {
    terms: Vec<(String, usize)>,
}

impl TermDictionaryBuilder {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Add a term with its posting list ordinal (any order)
    pub fn add(&mut self, term: String, ordinal: usize) {
        self.terms.push((term, ordinal));
    }

    /// Build the term dictionary
    pub fn build(mut self) -> io::Result<TermDictionary> {
        // FST requires sorted, deduplicated input
        self.terms.sort_by(|a, b| a.0.cmp(&b.0));
        self.terms.dedup_by(|a, b| a.0 == b.0);

        let mut builder = MapBuilder::memory();
        for (term, ordinal) in self.terms {
            builder
                .insert(term.as_bytes(), ordinal as u64)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        }

        let data = builder
            .into_inner()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let fst = Map::new(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(TermDictionary { fst })
    }
}

impl Default for TermDictionaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
