//! Immutable segment reader
//!
//! A sealed segment owns per-field term dictionaries, postings and the stored
//! rows of a contiguous document number range. It is never mutated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::term_dict::TermDictionary;
use super::types::{DocNo, Posting, SegmentId, StoredFields};

/// Metadata for a segment stored in the manifest
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentMeta {
    /// Unique segment identifier
    pub id: SegmentId,
    /// Generation of the commit that published this segment
    pub generation: u64,
    /// First document number owned by the segment
    pub base_doc: DocNo,
    /// Number of documents in the segment
    pub doc_count: u32,
    /// Number of distinct (field, term) pairs
    pub term_count: u64,
    /// Creation timestamp
    pub created_at: u64,
}

impl SegmentMeta {
    /// One past the last document number owned by the segment
    pub fn end_doc(&self) -> DocNo {
        DocNo(self.base_doc.0 + self.doc_count)
    }

    pub fn contains(&self, docno: DocNo) -> bool {
        docno >= self.base_doc && docno < self.end_doc()
    }
}

/// Term dictionary plus posting lists for one field
#[derive(Debug)]
pub struct FieldIndex {
    terms: TermDictionary,
    postings: Vec<Vec<Posting>>,
}

impl FieldIndex {
    pub(crate) fn new(terms: TermDictionary, postings: Vec<Vec<Posting>>) -> Self {
        Self { terms, postings }
    }

    /// Get the term dictionary
    pub fn terms(&self) -> &TermDictionary {
        &self.terms
    }

    /// Postings for an exact term
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).and_then(|ord| self.postings_at(ord))
    }

    /// Postings for the term at a dictionary ordinal
    pub fn postings_at(&self, ordinal: usize) -> Option<&[Posting]> {
        self.postings.get(ordinal).map(Vec::as_slice)
    }

    /// All terms with the given prefix, paired with their postings
    pub fn prefix_postings(&self, prefix: &str) -> Vec<(String, &[Posting])> {
        self.terms
            .prefix_search(prefix)
            .into_iter()
            .filter_map(|(term, ord)| self.postings_at(ord).map(|p| (term, p)))
            .collect()
    }

    /// Number of distinct terms
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}

/// Immutable segment reader
#[derive(Debug)]
pub struct SegmentReader {
    /// Segment metadata
    meta: SegmentMeta,
    /// Field name to field index
    fields: HashMap<String, FieldIndex>,
    /// Stored rows, indexed by `docno - base_doc`
    stored: Vec<StoredFields>,
}

impl SegmentReader {
    pub(crate) fn new(
        meta: SegmentMeta,
        fields: HashMap<String, FieldIndex>,
        stored: Vec<StoredFields>,
    ) -> Self {
        Self {
            meta,
            fields,
            stored,
        }
    }

    /// Get segment metadata
    pub fn meta(&self) -> &SegmentMeta {
        &self.meta
    }

    /// Get segment ID
    pub fn id(&self) -> SegmentId {
        self.meta.id
    }

    pub fn base_doc(&self) -> DocNo {
        self.meta.base_doc
    }

    /// Get the number of documents
    pub fn doc_count(&self) -> u32 {
        self.meta.doc_count
    }

    /// Check whether a document number falls in this segment's range
    pub fn contains(&self, docno: DocNo) -> bool {
        self.meta.contains(docno)
    }

    /// Get the index of a field, if any document in the segment has it
    pub fn field(&self, name: &str) -> Option<&FieldIndex> {
        self.fields.get(name)
    }

    /// Get the stored values of a document owned by this segment
    pub fn stored(&self, docno: DocNo) -> Option<&StoredFields> {
        if !self.contains(docno) {
            return None;
        }
        self.stored.get((docno.0 - self.meta.base_doc.0) as usize)
    }

    /// Get the number of unique (field, term) pairs
    pub fn term_count(&self) -> usize {
        self.fields.values().map(FieldIndex::term_count).sum()
    }
}
