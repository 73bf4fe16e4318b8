//! Core types for the segment-based index

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Segment identifier (monotonically increasing per index)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentId(pub u64);

impl SegmentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment_{}", self.0)
    }
}

/// Index-wide document number, assigned in append order
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DocNo(pub u32);

impl DocNo {
    pub fn new(n: u32) -> Self {
        Self(n)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DocNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single posting entry within a posting list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub docno: DocNo,
    /// Occurrences of the term in this field of the document
    pub term_frequency: u32,
}

impl Posting {
    pub fn new(docno: DocNo, term_frequency: u32) -> Self {
        Self {
            docno,
            term_frequency,
        }
    }
}

/// Stored raw field values of one document, keyed by field name
pub type StoredFields = HashMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_id() {
        let id = SegmentId::new(42);
        assert_eq!(id.0, 42);
        assert_eq!(id.next().0, 43);
        assert_eq!(format!("{}", id), "segment_42");
    }

    #[test]
    fn test_docno() {
        let docno = DocNo::new(100);
        assert_eq!(docno.as_u32(), 100);
        assert_eq!(docno.as_usize(), 100);
        assert_eq!(docno.next(), DocNo(101));
        assert!(DocNo(3) < DocNo(4));
    }
}
