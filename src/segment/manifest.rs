//! Segment manifest for tracking live segments
//!
//! The manifest is the index state: every sealed segment's metadata in
//! commit order plus the counters for the next segment and document.

use std::io;

use serde::{Deserialize, Serialize};

use super::reader::SegmentMeta;
use super::types::{DocNo, SegmentId};
use super::writer::current_timestamp;

/// The segment manifest tracks all live segments
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentManifest {
    /// Manifest version (for format upgrades)
    pub version: u32,
    /// Generation number (incremented on each commit)
    pub generation: u64,
    /// Next segment ID to allocate
    pub next_segment_id: SegmentId,
    /// Next document number to hand out
    pub next_doc: DocNo,
    /// Live segments, in ascending document order
    pub segments: Vec<SegmentMeta>,
    /// Timestamp of last update
    pub updated_at: u64,
}

impl SegmentManifest {
    /// Current manifest format version
    pub const VERSION: u32 = 1;

    /// Create a new empty manifest
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            generation: 0,
            next_segment_id: SegmentId::new(0),
            next_doc: DocNo(0),
            segments: Vec::new(),
            updated_at: 0,
        }
    }

    /// Allocate a new segment ID
    pub fn allocate_segment_id(&mut self) -> SegmentId {
        let id = self.next_segment_id;
        self.next_segment_id = id.next();
        id
    }

    /// Add a newly sealed segment to the manifest
    ///
    /// The segment must start exactly at `next_doc`; anything else would
    /// leave a gap or an overlap in the document number space.
    pub fn add_segment(&mut self, meta: SegmentMeta) -> Result<(), String> {
        if meta.base_doc != self.next_doc {
            return Err(format!(
                "{} starts at doc {} but the manifest expects {}",
                meta.id, meta.base_doc, self.next_doc
            ));
        }
        self.next_doc = meta.end_doc();
        self.generation = self.generation.max(meta.generation);
        self.segments.push(meta);
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Get total document count across all segments
    pub fn total_doc_count(&self) -> u64 {
        self.segments.iter().map(|m| m.doc_count as u64).sum()
    }

    /// Get total distinct term count across all segments
    pub fn total_term_count(&self) -> u64 {
        self.segments.iter().map(|m| m.term_count).sum()
    }

    /// Get segments count
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Check if manifest is empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get segment metadata by ID
    pub fn get_segment(&self, segment_id: SegmentId) -> Option<&SegmentMeta> {
        self.segments.iter().find(|m| m.id == segment_id)
    }

    /// Iterate over segment entries
    pub fn iter(&self) -> impl Iterator<Item = &SegmentMeta> {
        self.segments.iter()
    }

    /// Serialize the manifest to JSON
    pub fn to_json(&self) -> io::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Deserialize manifest from JSON
    pub fn from_json(data: &[u8]) -> io::Result<Self> {
        serde_json::from_slice(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl Default for SegmentManifest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: SegmentId, generation: u64, base_doc: u32, doc_count: u32) -> SegmentMeta {
        SegmentMeta {
            id,
            generation,
            base_doc: DocNo(base_doc),
            doc_count,
            term_count: 10,
            created_at: 0,
        }
    }

    #[test]
    fn test_manifest_basic() {
        let mut manifest = SegmentManifest::new();

        assert_eq!(manifest.segment_count(), 0);
        assert!(manifest.is_empty());

        let id = manifest.allocate_segment_id();
        assert_eq!(id, SegmentId::new(0));

        manifest.add_segment(meta(id, 1, 0, 1000)).unwrap();

        assert_eq!(manifest.segment_count(), 1);
        assert!(!manifest.is_empty());
        assert_eq!(manifest.total_doc_count(), 1000);
        assert_eq!(manifest.next_doc, DocNo(1000));
        assert_eq!(manifest.generation, 1);
        assert!(manifest.get_segment(id).is_some());
    }

    #[test]
    fn test_manifest_rejects_gaps() {
        let mut manifest = SegmentManifest::new();
        let first = manifest.allocate_segment_id();
        manifest.add_segment(meta(first, 1, 0, 5)).unwrap();

        let second = manifest.allocate_segment_id();
        assert!(manifest.add_segment(meta(second, 2, 6, 5)).is_err());
        assert!(manifest.add_segment(meta(second, 2, 4, 5)).is_err());
        assert!(manifest.add_segment(meta(second, 2, 5, 5)).is_ok());
        assert_eq!(manifest.next_doc, DocNo(10));
        assert_eq!(manifest.total_term_count(), 20);
    }

    #[test]
    fn test_manifest_serialization() {
        let mut manifest = SegmentManifest::new();
        let id = manifest.allocate_segment_id();
        manifest.add_segment(meta(id, 1, 0, 1000)).unwrap();

        let json = manifest.to_json().unwrap();
        let restored = SegmentManifest::from_json(&json).unwrap();
        assert_eq!(restored, manifest);
        assert_eq!(restored.total_doc_count(), 1000);
    }
}
