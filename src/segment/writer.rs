//! Segment writer for sealing a mutable buffer into an immutable segment
//!
//! Each field's terms are sorted into an FST dictionary whose outputs index
//! the field's posting lists.

use std::collections::HashMap;
use std::io;

use super::buffer::MutableBuffer;
use super::reader::{FieldIndex, SegmentMeta, SegmentReader};
use super::term_dict::TermDictionaryBuilder;
use super::types::SegmentId;

/// Writer for creating new segments from a mutable buffer
pub struct SegmentWriter {
    segment_id: SegmentId,
    generation: u64,
}

impl SegmentWriter {
    pub fn new(segment_id: SegmentId, generation: u64) -> Self {
        Self {
            segment_id,
            generation,
        }
    }

    /// Seal a buffer into a segment
    pub fn write_from_buffer(&self, buffer: MutableBuffer) -> io::Result<SegmentReader> {
        let doc_count = buffer.doc_count();
        let (base_doc, buffered_fields, stored) = buffer.into_parts();

        let mut fields = HashMap::with_capacity(buffered_fields.len());
        let mut term_count = 0u64;

        for (name, terms) in buffered_fields {
            let mut sorted: Vec<_> = terms.into_iter().collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));

            let mut dict = TermDictionaryBuilder::with_capacity(sorted.len());
            let mut postings = Vec::with_capacity(sorted.len());
            for (ordinal, (term, list)) in sorted.into_iter().enumerate() {
                dict.add(term, ordinal);
                postings.push(list);
            }

            term_count += postings.len() as u64;
            fields.insert(name, FieldIndex::new(dict.build()?, postings));
        }

        let meta = SegmentMeta {
            id: self.segment_id,
            generation: self.generation,
            base_doc,
            doc_count,
            term_count,
            created_at: current_timestamp(),
        };

        Ok(SegmentReader::new(meta, fields, stored))
    }
}

/// Get current Unix timestamp in seconds
pub(crate) fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
