//! Segment index: sealed segments published through atomic snapshots
//!
//! Readers load the current `Snapshot` once per search and keep it alive via
//! `Arc`. A single `IndexWriter` at a time fills a private buffer and, on
//! commit, publishes a new snapshot with one pointer swap.

use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::buffer::MutableBuffer;
use super::manifest::SegmentManifest;
use super::reader::SegmentReader;
use super::types::{DocNo, SegmentId, StoredFields};
use super::writer::SegmentWriter;
use crate::error::{CinedexError, Result};
use crate::models::Document;
use crate::tokenizer::Analyzer;

/// Immutable view over a fixed list of sealed segments
#[derive(Debug, Default)]
pub struct Snapshot {
    manifest: SegmentManifest,
    segments: Vec<Arc<SegmentReader>>,
}

impl Snapshot {
    /// Snapshot of an index with no commits
    pub fn empty() -> Self {
        Self::default()
    }

    /// Generation of the commit that produced this snapshot
    pub fn generation(&self) -> u64 {
        self.manifest.generation
    }

    pub fn manifest(&self) -> &SegmentManifest {
        &self.manifest
    }

    /// Sealed segments in ascending document order
    pub fn segments(&self) -> &[Arc<SegmentReader>] {
        &self.segments
    }

    /// Total documents visible in this snapshot
    pub fn doc_count(&self) -> u64 {
        self.manifest.total_doc_count()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Document number the next commit will start at
    pub fn next_doc(&self) -> DocNo {
        self.manifest.next_doc
    }

    /// Locate the segment owning a document number
    pub fn segment_for(&self, docno: DocNo) -> Option<&SegmentReader> {
        let idx = self.segments.partition_point(|s| s.base_doc() <= docno);
        if idx == 0 {
            return None;
        }
        let segment = &self.segments[idx - 1];
        segment.contains(docno).then(|| segment.as_ref())
    }

    /// Stored values of a document, if it is visible in this snapshot
    pub fn stored(&self, docno: DocNo) -> Option<&StoredFields> {
        self.segment_for(docno).and_then(|s| s.stored(docno))
    }
}

/// Outcome of a successful commit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitInfo {
    /// Segment created by the commit
    pub segment_id: SegmentId,
    /// Generation of the published snapshot
    pub generation: u64,
    /// First document number in the new segment
    pub first_doc: DocNo,
    /// Documents in the new segment
    pub doc_count: u32,
    /// Documents visible after the commit
    pub total_docs: u64,
}

/// The movie index
///
/// Holds the analyzer shared by the write path, the writer lock and the
/// currently published snapshot.
pub struct MovieIndex {
    snapshot: ArcSwap<Snapshot>,
    write_lock: Mutex<()>,
    analyzer: Analyzer,
}

impl MovieIndex {
    /// Create an empty index
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot::empty()),
            write_lock: Mutex::new(()),
            analyzer,
        }
    }

    /// Load the current snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }

    /// Get generation number
    pub fn generation(&self) -> u64 {
        self.snapshot.load().generation()
    }

    /// Documents visible to new searches
    pub fn doc_count(&self) -> u64 {
        self.snapshot.load().doc_count()
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Open the single writer, blocking while another writer is open
    pub fn writer(&self) -> IndexWriter<'_> {
        let guard = self.write_lock.lock();
        let base_doc = self.snapshot.load().next_doc();
        debug!(base_doc = %base_doc, "Opened index writer");
        IndexWriter {
            index: self,
            _guard: guard,
            buffer: MutableBuffer::new(base_doc),
        }
    }

    fn publish(&self, snapshot: Snapshot) {
        self.snapshot.store(Arc::new(snapshot));
    }
}

impl Default for MovieIndex {
    fn default() -> Self {
        Self::new(Analyzer::default())
    }
}

impl std::fmt::Debug for MovieIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieIndex")
            .field("generation", &self.generation())
            .field("doc_count", &self.doc_count())
            .finish()
    }
}

/// Exclusive handle for appending documents
///
/// Documents added here stay invisible until `commit`. Dropping the writer
/// without committing discards them.
pub struct IndexWriter<'a> {
    index: &'a MovieIndex,
    _guard: MutexGuard<'a, ()>,
    buffer: MutableBuffer,
}

impl<'a> IndexWriter<'a> {
    /// Append a document and return its document number
    pub fn add(&mut self, doc: &Document) -> DocNo {
        self.buffer.index_document(&self.index.analyzer, doc)
    }

    /// Documents added since the writer was opened
    pub fn pending(&self) -> u32 {
        self.buffer.doc_count()
    }

    /// Seal pending documents into a segment and publish a new snapshot
    ///
    /// Returns `None` when nothing was added.
    pub fn commit(self) -> Result<Option<CommitInfo>> {
        if self.buffer.is_empty() {
            debug!("Commit with empty buffer, nothing to publish");
            return Ok(None);
        }

        let current = self.index.snapshot();
        let mut manifest = current.manifest().clone();
        let segment_id = manifest.allocate_segment_id();
        let generation = manifest.generation + 1;

        let size_bytes = self.buffer.size_bytes();
        let segment = SegmentWriter::new(segment_id, generation).write_from_buffer(self.buffer)?;
        let meta = segment.meta().clone();

        manifest
            .add_segment(meta.clone())
            .map_err(CinedexError::InternalInvariant)?;

        let mut segments = current.segments().to_vec();
        segments.push(Arc::new(segment));
        let total_docs = manifest.total_doc_count();

        self.index.publish(Snapshot { manifest, segments });

        info!(
            segment = %segment_id,
            generation,
            docs = meta.doc_count,
            terms = meta.term_count,
            size_bytes,
            total_docs,
            "Committed segment"
        );

        Ok(Some(CommitInfo {
            segment_id,
            generation,
            first_doc: meta.base_doc,
            doc_count: meta.doc_count,
            total_docs,
        }))
    }
}
