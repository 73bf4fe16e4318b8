//! Mutable buffer for in-memory writes
//!
//! A buffer belongs to exactly one open `IndexWriter` and is invisible to
//! readers until it is sealed into an immutable segment at commit.

use std::collections::HashMap;

use super::types::{DocNo, Posting, StoredFields};
use crate::models::{Document, FieldKind};
use crate::tokenizer::Analyzer;

/// Per-field term to postings mapping
pub type FieldPostings = HashMap<String, Vec<Posting>>;

/// In-memory mutable buffer for documents awaiting commit
#[derive(Debug)]
pub struct MutableBuffer {
    /// First document number handed out by this buffer
    base_doc: DocNo,
    /// Field name to term postings
    fields: HashMap<String, FieldPostings>,
    /// Stored field values, indexed by `docno - base_doc`
    stored: Vec<StoredFields>,
    /// Approximate size in bytes
    size_bytes: usize,
}

impl MutableBuffer {
    /// Create an empty buffer whose first document is `base_doc`
    pub fn new(base_doc: DocNo) -> Self {
        Self {
            base_doc,
            fields: HashMap::new(),
            stored: Vec::new(),
            size_bytes: 0,
        }
    }

    /// Index a document into the buffer
    ///
    /// Returns the assigned DocNo for this document.
    pub fn index_document(&mut self, analyzer: &Analyzer, doc: &Document) -> DocNo {
        let docno = self.next_doc();
        let mut stored = StoredFields::new();

        for field in doc.fields() {
            match field.kind {
                FieldKind::FullText => {
                    for (term, tf) in analyzer.term_frequencies(&field.value) {
                        self.add_posting(&field.name, term, docno, tf);
                    }
                }
                FieldKind::Exact => {
                    if !field.value.is_empty() {
                        self.add_posting(&field.name, field.value.clone(), docno, 1);
                    }
                }
            }

            if field.stored {
                self.size_bytes += field.name.len() + field.value.len();
                stored
                    .entry(field.name.clone())
                    .or_insert_with(|| field.value.clone());
            }
        }

        self.stored.push(stored);
        docno
    }

    fn add_posting(&mut self, field: &str, term: String, docno: DocNo, tf: u32) {
        self.size_bytes += std::mem::size_of::<Posting>() + term.len();
        let postings = self
            .fields
            .entry(field.to_string())
            .or_default()
            .entry(term)
            .or_default();

        // Repeated values of a multi-valued field fold into one posting
        match postings.last_mut() {
            Some(last) if last.docno == docno => last.term_frequency += tf,
            _ => postings.push(Posting::new(docno, tf)),
        }
    }

    /// Document number the next indexed document will receive
    pub fn next_doc(&self) -> DocNo {
        DocNo(self.base_doc.0 + self.stored.len() as u32)
    }

    pub fn base_doc(&self) -> DocNo {
        self.base_doc
    }

    /// Number of documents in the buffer
    pub fn doc_count(&self) -> u32 {
        self.stored.len() as u32
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }

    /// Approximate size in bytes
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Number of distinct (field, term) pairs
    pub fn term_count(&self) -> usize {
        self.fields.values().map(HashMap::len).sum()
    }

    /// Consume the buffer into its raw parts for sealing
    pub(crate) fn into_parts(self) -> (DocNo, HashMap<String, FieldPostings>, Vec<StoredFields>) {
        (self.base_doc, self.fields, self.stored)
    }

    #[cfg(test)]
    pub(crate) fn postings(&self, field: &str, term: &str) -> Option<&[Posting]> {
        self.fields
            .get(field)
            .and_then(|terms| terms.get(term))
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fields, DocumentBuilder, Field, MovieRecord};

    fn analyzer() -> Analyzer {
        Analyzer::default()
    }

    #[test]
    fn test_docnos_start_at_base() {
        let analyzer = analyzer();
        let builder = DocumentBuilder::new(analyzer.clone());
        let mut buffer = MutableBuffer::new(DocNo(10));

        let a = buffer.index_document(&analyzer, &builder.build(&MovieRecord::new(1, "Alien")));
        let b = buffer.index_document(&analyzer, &builder.build(&MovieRecord::new(2, "Aliens")));

        assert_eq!(a, DocNo(10));
        assert_eq!(b, DocNo(11));
        assert_eq!(buffer.doc_count(), 2);
        assert_eq!(buffer.next_doc(), DocNo(12));
    }

    #[test]
    fn test_full_text_postings() {
        let analyzer = analyzer();
        let mut doc = Document::new();
        doc.add(Field::text(fields::TITLE, "New York, New York"));

        let mut buffer = MutableBuffer::new(DocNo(0));
        buffer.index_document(&analyzer, &doc);

        let postings = buffer.postings(fields::TITLE, "new").unwrap();
        assert_eq!(postings, &[Posting::new(DocNo(0), 2)]);
        assert!(buffer.postings(fields::TITLE, "New").is_none());
    }

    #[test]
    fn test_exact_fields_are_not_tokenized() {
        let analyzer = analyzer();
        let mut doc = Document::new();
        doc.add(Field::exact(fields::RELEASE_DATE_FULL, "1999-03-31"));

        let mut buffer = MutableBuffer::new(DocNo(0));
        buffer.index_document(&analyzer, &doc);

        assert!(buffer.postings(fields::RELEASE_DATE_FULL, "1999-03-31").is_some());
        assert!(buffer.postings(fields::RELEASE_DATE_FULL, "1999").is_none());
    }

    #[test]
    fn test_repeated_exact_values_share_a_posting() {
        let analyzer = analyzer();
        let mut doc = Document::new();
        doc.add(Field::exact(fields::GENRE_KEYS, "drama").unstored());
        doc.add(Field::exact(fields::GENRE_KEYS, "drama").unstored());

        let mut buffer = MutableBuffer::new(DocNo(0));
        buffer.index_document(&analyzer, &doc);

        assert_eq!(
            buffer.postings(fields::GENRE_KEYS, "drama").unwrap(),
            &[Posting::new(DocNo(0), 2)]
        );
    }

    #[test]
    fn test_unstored_fields_are_not_kept() {
        let analyzer = analyzer();
        let mut doc = Document::new();
        doc.add(Field::text(fields::TITLE, "Heat"));
        doc.add(Field::exact(fields::GENRE_KEYS, "crime").unstored());

        let mut buffer = MutableBuffer::new(DocNo(0));
        buffer.index_document(&analyzer, &doc);

        let (_, _, stored) = buffer.into_parts();
        assert_eq!(stored[0].get(fields::TITLE).map(String::as_str), Some("Heat"));
        assert!(!stored[0].contains_key(fields::GENRE_KEYS));
    }
}
