pub mod document;
pub mod record;

pub use document::{fields, Document, DocumentBuilder, Field, FieldKind};
pub use record::{MovieRecord, MovieResult, RecordId};
