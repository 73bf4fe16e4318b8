//! Backing stores that supply the records an index is built from

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CinedexError, Result};
use crate::models::MovieRecord;

/// Anything that can hand over the full record collection
pub trait RecordSource: Send + Sync {
    fn load_records(&self) -> Result<Vec<MovieRecord>>;
}

/// JSON array of records on disk
///
/// A missing file is an empty catalog, not an error.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn load_records(&self) -> Result<Vec<MovieRecord>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Record file missing, starting empty");
            return Ok(Vec::new());
        }

        let data = std::fs::read(&self.path)
            .map_err(|e| CinedexError::SourceRead(format!("{}: {}", self.path.display(), e)))?;
        let records: Vec<MovieRecord> = serde_json::from_slice(&data)
            .map_err(|e| CinedexError::SourceRead(format!("{}: {}", self.path.display(), e)))?;

        info!(path = %self.path.display(), records = records.len(), "Loaded records");
        Ok(records)
    }
}

/// In-memory record collection
#[derive(Clone, Debug, Default)]
pub struct VecSource {
    records: Vec<MovieRecord>,
}

impl VecSource {
    pub fn new(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for VecSource {
    fn load_records(&self) -> Result<Vec<MovieRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("movies.json"));
        assert!(source.load_records().unwrap().is_empty());
    }

    #[test]
    fn test_load_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "title": "The Matrix", "release_date": "1999-03-31",
                 "actors": ["Keanu Reeves"], "genres": ["Action", "Sci-Fi"]}},
                {{"id": 2, "title": "Heat"}}]"#
        )
        .unwrap();

        let records = JsonFileSource::new(file.path()).load_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].genres, vec!["Action", "Sci-Fi"]);
        assert_eq!(records[1].title, "Heat");
        assert!(records[1].release_date.is_none());
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = JsonFileSource::new(file.path()).load_records().unwrap_err();
        assert!(matches!(err, CinedexError::SourceRead(_)));
    }

    #[test]
    fn test_vec_source() {
        let source = VecSource::new(vec![MovieRecord::new(1, "Up")]);
        assert_eq!(source.load_records().unwrap().len(), 1);
        assert!(VecSource::default().load_records().unwrap().is_empty());
    }
}
