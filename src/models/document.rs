//! Indexed/stored projection of a movie record

use crate::models::record::MovieRecord;
use crate::tokenizer::Analyzer;

/// Field names used by the movie schema
pub mod fields {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const OVERVIEW: &str = "overview";
    pub const ACTORS: &str = "actors";
    pub const GENRES: &str = "genres";
    pub const YEAR: &str = "year";
    pub const RELEASE_DATE_FULL: &str = "releaseDateFull";
    /// One normalized key per genre, used by the genre filter
    pub const GENRE_KEYS: &str = "genreKeys";

    /// Separator used to store list-valued fields as a single string
    pub const LIST_SEPARATOR: &str = ", ";
}

/// How a field is indexed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Tokenized through the analyzer
    FullText,
    /// Indexed as a single untokenized term
    Exact,
}

/// A single named field value
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    pub stored: bool,
}

impl Field {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::FullText,
            value: value.into(),
            stored: true,
        }
    }

    pub fn exact(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Exact,
            value: value.into(),
            stored: true,
        }
    }

    /// Index the value without keeping it for retrieval
    pub fn unstored(mut self) -> Self {
        self.stored = false;
        self
    }
}

/// Document ready to be appended to an index writer
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    fields: Vec<Field>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// First value of a field, if present
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// All values of a (possibly multi-valued) field
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Maps movie records onto the index schema
#[derive(Clone, Debug)]
pub struct DocumentBuilder {
    analyzer: Analyzer,
}

impl DocumentBuilder {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    pub fn build(&self, record: &MovieRecord) -> Document {
        let mut doc = Document::new();
        doc.add(Field::exact(fields::ID, record.id.to_string()));
        doc.add(Field::text(fields::TITLE, record.title.as_str()));
        doc.add(Field::text(fields::OVERVIEW, record.overview.as_str()));
        doc.add(Field::text(
            fields::ACTORS,
            record.actors.join(fields::LIST_SEPARATOR),
        ));
        doc.add(Field::text(
            fields::GENRES,
            record.genres.join(fields::LIST_SEPARATOR),
        ));

        if let Some(date) = record.release_date.as_deref().filter(|d| !d.trim().is_empty()) {
            if let Some(year) = record.year() {
                doc.add(Field::exact(fields::YEAR, year));
            }
            doc.add(Field::exact(fields::RELEASE_DATE_FULL, date));
        }

        for genre in &record.genres {
            let key = self.analyzer.keyword(genre);
            if !key.is_empty() {
                doc.add(Field::exact(fields::GENRE_KEYS, key).unstored());
            }
        }

        doc
    }
}
