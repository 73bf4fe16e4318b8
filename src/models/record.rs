use serde::{Deserialize, Serialize};

/// External record identifier assigned by the metadata provider
pub type RecordId = u64;

/// Movie record as delivered by the metadata provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieRecord {
    pub fn new(id: RecordId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }

    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = Some(release_date.into());
        self
    }

    pub fn with_actors<I, S>(mut self, actors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actors = actors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Release year, the first four characters of a long enough release date
    pub fn year(&self) -> Option<&str> {
        let date = self.release_date.as_deref()?;
        if date.trim().is_empty() || date.chars().count() < 4 {
            return None;
        }
        let end = date.char_indices().nth(4).map_or(date.len(), |(i, _)| i);
        Some(&date[..end])
    }
}

/// Search result rebuilt from stored field values
///
/// The poster path is not indexed, so it is always `None` here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieResult {
    pub id: RecordId,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub actors: Vec<String>,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
}
