use crate::models::MovieResult;

/// Notifications for a presentation layer
///
/// A search emits `LoadingStarted`, then `ResultsReady` or `SearchFailed`,
/// then `LoadingFinished`.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchEvent {
    LoadingStarted,
    LoadingFinished,
    ResultsReady(Vec<MovieResult>),
    SearchFailed(String),
}

impl SearchEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchEvent::LoadingFinished)
    }
}
