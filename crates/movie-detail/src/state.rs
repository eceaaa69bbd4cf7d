//! Observable state for a detail view.

use catalog::{Movie, MovieId};
use tmdb_client::FetchError;

/// Lifecycle of an asynchronous remote read
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(FetchError),
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Settled means `Ready` or `Failed`
    pub fn is_settled(&self) -> bool {
        matches!(self, FetchState::Ready(_) | FetchState::Failed(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Everything the detail view renders for one movie
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub movie: Movie,
    pub recommendations: Vec<Movie>,
}

/// One snapshot of the fetcher's observable value.
///
/// `ticket` increases with every `observe` call; a completing request only
/// writes its result if the ticket it was issued with is still current.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub ticket: u64,
    pub id: Option<MovieId>,
    pub state: FetchState<MovieDetails>,
}

impl Observation {
    pub(crate) fn idle() -> Self {
        Self {
            ticket: 0,
            id: None,
            state: FetchState::Idle,
        }
    }

    /// Whether this snapshot is the settled result for `id`
    pub fn is_settled_for(&self, id: MovieId) -> bool {
        self.id == Some(id) && self.state.is_settled()
    }
}
