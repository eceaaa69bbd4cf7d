//! The in-memory form of the persisted favorites list.

use catalog::{Movie, MovieId, parser};

use crate::error::Result;

/// Ordered list of movies, unique by id.
///
/// Insertion order is kept so the favorites screen does not reshuffle
/// between visits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteSet {
    movies: Vec<Movie>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the stored blob, rejecting invalid records and duplicate ids
    pub fn from_json(json: &str) -> Result<Self> {
        let movies = parser::parse_movie_list(json)?;
        Ok(Self { movies })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(parser::movie_list_to_json(&self.movies)?)
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.movies.iter().any(|movie| movie.id == id)
    }

    /// Append `movie` unless its id is already present.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, movie: Movie) -> bool {
        if self.contains(movie.id) {
            return false;
        }
        self.movies.push(movie);
        true
    }

    /// Drop the entry with `id`, keeping every other entry in order
    pub fn remove(&mut self, id: MovieId) -> Option<Movie> {
        let index = self.movies.iter().position(|movie| movie.id == id)?;
        Some(self.movies.remove(index))
    }

    pub fn ids(&self) -> Vec<MovieId> {
        self.movies.iter().map(|movie| movie.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn into_movies(self) -> Vec<Movie> {
        self.movies
    }
}
