//! Detail-view data layer.
//!
//! This crate contains the fetcher that hydrates one movie's detail record
//! and recommendation list, and the state type a view renders from.

pub mod fetcher;
pub mod state;

pub use fetcher::MovieDataFetcher;
pub use state::{FetchState, MovieDetails, Observation};
