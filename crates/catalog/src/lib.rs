//! # Catalog Crate
//!
//! Movie records as the rest of the workspace sees them.
//!
//! ## Main Components
//!
//! - **types**: `Movie`, `MovieId`, `RecommendationPage`
//! - **parser**: JSON entry points for detail responses, recommendation pages
//!   and stored movie lists
//! - **error**: `ParseError`, shared by the network and storage layers
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::parser;
//!
//! let movie = parser::parse_movie(&body)?;
//! println!("{} ({})", movie.title, movie.rating_label());
//! ```

// Public modules
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{ParseError, Result};
pub use types::{Movie, MovieId, POSTER_BASE_URL, RecommendationPage};
