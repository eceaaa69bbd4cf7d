//! Core domain types for movie records.
//!
//! The field names follow the remote movie service's JSON (snake_case), so a
//! `Movie` can be read from a detail response, a recommendation page, or the
//! locally stored favorites blob with the same schema.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie on the remote service
pub type MovieId = u32;

/// Base URL for poster images at the width the detail view uses
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

// =============================================================================
// Movie
// =============================================================================

/// A single movie record.
///
/// Instances are only ever produced through `RawMovie` validation, so every
/// `Movie` in the system satisfies the range checks below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMovie")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    /// `None` when the service has no date for the movie yet
    pub release_date: Option<NaiveDate>,
    /// Average vote from 0.0 to 10.0
    pub vote_average: f64,
    pub vote_count: u32,
    pub popularity: f64,
    /// ISO 639-1 code, e.g. "en"
    pub original_language: String,
}

impl Movie {
    /// Full poster URL, if the movie has a poster
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{POSTER_BASE_URL}{path}"))
    }

    /// Vote average with one decimal, the way the rating badge shows it
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    /// Release date formatted like "Fri, Jul 16, 2010"
    pub fn release_date_label(&self) -> Option<String> {
        self.release_date
            .map(|date| date.format("%a, %b %-d, %Y").to_string())
    }
}

/// Unvalidated wire shape of a movie.
///
/// Numeric fields are read wide so that out-of-range values are reported with
/// the offending field name instead of a generic type mismatch.
#[derive(Debug, Deserialize)]
struct RawMovie {
    id: i64,
    title: String,
    overview: String,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    vote_average: f64,
    vote_count: i64,
    popularity: f64,
    original_language: String,
}

impl TryFrom<RawMovie> for Movie {
    type Error = ParseError;

    fn try_from(raw: RawMovie) -> Result<Self, Self::Error> {
        let id = MovieId::try_from(raw.id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| ParseError::invalid("id", raw.id))?;

        if raw.title.trim().is_empty() {
            return Err(ParseError::invalid("title", "<empty>"));
        }

        if !raw.vote_average.is_finite() || !(0.0..=10.0).contains(&raw.vote_average) {
            return Err(ParseError::invalid("vote_average", raw.vote_average));
        }

        let vote_count = u32::try_from(raw.vote_count)
            .map_err(|_| ParseError::invalid("vote_count", raw.vote_count))?;

        if !raw.popularity.is_finite() || raw.popularity < 0.0 {
            return Err(ParseError::invalid("popularity", raw.popularity));
        }

        let release_date = match raw.release_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map_err(|_| ParseError::invalid("release_date", text))?,
            ),
        };

        let poster_path = raw.poster_path.filter(|path| !path.is_empty());

        Ok(Movie {
            id,
            title: raw.title,
            overview: raw.overview,
            poster_path,
            release_date,
            vote_average: raw.vote_average,
            vote_count,
            popularity: raw.popularity,
            original_language: raw.original_language,
        })
    }
}

// =============================================================================
// Recommendation Page
// =============================================================================

/// One page of the recommendations listing for a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPage {
    #[serde(default = "first_page")]
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> Movie {
        Movie {
            id: 27205,
            title: "Inception".to_string(),
            overview: "A thief who steals corporate secrets.".to_string(),
            poster_path: Some("/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg".to_string()),
            release_date: NaiveDate::from_ymd_opt(2010, 7, 16),
            vote_average: 8.369,
            vote_count: 34495,
            popularity: 83.952,
            original_language: "en".to_string(),
        }
    }

    #[test]
    fn test_poster_url() {
        let movie = inception();
        assert_eq!(
            movie.poster_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg")
        );

        let no_poster = Movie { poster_path: None, ..inception() };
        assert!(no_poster.poster_url().is_none());
    }

    #[test]
    fn test_rating_label_rounds_to_one_decimal() {
        assert_eq!(inception().rating_label(), "8.4");
    }

    #[test]
    fn test_release_date_label() {
        assert_eq!(
            inception().release_date_label().as_deref(),
            Some("Fri, Jul 16, 2010")
        );
        let undated = Movie { release_date: None, ..inception() };
        assert!(undated.release_date_label().is_none());
    }

    #[test]
    fn test_serialized_shape_uses_wire_names() {
        let value = serde_json::to_value(inception()).unwrap();
        assert_eq!(value["id"], 27205);
        assert_eq!(value["release_date"], "2010-07-16");
        assert_eq!(value["original_language"], "en");
        assert_eq!(value["poster_path"], "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg");
    }
}
