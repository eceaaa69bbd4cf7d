//! Parsers for movie JSON coming from the network or from local storage.
//!
//! All three entry points go through the validating `Movie` deserializer,
//! so a malformed record anywhere in the input rejects the whole document.

use std::collections::HashSet;

use crate::error::{ParseError, Result};
use crate::types::*;

/// Parse a single movie detail record
pub fn parse_movie(json: &str) -> Result<Movie> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a recommendations page
///
/// A page with `"results": []` is valid and yields an empty list.
pub fn parse_recommendations(json: &str) -> Result<RecommendationPage> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of movies whose ids must be unique
///
/// This is the format favorites are stored in.
pub fn parse_movie_list(json: &str) -> Result<Vec<Movie>> {
    let movies: Vec<Movie> = serde_json::from_str(json)?;
    let mut seen = HashSet::with_capacity(movies.len());
    for movie in &movies {
        if !seen.insert(movie.id) {
            return Err(ParseError::DuplicateId(movie.id));
        }
    }
    Ok(movies)
}

/// Serialize movies back into the stored array format
pub fn movie_list_to_json(movies: &[Movie]) -> Result<String> {
    Ok(serde_json::to_string(movies)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = r#"{
        "adult": false,
        "id": 27205,
        "title": "Inception",
        "overview": "Cobb, a skilled thief...",
        "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
        "release_date": "2010-07-15",
        "vote_average": 8.4,
        "vote_count": 34495,
        "popularity": 83.9,
        "original_language": "en",
        "runtime": 148
    }"#;

    fn with_field(field: &str, value: serde_json::Value) -> String {
        let mut doc: serde_json::Value = serde_json::from_str(DETAIL).unwrap();
        doc[field] = value;
        doc.to_string()
    }

    #[test]
    fn test_parse_movie_ignores_unknown_fields() {
        let movie = parse_movie(DETAIL).unwrap();
        assert_eq!(movie.id, 27205);
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.vote_count, 34495);
        assert_eq!(movie.release_date.unwrap().to_string(), "2010-07-15");
    }

    #[test]
    fn test_empty_release_date_is_unknown() {
        let movie = parse_movie(&with_field("release_date", "".into())).unwrap();
        assert!(movie.release_date.is_none());

        let movie = parse_movie(&with_field("release_date", serde_json::Value::Null)).unwrap();
        assert!(movie.release_date.is_none());
    }

    #[test]
    fn test_null_poster_path() {
        let movie = parse_movie(&with_field("poster_path", serde_json::Value::Null)).unwrap();
        assert!(movie.poster_path.is_none());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let cases = [
            ("id", serde_json::json!(0)),
            ("id", serde_json::json!(-3)),
            ("vote_average", serde_json::json!(11.5)),
            ("vote_average", serde_json::json!(-0.1)),
            ("vote_count", serde_json::json!(-1)),
            ("popularity", serde_json::json!(-2.0)),
            ("release_date", serde_json::json!("15/07/2010")),
            ("title", serde_json::json!("  ")),
        ];
        for (field, value) in cases {
            let err = parse_movie(&with_field(field, value.clone())).unwrap_err();
            assert!(
                err.to_string().contains(field),
                "{field}={value} should be rejected with a field error, got {err}"
            );
        }
    }

    #[test]
    fn test_rejects_missing_required_field() {
        let mut doc: serde_json::Value = serde_json::from_str(DETAIL).unwrap();
        doc.as_object_mut().unwrap().remove("title");
        let err = parse_movie(&doc.to_string()).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_rejects_non_json() {
        assert!(matches!(parse_movie("<html>"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_parse_recommendations() {
        let body = format!(
            r#"{{"page": 1, "results": [{DETAIL}], "total_pages": 2, "total_results": 40}}"#
        );
        let page = parse_recommendations(&body).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.total_pages, 2);

        let empty = parse_recommendations(r#"{"page": 1, "results": []}"#).unwrap();
        assert!(empty.results.is_empty());
        assert_eq!(empty.total_results, 0);
    }

    #[test]
    fn test_recommendations_without_results_is_malformed() {
        assert!(parse_recommendations(r#"{"page": 1}"#).is_err());
    }

    #[test]
    fn test_movie_list_rejects_duplicate_ids() {
        let body = format!("[{DETAIL},{DETAIL}]");
        assert_eq!(parse_movie_list(&body), Err(ParseError::DuplicateId(27205)));
    }

    #[test]
    fn test_movie_list_survives_storage_format() {
        let movies = vec![parse_movie(DETAIL).unwrap()];
        let stored = movie_list_to_json(&movies).unwrap();
        assert_eq!(parse_movie_list(&stored).unwrap(), movies);
    }
}
