use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::MovieId;

/// A catalog entry as served by the movie service
///
/// Only the id, title, genre, director, cast and the aggregate rating fields
/// feed the recommendation engine. The rest is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub movie_id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Delimited genre tags, e.g. `"Action|Sci-Fi"` or `"Action, Sci-Fi"`
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    /// JSON array of names, e.g. `["Actor1", "Actor2"]`
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Aggregate rating across all users
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_ratings: Option<u32>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub certification: Option<String>,
}

impl Movie {
    /// Creates a movie with just an id and title
    pub fn new(movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Genre tags, lowercased. `None` when the field is absent or holds no tags.
    pub fn genre_tags(&self) -> Option<HashSet<String>> {
        let tags: HashSet<String> = self
            .genre
            .as_deref()?
            .split([',', '|'])
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();

        (!tags.is_empty()).then_some(tags)
    }

    /// Director name, trimmed. `None` when absent or blank.
    pub fn director_name(&self) -> Option<&str> {
        self.director
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Cast names parsed from the stored JSON array, lowercased
    ///
    /// Returns `None` when the field is absent, blank, malformed, or lists nobody.
    pub fn cast_names(&self) -> Option<HashSet<String>> {
        let raw = self.cast.as_deref().map(str::trim).filter(|s| !s.is_empty())?;

        let names: Vec<String> = match serde_json::from_str(raw) {
            Ok(names) => names,
            Err(e) => {
                tracing::debug!(movie_id = self.movie_id, error = %e, "Unparseable cast field");
                return None;
            }
        };

        let names: HashSet<String> = names
            .iter()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        (!names.is_empty()).then_some(names)
    }

    /// Aggregate rating, treating a missing value as 0
    pub fn average_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }

    /// Number of ratings, treating a missing value as 0
    pub fn rating_count(&self) -> u32 {
        self.total_ratings.unwrap_or(0)
    }
}
