use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{MovieId, UserId};

/// Highest value on the rating scale
pub const MAX_RATING: u8 = 5;

/// A single user's rating of a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default)]
    pub rating_id: Option<u64>,
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Integer score in 1..=5
    pub rating: u8,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Rating {
    /// Creates a rating without review text or timestamp
    pub fn new(user_id: UserId, movie_id: MovieId, rating: u8) -> Self {
        Self {
            rating_id: None,
            user_id,
            movie_id,
            rating,
            review: None,
            created_at: None,
        }
    }

    /// Whether the score lies on the 1..=5 scale
    pub fn in_range(&self) -> bool {
        (1..=MAX_RATING).contains(&self.rating)
    }
}

/// Drops ratings outside the rating scale, logging each one
pub fn valid_ratings(ratings: Vec<Rating>) -> Vec<Rating> {
    ratings
        .into_iter()
        .filter(|rating| {
            let keep = rating.in_range();
            if !keep {
                tracing::warn!(
                    user_id = rating.user_id,
                    movie_id = rating.movie_id,
                    rating = rating.rating,
                    "Discarding out-of-range rating"
                );
            }
            keep
        })
        .collect()
}

/// Movie ids a user has rated
pub fn rated_movie_ids(ratings: &[Rating]) -> HashSet<MovieId> {
    ratings.iter().map(|r| r.movie_id).collect()
}

/// Ratings keyed by user, then by movie
///
/// Built per request from a rating snapshot and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingMatrix {
    rows: HashMap<UserId, HashMap<MovieId, u8>>,
}

impl RatingMatrix {
    /// Builds the matrix, keeping one rating per (user, movie)
    ///
    /// A rating with a later `created_at` supersedes an earlier one. When
    /// timestamps are missing or equal, the one appearing later wins.
    /// Ratings off the 1..=5 scale are skipped.
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let mut latest: HashMap<(UserId, MovieId), &Rating> = HashMap::new();

        for rating in ratings.iter().filter(|r| r.in_range()) {
            let key = (rating.user_id, rating.movie_id);
            match latest.get(&key) {
                Some(existing) if existing.created_at > rating.created_at => {}
                _ => {
                    latest.insert(key, rating);
                }
            }
        }

        let mut rows: HashMap<UserId, HashMap<MovieId, u8>> = HashMap::new();
        for ((user_id, movie_id), rating) in latest {
            rows.entry(user_id).or_default().insert(movie_id, rating.rating);
        }

        Self { rows }
    }

    /// The ratings of one user, if any
    pub fn user(&self, user_id: UserId) -> Option<&HashMap<MovieId, u8>> {
        self.rows.get(&user_id)
    }

    /// Movies the user has a row entry for
    pub fn rated_by(&self, user_id: UserId) -> HashSet<MovieId> {
        self.user(user_id)
            .map(|row| row.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Iterates over every user row
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &HashMap<MovieId, u8>)> {
        self.rows.iter()
    }

    pub fn user_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
