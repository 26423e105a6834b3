//! Movie recommendation engine and HTTP service.
//!
//! Combines user-based collaborative filtering with content-based filtering,
//! falls back to popularity for cold-start users, and ships an offline
//! evaluation suite for the results.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
