//! Blog post suggestions: reading-behavior tracking, preference-weighted
//! ranking, content-similar related posts, and a short-lived result cache.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
