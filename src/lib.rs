//! Evaluates music artist recommendations from implicit listening feedback.
//!
//! Audioscrobbler style play counts are canonicalized through an artist
//! alias table, split into reproducible train/validation/test subsets, and
//! used to score latent factor models: per held out user, the top ranked
//! unheard artists are compared against what the user actually listened to.

pub mod aliases;
pub mod catalog;
pub mod config;
pub mod config_processors;
pub mod error;
pub mod evaluation;
pub mod interactions;
pub mod io;
pub mod metrics;
pub mod model;
pub mod objective;
pub mod recommend;
pub mod stats;
pub mod stopwatch;
