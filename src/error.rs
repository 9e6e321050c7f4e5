use crate::io::{ArtistId, UserId};

/// Errors surfaced by the evaluation and recommendation pipeline.
///
/// Input problems are rejected where the data is loaded or built, never
/// deferred to lookup time.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("malformed record in {path}: '{record}'")]
    MalformedRecord { path: String, record: String },

    #[error("alias entries form a cycle involving artist {0}")]
    AliasCycle(ArtistId),

    #[error("conflicting alias entries for artist {duplicate}: canonical {first} vs {second}")]
    ConflictingAlias {
        duplicate: ArtistId,
        first: ArtistId,
        second: ArtistId,
    },

    #[error("invalid split proportions {train}/{validation}/{test}: must be non-negative and sum to 1.0")]
    InvalidSplitConfig {
        train: f64,
        validation: f64,
        test: f64,
    },

    #[error("unknown user {0}")]
    UnknownUser(UserId),

    #[error("unknown artist {0}")]
    UnknownArtist(ArtistId),

    #[error("model does not cover the training split: {0}")]
    ModelMismatch(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
