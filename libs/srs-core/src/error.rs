//! Error types for srs-core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by the card store, review session and tool surface.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid rating {0}: must be 1-4")]
    InvalidRating(i64),

    #[error("{0} is required")]
    MissingArgument(&'static str),

    #[error("no more cards in session")]
    EndOfSession,

    #[error("no base deck configured - run 'srs config' to set up")]
    NoBaseDeck,

    #[error("path {0} does not exist")]
    NotFound(PathBuf),

    #[error("{0} is not a card file (expected .md)")]
    NotACard(PathBuf),

    #[error("{0} is outside the base deck")]
    OutsideDeck(PathBuf),
}

impl CoreError {
    /// Rejected input, as opposed to a filesystem or session failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRating(_)
                | Self::MissingArgument(_)
                | Self::NotACard(_)
                | Self::OutsideDeck(_)
        )
    }
}
