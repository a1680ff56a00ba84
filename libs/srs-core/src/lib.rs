//! Spaced-repetition flashcards stored as plain markdown files.
//!
//! Provides:
//! - Card file codec (metadata comment line, question, answer)
//! - FSRS scheduling behind the [`Scheduler`] trait
//! - Deck scanning, statistics and review sessions
//! - User configuration and the tool-call operations used by the apps

pub mod algorithm;
pub mod codec;
pub mod config;
pub mod error;
pub mod repository;
pub mod session;
pub mod stats;
pub mod tools;
pub mod types;

pub use algorithm::{Fsrs, Scheduler, SchedulingResult};
pub use config::Config;
pub use error::{CoreError, Result};
pub use repository::{CardScan, ScanWarning};
pub use session::ReviewSession;
pub use types::{Card, DeckStats, LearningState, Rating, ReviewLogEntry, SchedulingState};
