//! Spaced repetition scheduling.

pub mod fsrs;

use crate::types::{Rating, ReviewLogEntry, SchedulingState};
use chrono::{DateTime, Utc};

pub use fsrs::Fsrs;

/// Result of scheduling a card after review.
#[derive(Debug, Clone)]
pub struct SchedulingResult {
    pub state: SchedulingState,
    pub log: ReviewLogEntry,
}

/// A spaced repetition algorithm.
///
/// Implementations must be pure: the same state, rating and time always
/// produce the same result.
pub trait Scheduler: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate next review state after a review.
    fn schedule(&self, state: &SchedulingState, rating: Rating, now: DateTime<Utc>) -> SchedulingResult;
}

impl<S: Scheduler + ?Sized> Scheduler for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn schedule(&self, state: &SchedulingState, rating: Rating, now: DateTime<Utc>) -> SchedulingResult {
        (**self).schedule(state, rating, now)
    }
}

