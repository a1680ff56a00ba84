//! Core types for the flashcard scheduler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::CoreError;

/// Card learning state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearningState {
    #[default]
    New,
    Learning,
    Review,
    Relearning,
}

impl LearningState {
    /// Name used in the card metadata line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Learning => "Learning",
            Self::Review => "Review",
            Self::Relearning => "Relearning",
        }
    }

    /// Decode a state name. Matching is case-sensitive and anything
    /// unrecognized falls back to `New`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Learning" => Self::Learning,
            "Review" => Self::Review,
            "Relearning" => Self::Relearning,
            _ => Self::New,
        }
    }
}

impl fmt::Display for LearningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rating for a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Create from 4-point numeric value.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }
}

impl TryFrom<i64> for Rating {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or(CoreError::InvalidRating(value))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-card scheduling state, persisted in the card's metadata line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingState {
    pub due: DateTime<Utc>,
    pub stability: f64,
    pub difficulty: f64,
    pub elapsed_days: u64,
    pub scheduled_days: u64,
    pub reps: u64,
    pub lapses: u64,
    pub state: LearningState,
}

impl SchedulingState {
    /// Whether the card should be shown at `now`. Inclusive at `due == now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }
}

impl Default for SchedulingState {
    /// New-card state. The epoch due date keeps parsing deterministic and makes
    /// the card immediately due.
    fn default() -> Self {
        Self {
            due: DateTime::<Utc>::UNIX_EPOCH,
            stability: 0.0,
            difficulty: 0.0,
            elapsed_days: 0,
            scheduled_days: 0,
            reps: 0,
            lapses: 0,
            state: LearningState::New,
        }
    }
}

/// One applied rating, kept in memory for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLogEntry {
    pub rating: Rating,
    /// State the card was in before the review.
    pub state: LearningState,
    pub elapsed_days: u64,
    pub scheduled_days: u64,
    pub reviewed_at: DateTime<Utc>,
}

/// A flashcard backed by a single markdown file. The path is its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub path: PathBuf,
    pub question: String,
    pub answer: String,
    pub scheduling: SchedulingState,
    pub review_log: Vec<ReviewLogEntry>,
}

impl Card {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.scheduling.is_due(now)
    }
}

/// Card counts for a deck snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStats {
    pub total_cards: usize,
    pub due_cards: usize,
    pub new_cards: usize,
    pub learning_cards: usize,
    pub review_cards: usize,
    pub relearning_cards: usize,
}
