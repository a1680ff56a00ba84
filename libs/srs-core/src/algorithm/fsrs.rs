//! FSRS (Free Spaced Repetition Scheduler) algorithm.
//!
//! Modern algorithm based on memory research using DSR model:
//! - Difficulty (D): Card difficulty 1-10
//! - Stability (S): Days until retention drops to target
//! - Retrievability (R): Probability of recall

use super::{Scheduler, SchedulingResult};
use crate::types::{LearningState, Rating, ReviewLogEntry, SchedulingState};
use chrono::{DateTime, Duration, Utc};

/// FSRS algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Fsrs {
    pub request_retention: f64,
    pub maximum_interval: f64,
    /// FSRS-4.5 parameters (17 weights).
    pub w: [f64; 17],
}

impl Default for Fsrs {
    fn default() -> Self {
        Self {
            request_retention: 0.9,
            maximum_interval: 36500.0,
            w: [
                0.4, 0.6, 2.4, 5.8, // w[0-3]: initial stability for Again, Hard, Good, Easy
                4.93,  // w[4]: initial difficulty base
                0.94,  // w[5]: initial difficulty modifier
                0.86,  // w[6]: difficulty decay
                0.01,  // w[7]: mean reversion weight
                1.49,  // w[8]: stability exp base
                0.14,  // w[9]: stability decay
                0.94,  // w[10]: retrievability effect
                2.18,  // w[11]: forget stability base
                0.05,  // w[12]: difficulty on forget
                0.34,  // w[13]: stability on forget
                1.26,  // w[14]: retrievability on forget
                0.29,  // w[15]: hard penalty
                2.61,  // w[16]: easy bonus
            ],
        }
    }
}

/// Bounds for the short-term step scheduled after `Again`.
const MIN_STEP_MINUTES: f64 = 10.0;
const MAX_STEP_MINUTES: f64 = 1440.0;

impl Scheduler for Fsrs {
    fn name(&self) -> &'static str {
        "fsrs"
    }

    fn schedule(&self, state: &SchedulingState, rating: Rating, now: DateTime<Utc>) -> SchedulingResult {
        let elapsed_days = Self::elapsed_days(state, now);
        let is_first_review =
            state.state == LearningState::New || state.reps == 0 || state.stability <= 0.0;

        let (stability, difficulty, lapses) = if is_first_review {
            (
                self.initial_stability(rating),
                self.initial_difficulty(rating),
                state.lapses,
            )
        } else {
            self.next_memory_state(state, rating, elapsed_days)
        };

        let (scheduled_days, due) = match rating {
            Rating::Again => {
                let minutes = self.short_term_minutes(stability);
                (0, now + Duration::minutes(minutes))
            }
            _ => {
                let days = self.interval_from_stability(stability).round() as i64;
                (days as u64, now + Duration::days(days))
            }
        };

        SchedulingResult {
            state: SchedulingState {
                due,
                stability,
                difficulty,
                elapsed_days,
                scheduled_days,
                reps: state.reps.saturating_add(1),
                lapses,
                state: Self::next_learning_state(state.state, rating),
            },
            log: ReviewLogEntry {
                rating,
                state: state.state,
                elapsed_days,
                scheduled_days,
                reviewed_at: now,
            },
        }
    }
}

impl Fsrs {
    /// S0(G) = w[G-1]
    fn initial_stability(&self, rating: Rating) -> f64 {
        let index = usize::from(rating.to_value() - 1);
        self.w[index].max(0.1)
    }

    /// D0(G) = w[4] - w[5] * (G - 3)
    fn initial_difficulty(&self, rating: Rating) -> f64 {
        let d0 = self.w[4] - self.w[5] * (f64::from(rating.to_value()) - 3.0);
        d0.clamp(1.0, 10.0)
    }

    /// Mean reversion towards D0(G), then decay by the rating:
    /// D' = w[7] * D0(G) + (1 - w[7]) * D - w[6] * (G - 3)
    fn next_difficulty(&self, current: f64, rating: Rating) -> f64 {
        let d0 = self.initial_difficulty(rating);
        let reverted = self.w[7] * d0 + (1.0 - self.w[7]) * current;
        let decayed = reverted - self.w[6] * (f64::from(rating.to_value()) - 3.0);
        decayed.clamp(1.0, 10.0)
    }

    /// R = (1 + t / (9 * S))^(-1)
    fn retrievability(&self, elapsed_days: f64, stability: f64) -> f64 {
        if stability <= 0.0 {
            return 0.0;
        }
        (1.0 + elapsed_days / (9.0 * stability)).powf(-1.0)
    }

    /// S' = S * (e^(w[8]) * (11 - D) * S^(-w[9]) * (e^(w[10]*(1-R)) - 1) + 1) * modifier
    fn next_stability_recall(
        &self,
        stability: f64,
        difficulty: f64,
        retrievability: f64,
        rating: Rating,
    ) -> f64 {
        let growth = self.w[8].exp()
            * (11.0 - difficulty).max(0.1)
            * stability.powf(-self.w[9])
            * ((self.w[10] * (1.0 - retrievability)).exp() - 1.0)
            + 1.0;

        let modifier = match rating {
            Rating::Hard => self.w[15],
            Rating::Easy => self.w[16],
            _ => 1.0,
        };

        (stability * growth * modifier).clamp(0.1, self.maximum_interval)
    }

    /// S' = w[11] * D^(-w[12]) * ((S+1)^w[13] - 1) * e^(w[14]*(1-R)), never above S.
    fn next_stability_forget(&self, stability: f64, difficulty: f64, retrievability: f64) -> f64 {
        let forgotten = self.w[11]
            * difficulty.max(1.0).powf(-self.w[12])
            * ((stability + 1.0).powf(self.w[13]) - 1.0)
            * (self.w[14] * (1.0 - retrievability)).exp();
        forgotten.max(0.1).min(stability.max(0.1))
    }

    /// I = 9 * S * (1/R - 1) where R = request_retention, at least one day.
    fn interval_from_stability(&self, stability: f64) -> f64 {
        if self.request_retention <= 0.0 || self.request_retention >= 1.0 {
            return stability.clamp(1.0, self.maximum_interval);
        }
        let interval = 9.0 * stability * (1.0 / self.request_retention - 1.0);
        interval.clamp(1.0, self.maximum_interval)
    }

    fn short_term_minutes(&self, stability: f64) -> i64 {
        (stability * 60.0).clamp(MIN_STEP_MINUTES, MAX_STEP_MINUTES) as i64
    }

    /// Whole days since the last review, reconstructed as `due - scheduled_days`.
    /// An interval that cannot be represented as a date counts as no time elapsed.
    fn elapsed_days(state: &SchedulingState, now: DateTime<Utc>) -> u64 {
        if state.state == LearningState::New || state.reps == 0 {
            return 0;
        }
        let last_review = i64::try_from(state.scheduled_days)
            .ok()
            .and_then(Duration::try_days)
            .and_then(|interval| state.due.checked_sub_signed(interval));
        let Some(last_review) = last_review else {
            return 0;
        };
        now.signed_duration_since(last_review).num_days().max(0) as u64
    }

    fn next_memory_state(
        &self,
        state: &SchedulingState,
        rating: Rating,
        elapsed_days: u64,
    ) -> (f64, f64, u64) {
        let current_d = if state.difficulty > 0.0 { state.difficulty } else { 5.0 };
        let r = self.retrievability(elapsed_days as f64, state.stability);
        let difficulty = self.next_difficulty(current_d, rating);

        match rating {
            Rating::Again => {
                let stability = self.next_stability_forget(state.stability, current_d, r);
                let lapses = match state.state {
                    LearningState::Review => state.lapses.saturating_add(1),
                    _ => state.lapses,
                };
                (stability, difficulty, lapses)
            }
            _ => {
                let stability = self.next_stability_recall(state.stability, current_d, r, rating);
                (stability, difficulty, state.lapses)
            }
        }
    }

    fn next_learning_state(current: LearningState, rating: Rating) -> LearningState {
        match (current, rating) {
            (LearningState::New, Rating::Again) => LearningState::Learning,
            (LearningState::Learning, Rating::Again) => LearningState::Learning,
            (LearningState::Review, Rating::Again) => LearningState::Relearning,
            (LearningState::Relearning, Rating::Again) => LearningState::Relearning,
            (_, _) => LearningState::Review,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn review_state(stability: f64, difficulty: f64) -> SchedulingState {
        SchedulingState {
            due: now(),
            stability,
            difficulty,
            elapsed_days: 0,
            scheduled_days: stability.round() as u64,
            reps: 5,
            lapses: 0,
            state: LearningState::Review,
        }
    }

    #[test]
    fn new_card_first_review_good() {
        let fsrs = Fsrs::default();
        let result = fsrs.schedule(&SchedulingState::default(), Rating::Good, now());

        assert_eq!(result.state.state, LearningState::Review);
        assert!(result.state.stability > 0.0);
        assert!(result.state.difficulty > 0.0);
        assert_eq!(result.state.reps, 1);
        assert!(result.state.due > now());
        assert!(result.state.scheduled_days >= 1);
    }

    #[test]
    fn new_card_first_review_again() {
        let fsrs = Fsrs::default();
        let result = fsrs.schedule(&SchedulingState::default(), Rating::Again, now());

        assert_eq!(result.state.state, LearningState::Learning);
        assert_eq!(result.state.scheduled_days, 0);
        assert_eq!(result.state.due, now() + Duration::minutes(24));
        assert_eq!(result.state.lapses, 0);
    }

    #[test]
    fn oversized_interval_counts_as_no_elapsed_time() {
        let fsrs = Fsrs::default();
        for scheduled_days in [1_000_000_000, u64::MAX] {
            let state = SchedulingState {
                scheduled_days,
                reps: 3,
                ..review_state(10.0, 5.0)
            };

            assert_eq!(Fsrs::elapsed_days(&state, now()), 0);
            let result = fsrs.schedule(&state, Rating::Good, now());
            assert_eq!(result.state.state, LearningState::Review);
            assert_eq!(result.state.reps, 4);
            assert!(result.state.due > now());
        }
    }

    #[test]
    fn elapsed_days_since_last_review() {
        let state = SchedulingState {
            due: now() - Duration::days(2),
            scheduled_days: 5,
            ..review_state(5.0, 5.0)
        };
        assert_eq!(Fsrs::elapsed_days(&state, now()), 7);
    }

    #[test]
    fn log_entry_records_previous_state() {
        let fsrs = Fsrs::default();
        let result = fsrs.schedule(&review_state(10.0, 5.0), Rating::Hard, now());

        assert_eq!(result.log.rating, Rating::Hard);
        assert_eq!(result.log.state, LearningState::Review);
        assert_eq!(result.log.reviewed_at, now());
        assert_eq!(result.log.scheduled_days, result.state.scheduled_days);
    }

    #[test]
    fn schedule_is_deterministic() {
        let fsrs = Fsrs::default();
        let state = review_state(7.0, 6.0);
        let a = fsrs.schedule(&state, Rating::Good, now());
        let b = fsrs.schedule(&state, Rating::Good, now());
        assert_eq!(a.state, b.state);
    }

    #[test]
    fn new_card_first_review_easy_higher_stability() {
        let fsrs = Fsrs::default();
        let state = SchedulingState::default();

        let good = fsrs.schedule(&state, Rating::Good, now());
        let easy = fsrs.schedule(&state, Rating::Easy, now());
        assert!(easy.state.stability > good.state.stability);
    }

    #[test]
    fn stability_increases_on_successful_recall() {
        let fsrs = Fsrs::default();
        let later = now() + Duration::days(5);
        let result = fsrs.schedule(&review_state(5.0, 5.0), Rating::Good, later);

        assert!(result.state.stability > 5.0);
        assert_eq!(result.state.elapsed_days, 10);
    }

    #[test]
    fn stability_decreases_on_lapse() {
        let fsrs = Fsrs::default();
        let result = fsrs.schedule(&review_state(10.0, 5.0), Rating::Again, now());

        assert!(result.state.stability < 10.0);
        assert_eq!(result.state.lapses, 1);
        assert_eq!(result.state.state, LearningState::Relearning);
    }

    #[test]
    fn relearning_again_is_not_another_lapse() {
        let fsrs = Fsrs::default();
        let state = SchedulingState {
            state: LearningState::Relearning,
            lapses: 1,
            ..review_state(2.0, 6.0)
        };
        let result = fsrs.schedule(&state, Rating::Again, now());

        assert_eq!(result.state.lapses, 1);
        assert_eq!(result.state.state, LearningState::Relearning);
    }

    #[test]
    fn difficulty_moves_with_rating() {
        let fsrs = Fsrs::default();
        let state = review_state(5.0, 5.0);

        assert!(fsrs.schedule(&state, Rating::Easy, now()).state.difficulty < 5.0);
        assert!(fsrs.schedule(&state, Rating::Again, now()).state.difficulty > 5.0);
    }

    #[test]
    fn difficulty_clamped_to_bounds() {
        let fsrs = Fsrs::default();

        let hardest = review_state(5.0, 10.0);
        assert!(fsrs.schedule(&hardest, Rating::Again, now()).state.difficulty <= 10.0);

        let easiest = review_state(5.0, 1.0);
        assert!(fsrs.schedule(&easiest, Rating::Easy, now()).state.difficulty >= 1.0);
    }

    #[test]
    fn interval_respects_maximum() {
        let fsrs = Fsrs::default();
        let result = fsrs.schedule(&review_state(50000.0, 5.0), Rating::Good, now());

        assert!(result.state.scheduled_days as f64 <= fsrs.maximum_interval);
    }

    #[test]
    fn retrievability_formula() {
        let fsrs = Fsrs::default();

        assert!((fsrs.retrievability(0.0, 10.0) - 1.0).abs() < 0.001);
        assert!((fsrs.retrievability(90.0, 10.0) - 0.5).abs() < 0.001);
    }

    #[test]
    fn learning_card_graduates_on_good() {
        let fsrs = Fsrs::default();
        let state = SchedulingState {
            state: LearningState::Learning,
            scheduled_days: 0,
            reps: 1,
            ..review_state(1.0, 5.0)
        };

        let result = fsrs.schedule(&state, Rating::Good, now());
        assert_eq!(result.state.state, LearningState::Review);
    }

    #[test]
    fn hard_and_easy_modify_growth() {
        let fsrs = Fsrs::default();
        let state = review_state(10.0, 5.0);
        let later = now() + Duration::days(10);

        let hard = fsrs.schedule(&state, Rating::Hard, later).state.stability;
        let good = fsrs.schedule(&state, Rating::Good, later).state.stability;
        let easy = fsrs.schedule(&state, Rating::Easy, later).state.stability;
        assert!(hard < good);
        assert!(good < easy);
    }

    #[test]
    fn initial_parameters_are_monotonic() {
        let fsrs = Fsrs::default();
        let ratings = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

        for pair in ratings.windows(2) {
            assert!(fsrs.initial_stability(pair[0]) < fsrs.initial_stability(pair[1]));
            assert!(fsrs.initial_difficulty(pair[0]) > fsrs.initial_difficulty(pair[1]));
        }
    }
}
