//! Review session state machine.
//!
//! A session walks a sequence of cards with a cursor. Rating a card runs the
//! scheduler, writes the new state into the card's file and then re-appends
//! any already-shown card that has become due again, so short relearning
//! steps resurface before the session ends.
//!
//! Each distinct card is stored once; the pending sequence holds indices
//! into that store. The sequence only grows and the cursor only advances.

use crate::algorithm::Scheduler;
use crate::codec;
use crate::error::{CoreError, Result};
use crate::types::{Card, Rating};
use chrono::{DateTime, Utc};

pub struct ReviewSession<S> {
    scheduler: S,
    cards: Vec<Card>,
    queue: Vec<usize>,
    cursor: usize,
}

impl<S: Scheduler> ReviewSession<S> {
    /// Session over exactly `cards`, in the given order.
    pub fn new(scheduler: S, cards: Vec<Card>) -> Self {
        let queue = (0..cards.len()).collect();
        Self {
            scheduler,
            cards,
            queue,
            cursor: 0,
        }
    }

    /// Session over the cards of `collection` that are due at `now`, earliest
    /// due date first.
    pub fn due(scheduler: S, collection: Vec<Card>, now: DateTime<Utc>) -> Self {
        let mut due: Vec<Card> = collection.into_iter().filter(|c| c.is_due(now)).collect();
        due.sort_by_key(|c| c.scheduling.due);
        Self::new(scheduler, due)
    }

    pub fn current(&self) -> Result<&Card> {
        self.current_slot().map(|slot| &self.cards[slot])
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.queue.len()
    }

    /// 1-based position and total length, for display.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor + 1, self.queue.len())
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Cards in session order, including ones already reviewed and requeued
    /// repeats.
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.queue.iter().map(|&slot| &self.cards[slot])
    }

    /// Rate the current card at the current time.
    pub fn rate(&mut self, rating: Rating) -> Result<&Card> {
        self.rate_at(rating, Utc::now())
    }

    /// Rate the current card as of `now` and move to the next one.
    ///
    /// If writing the card fails the error is returned, the in-memory card is
    /// left as it was and the cursor does not move, so the call can be retried.
    pub fn rate_at(&mut self, rating: Rating, now: DateTime<Utc>) -> Result<&Card> {
        let slot = self.current_slot()?;

        let mut card = self.cards[slot].clone();
        let result = self.scheduler.schedule(&card.scheduling, rating, now);
        card.scheduling = result.state;
        card.review_log.push(result.log);

        codec::write_card(&card)?;
        tracing::info!(
            path = %card.path.display(),
            scheduler = self.scheduler.name(),
            rating = %rating,
            state = %card.scheduling.state,
            due = %card.scheduling.due,
            "card rated"
        );
        self.cards[slot] = card;

        self.requeue_due(now);
        self.cursor += 1;
        Ok(&self.cards[slot])
    }

    /// Replace the current card, e.g. after its file was edited.
    pub fn update_current(&mut self, card: Card) -> Result<()> {
        let slot = self.current_slot()?;
        self.cards[slot] = card;
        Ok(())
    }

    fn current_slot(&self) -> Result<usize> {
        self.queue
            .get(self.cursor)
            .copied()
            .ok_or(CoreError::EndOfSession)
    }

    /// Append every card shown so far that is due at `now` and not already
    /// waiting in the pending part of the queue. Membership is checked against
    /// the live pending range, so a card appended earlier in this scan is not
    /// appended twice.
    fn requeue_due(&mut self, now: DateTime<Utc>) {
        for pos in 0..=self.cursor {
            let slot = self.queue[pos];
            let card = &self.cards[slot];
            if !card.is_due(now) {
                continue;
            }

            let pending = self.queue[self.cursor + 1..]
                .iter()
                .any(|&other| self.cards[other].path == card.path);
            if !pending {
                tracing::debug!(path = %card.path.display(), "requeueing due card");
                self.queue.push(slot);
            }
        }
    }
}
