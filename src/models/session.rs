//! Study session management for one pass through a deck.
//! Tracks the traversal order, the current item, per-item responses and
//! completion, for quizzes and flashcard decks alike.

use super::grading::{self, Grade, TextMatching, UserAnswer};
use super::{Deck, Item, Language};
use crate::error::SessionError;
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome recorded for one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Unseen,
    Correct,
    Incorrect,
    Skipped,
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Response::Unseen => "unseen",
            Response::Correct => "correct",
            Response::Incorrect => "incorrect",
            Response::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Complete,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::InProgress => f.write_str("in progress"),
            SessionStatus::Complete => f.write_str("complete"),
        }
    }
}

/// How items left unanswered at submission weigh on the percentage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnansweredPolicy {
    /// `correct / total`: an unanswered item costs as much as a wrong one.
    #[default]
    CountAsIncorrect,
    /// `correct / (total - unanswered)`. Skips the learner chose still count.
    ExcludeFromTotal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Move to the next item right after a response is recorded.
    pub auto_advance: bool,
    pub language: Language,
    pub text_matching: TextMatching,
    pub unanswered: UnansweredPolicy,
}

/// Aggregate figures derived from the responses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionStats {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub skipped: usize,
    pub unseen: usize,
    /// Skipped items that were still unseen when the session was submitted.
    pub unanswered_at_submit: usize,
    /// `correct / (correct + incorrect)`, 0 when nothing was graded.
    pub accuracy: f64,
    pub percentage: u32,
    pub elapsed: TimeDelta,
}

/// One learner's pass through a deck.
///
/// Responses are stored per deck position, so they stay attached to their
/// item whatever the traversal order is.
#[derive(Clone, Debug)]
pub struct StudySession {
    deck: Arc<Deck>,
    config: SessionConfig,
    order: Vec<usize>,
    cursor: usize,
    revealed: bool,
    responses: Vec<Response>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    status: SessionStatus,
    unanswered_at_submit: usize,
}

impl StudySession {
    /// Starts a session over `deck` in its natural order.
    pub fn start(deck: Arc<Deck>, config: SessionConfig) -> Result<Self, SessionError> {
        if deck.items.is_empty() {
            return Err(SessionError::EmptyDeck(deck.id.clone()));
        }

        let mut ids = HashSet::with_capacity(deck.items.len());
        if let Some(dup) = deck.items.iter().find(|item| !ids.insert(item.id.as_str())) {
            return Err(SessionError::DuplicateItemId(dup.id.clone()));
        }

        let len = deck.items.len();
        debug!(target: "medstudy", deck = %deck.id, items = len, "Study session started");

        Ok(Self {
            deck,
            config,
            order: (0..len).collect(),
            cursor: 0,
            revealed: false,
            responses: vec![Response::Unseen; len],
            started_at: Utc::now(),
            completed_at: None,
            status: SessionStatus::InProgress,
            unanswered_at_submit: 0,
        })
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Changes the active language; only affects grading of later answers.
    pub fn set_language(&mut self, language: Language) {
        self.config.language = language;
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Complete
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn current_item(&self) -> &Item {
        &self.deck.items[self.order[self.cursor]]
    }

    pub fn current_response(&self) -> Response {
        self.responses[self.order[self.cursor]]
    }

    pub fn response(&self, item_id: &str) -> Option<Response> {
        self.deck
            .items
            .iter()
            .position(|item| item.id == item_id)
            .map(|idx| self.responses[idx])
    }

    /// Every item id with its response, in deck order.
    pub fn responses(&self) -> impl Iterator<Item = (&str, Response)> + '_ {
        self.deck
            .items
            .iter()
            .zip(self.responses.iter().copied())
            .map(|(item, response)| (item.id.as_str(), response))
    }

    pub fn answered_count(&self) -> usize {
        self.responses
            .iter()
            .filter(|&&r| r != Response::Unseen)
            .count()
    }

    pub fn remaining_count(&self) -> usize {
        self.len() - self.answered_count()
    }

    pub fn progress_message(&self) -> String {
        format!(
            "{} / {} · {} answered",
            self.cursor + 1,
            self.len(),
            self.answered_count()
        )
    }

    /// Shows the answer of the current item. Calling it twice is harmless.
    pub fn reveal(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress("reveal")?;
        self.revealed = true;
        Ok(())
    }

    /// Records `response` for the current item.
    ///
    /// The session completes as soon as no item is left unseen. Otherwise,
    /// with `auto_advance`, the cursor moves on.
    pub fn respond(&mut self, response: Response) -> Result<(), SessionError> {
        self.ensure_in_progress("respond")?;
        if response == Response::Unseen {
            return Err(SessionError::InvalidResponse(response));
        }

        let idx = self.order[self.cursor];
        self.responses[idx] = response;
        debug!(
            target: "medstudy",
            deck = %self.deck.id,
            item = %self.deck.items[idx].id,
            %response,
            "Response recorded"
        );

        if !self.responses.contains(&Response::Unseen) {
            self.complete();
        } else if self.config.auto_advance {
            self.step(1);
        }
        Ok(())
    }

    /// Grades `answer` against the current item and records the result.
    pub fn answer(&mut self, answer: &UserAnswer) -> Result<Grade, SessionError> {
        self.ensure_in_progress("answer")?;
        let grade = grading::grade(
            self.current_item(),
            answer,
            self.config.language,
            self.config.text_matching,
        );
        self.respond(grade.into())?;
        Ok(grade)
    }

    pub fn next(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress("move to the next item")?;
        self.step(1);
        Ok(())
    }

    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress("move to the previous item")?;
        self.step(self.len() - 1);
        Ok(())
    }

    /// Randomizes the traversal order. Recorded responses are kept.
    pub fn shuffle(&mut self) -> Result<(), SessionError> {
        self.shuffle_with(&mut rand::thread_rng())
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.ensure_in_progress("shuffle")?;
        self.order.shuffle(rng);
        self.cursor = 0;
        self.revealed = false;
        Ok(())
    }

    /// Ends the pass now. Items never answered are recorded as skipped.
    pub fn submit(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress("submit")?;
        for response in self.responses.iter_mut() {
            if *response == Response::Unseen {
                *response = Response::Skipped;
                self.unanswered_at_submit += 1;
            }
        }
        self.complete();
        Ok(())
    }

    /// Starts the deck over: natural order, nothing answered, new start time.
    pub fn reset(&mut self) {
        self.order = (0..self.deck.items.len()).collect();
        self.cursor = 0;
        self.revealed = false;
        self.responses.fill(Response::Unseen);
        self.started_at = Utc::now();
        self.completed_at = None;
        self.status = SessionStatus::InProgress;
        self.unanswered_at_submit = 0;
        debug!(target: "medstudy", deck = %self.deck.id, "Study session reset");
    }

    pub fn stats(&self) -> SessionStats {
        self.stats_at(Utc::now())
    }

    /// Statistics as of `now`; once complete, elapsed time stops at completion.
    pub fn stats_at(&self, now: DateTime<Utc>) -> SessionStats {
        let count = |wanted: Response| self.responses.iter().filter(|&&r| r == wanted).count();
        let total = self.responses.len();
        let correct = count(Response::Correct);
        let incorrect = count(Response::Incorrect);
        let skipped = count(Response::Skipped);
        let unseen = count(Response::Unseen);

        let graded = correct + incorrect;
        let accuracy = if graded == 0 {
            0.0
        } else {
            correct as f64 / graded as f64
        };

        let denominator = match self.config.unanswered {
            UnansweredPolicy::CountAsIncorrect => total,
            UnansweredPolicy::ExcludeFromTotal => total - self.unanswered_at_submit,
        };
        let percentage = if denominator == 0 {
            0
        } else {
            (100.0 * correct as f64 / denominator as f64).round() as u32
        };

        let end = self.completed_at.unwrap_or(now);
        SessionStats {
            total,
            correct,
            incorrect,
            skipped,
            unseen,
            unanswered_at_submit: self.unanswered_at_submit,
            accuracy,
            percentage,
            elapsed: end - self.started_at,
        }
    }

    fn ensure_in_progress(&self, action: &'static str) -> Result<(), SessionError> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            status => Err(SessionError::InvalidTransition { action, status }),
        }
    }

    fn step(&mut self, offset: usize) {
        self.cursor = (self.cursor + offset) % self.len();
        self.revealed = false;
    }

    fn complete(&mut self) {
        let now = Utc::now();
        self.status = SessionStatus::Complete;
        self.completed_at = Some(now);
        let stats = self.stats_at(now);
        info!(
            target: "medstudy",
            deck = %self.deck.id,
            correct = stats.correct,
            total = stats.total,
            percentage = stats.percentage,
            "Study session complete"
        );
    }
}
