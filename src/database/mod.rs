//! Deck sources and attempt recorders.
//!
//! Sessions never talk to storage directly: the front end fetches a deck
//! through a [`DeckSource`] and hands finished attempts to an
//! [`AttemptRecorder`]. Both are passed in explicitly, so tests can use the
//! in-memory [`MemoryStore`].

pub mod db;

use crate::error::{StartError, StoreError, StoreResult};
use crate::models::{AttemptRecord, Deck, SessionConfig, StudySession};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub use db::SqliteStore;

pub trait DeckSource {
    /// Returns the deck or [`StoreError::NotFound`].
    fn fetch_deck(&self, id: &str) -> StoreResult<Deck>;

    fn list_decks(&self) -> StoreResult<Vec<Deck>>;
}

pub trait AttemptRecorder {
    fn record_attempt(&self, attempt: &AttemptRecord) -> StoreResult<()>;
}

/// Fetches `deck_id` from `source` and starts a session over it.
pub fn start_session<S: DeckSource + ?Sized>(
    source: &S,
    deck_id: &str,
    config: SessionConfig,
) -> Result<StudySession, StartError> {
    let deck = source.fetch_deck(deck_id)?;
    Ok(StudySession::start(Arc::new(deck), config)?)
}

/// Records `attempt`, logging instead of propagating any failure.
///
/// Returns whether the write went through.
pub fn record_attempt_best_effort<R: AttemptRecorder + ?Sized>(
    recorder: &R,
    attempt: &AttemptRecord,
) -> bool {
    match recorder.record_attempt(attempt) {
        Ok(()) => {
            info!(
                target: "medstudy",
                deck = %attempt.deck_id,
                percentage = attempt.percentage,
                "Attempt recorded"
            );
            true
        }
        Err(e) => {
            warn!(
                target: "medstudy",
                deck = %attempt.deck_id,
                error = %e,
                "Failed to record attempt"
            );
            false
        }
    }
}

/// Decks and attempts kept in memory.
#[derive(Default)]
pub struct MemoryStore {
    decks: Mutex<HashMap<String, Deck>>,
    attempts: Mutex<Vec<AttemptRecord>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new(decks: impl IntoIterator<Item = Deck>) -> Self {
        Self {
            decks: Mutex::new(decks.into_iter().map(|d| (d.id.clone(), d)).collect()),
            ..Self::default()
        }
    }

    /// A store whose attempt writes always fail.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn attempts(&self) -> Vec<AttemptRecord> {
        self.attempts
            .lock()
            .map(|attempts| attempts.clone())
            .unwrap_or_default()
    }
}

impl DeckSource for MemoryStore {
    fn fetch_deck(&self, id: &str) -> StoreResult<Deck> {
        let decks = self
            .decks
            .lock()
            .map_err(|_| StoreError::Unavailable("deck map poisoned".to_string()))?;
        decks
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list_decks(&self) -> StoreResult<Vec<Deck>> {
        let decks = self
            .decks
            .lock()
            .map_err(|_| StoreError::Unavailable("deck map poisoned".to_string()))?;
        let mut all: Vec<Deck> = decks.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

impl AttemptRecorder for MemoryStore {
    fn record_attempt(&self, attempt: &AttemptRecord) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        self.attempts
            .lock()
            .map_err(|_| StoreError::Unavailable("attempt log poisoned".to_string()))?
            .push(attempt.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use crate::models::{AnswerSpec, Item, LocalizedText, Response, SessionStatus};

    fn deck(id: &str) -> Deck {
        let mut deck = Deck::new(id, LocalizedText::fr_ar("Titre", "عنوان"));
        deck.items = vec![Item {
            id: "only".to_string(),
            prompt: LocalizedText::fr_ar("Rate", "طحال"),
            answer: AnswerSpec::Flashcard {
                back: LocalizedText::fr_ar("Organe lymphoïde", "عضو لمفاوي"),
            },
            explanation: None,
        }];
        deck
    }

    fn finished_attempt(store: &MemoryStore) -> (StudySession, AttemptRecord) {
        let deck = store.fetch_deck("spleen").unwrap();
        let mut session = StudySession::start(Arc::new(deck), SessionConfig::default()).unwrap();
        session.respond(Response::Correct).unwrap();
        let record = AttemptRecord::from_session(&session, Some("student")).unwrap();
        (session, record)
    }

    #[test]
    fn test_fetch_missing_deck() {
        let store = MemoryStore::new([deck("a")]);
        assert!(matches!(store.fetch_deck("b"), Err(StoreError::NotFound(id)) if id == "b"));
        assert_eq!(store.list_decks().unwrap().len(), 1);
    }

    #[test]
    fn test_best_effort_records_attempt() {
        let store = MemoryStore::new([deck("spleen")]);
        let (_, record) = finished_attempt(&store);
        assert!(record_attempt_best_effort(&store, &record));
        assert_eq!(store.attempts(), vec![record]);
    }

    #[test]
    fn test_failed_write_leaves_session_untouched() {
        let store = MemoryStore::new([deck("spleen")]).failing_writes();
        let (session, record) = finished_attempt(&store);
        let before = session.stats_at(session.completed_at().unwrap());

        assert!(!record_attempt_best_effort(&store, &record));

        assert_eq!(session.status(), SessionStatus::Complete);
        assert_eq!(session.stats_at(session.completed_at().unwrap()), before);
        assert!(store.attempts().is_empty());
    }

    #[test]
    fn test_start_session_fetches_deck() {
        let store = MemoryStore::new([deck("spleen")]);
        let session = start_session(&store, "spleen", SessionConfig::default()).unwrap();
        assert_eq!(session.deck().id, "spleen");
        assert_eq!(session.status(), SessionStatus::InProgress);
    }

    #[test]
    fn test_start_session_reports_missing_deck() {
        let store = MemoryStore::new([deck("spleen")]);
        let result = start_session(&store, "liver", SessionConfig::default());
        assert!(matches!(
            result,
            Err(StartError::Store(StoreError::NotFound(id))) if id == "liver"
        ));
    }

    #[test]
    fn test_start_session_rejects_empty_deck() {
        let mut empty = deck("empty");
        empty.items.clear();
        let store = MemoryStore::new([empty]);
        let result = start_session(&store, "empty", SessionConfig::default());
        assert!(matches!(
            result,
            Err(StartError::Session(SessionError::EmptyDeck(id))) if id == "empty"
        ));
    }
}
