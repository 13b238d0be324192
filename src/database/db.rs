//! Database operations for the study application
//!
//! Handles SQLite database initialization, deck storage and the log of
//! finished attempts. Localized fields and items are stored as JSON text.

use super::{AttemptRecorder, DeckSource};
use crate::error::{StoreError, StoreResult};
use crate::models::{AttemptRecord, Deck, DeckSet, Difficulty, Item, LocalizedText};
use chrono::DateTime;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::{debug, info};

/// Opens (or creates) the database at `path` and makes sure the tables exist
pub fn init_database(path: impl AsRef<Path>) -> StoreResult<Connection> {
    let conn = Connection::open(path.as_ref())?;
    init_schema(&conn)?;
    info!(target: "medstudy", path = %path.as_ref().display(), "Database ready");
    Ok(conn)
}

/// Creates tables for decks, their items and recorded attempts
pub fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS decks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            difficulty TEXT NOT NULL DEFAULT 'beginner'
        )",
        (),
    )?;

    // Items keep their position so the deck order survives a round trip
    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            deck_id TEXT NOT NULL,
            id TEXT NOT NULL,
            position INTEGER NOT NULL,
            payload TEXT NOT NULL,
            PRIMARY KEY (deck_id, id),
            FOREIGN KEY (deck_id) REFERENCES decks(id) ON DELETE CASCADE
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS attempts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_id TEXT NOT NULL,
            user_id TEXT,
            percentage INTEGER NOT NULL,
            correct INTEGER NOT NULL,
            total INTEGER NOT NULL,
            completed_at INTEGER NOT NULL,
            elapsed_ms INTEGER NOT NULL,
            responses TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Stores `deck`, replacing any deck with the same id and all of its items
pub fn save_deck(deck: &Deck, conn: &Connection) -> StoreResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute("DELETE FROM items WHERE deck_id = ?1", params![deck.id])?;
    tx.execute(
        "INSERT OR REPLACE INTO decks (id, title, description, category, difficulty)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            deck.id,
            serde_json::to_string(&deck.title)?,
            serde_json::to_string(&deck.description)?,
            deck.category,
            deck.difficulty.as_str(),
        ],
    )?;

    for (position, item) in deck.items.iter().enumerate() {
        tx.execute(
            "INSERT INTO items (deck_id, id, position, payload) VALUES (?1, ?2, ?3, ?4)",
            params![deck.id, item.id, position as i64, serde_json::to_string(item)?],
        )?;
    }

    tx.commit()?;
    debug!(target: "medstudy", deck = %deck.id, items = deck.items.len(), "Deck saved");
    Ok(())
}

/// Deletes a deck with its items. Recorded attempts are kept.
pub fn delete_deck(id: &str, conn: &Connection) -> StoreResult<bool> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM items WHERE deck_id = ?1", params![id])?;
    let removed = tx.execute("DELETE FROM decks WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(removed > 0)
}

/// Loads one deck with its items in their stored order
pub fn get_deck(id: &str, conn: &Connection) -> StoreResult<Deck> {
    let row = conn
        .query_row(
            "SELECT title, description, category, difficulty FROM decks WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((title, description, category, difficulty)) = row else {
        return Err(StoreError::NotFound(id.to_string()));
    };

    Ok(Deck {
        id: id.to_string(),
        title: serde_json::from_str::<LocalizedText>(&title)?,
        description: serde_json::from_str::<LocalizedText>(&description)?,
        category,
        difficulty: Difficulty::parse(&difficulty).unwrap_or_default(),
        items: get_items_for_deck(id, conn)?,
    })
}

/// Retrieves the items of a deck ordered by position
pub fn get_items_for_deck(deck_id: &str, conn: &Connection) -> StoreResult<Vec<Item>> {
    let mut stmt =
        conn.prepare("SELECT payload FROM items WHERE deck_id = ?1 ORDER BY position ASC")?;

    let payloads = stmt
        .query_map(params![deck_id], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    payloads
        .iter()
        .map(|payload| serde_json::from_str::<Item>(payload).map_err(StoreError::from))
        .collect()
}

/// Retrieves all deck ids from database
pub fn get_all_deck_ids(conn: &Connection) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT id FROM decks ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(ids)
}

/// Loads all decks with their items into memory
pub fn load_all_decks(conn: &Connection) -> StoreResult<DeckSet> {
    let decks = get_all_deck_ids(conn)?
        .iter()
        .map(|id| get_deck(id, conn))
        .collect::<StoreResult<Vec<Deck>>>()?;
    Ok(DeckSet::new(decks))
}

pub fn deck_count(conn: &Connection) -> StoreResult<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM decks", [], |row| row.get(0))?;
    Ok(count as usize)
}

/// Appends a finished attempt to the log
pub fn record_attempt(attempt: &AttemptRecord, conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO attempts (deck_id, user_id, percentage, correct, total, completed_at, elapsed_ms, responses)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            attempt.deck_id,
            attempt.user_id,
            attempt.percentage,
            attempt.correct as i64,
            attempt.total as i64,
            attempt.completed_at.timestamp_millis(),
            attempt.elapsed_ms,
            serde_json::to_string(&attempt.responses)?,
        ],
    )?;
    Ok(())
}

/// Retrieves the attempts made on a deck, most recent first
pub fn attempts_for_deck(deck_id: &str, conn: &Connection) -> StoreResult<Vec<AttemptRecord>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, percentage, correct, total, completed_at, elapsed_ms, responses
         FROM attempts
         WHERE deck_id = ?1
         ORDER BY completed_at DESC, id DESC",
    )?;

    let rows = stmt
        .query_map(params![deck_id], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(
            |(user_id, percentage, correct, total, completed_at, elapsed_ms, responses)| -> StoreResult<AttemptRecord> {
                Ok(AttemptRecord {
                    deck_id: deck_id.to_string(),
                    user_id,
                    percentage,
                    correct: correct as usize,
                    total: total as usize,
                    completed_at: DateTime::from_timestamp_millis(completed_at)
                        .unwrap_or_default(),
                    elapsed_ms,
                    responses: serde_json::from_str(&responses)?,
                })
            },
        )
        .collect()
}

/// Best score on a deck, for one user or across everyone when `user_id` is `None`
pub fn best_percentage(
    deck_id: &str,
    user_id: Option<&str>,
    conn: &Connection,
) -> StoreResult<Option<u32>> {
    let best = match user_id {
        Some(user) => conn.query_row(
            "SELECT MAX(percentage) FROM attempts WHERE deck_id = ?1 AND user_id = ?2",
            params![deck_id, user],
            |row| row.get::<_, Option<u32>>(0),
        )?,
        None => conn.query_row(
            "SELECT MAX(percentage) FROM attempts WHERE deck_id = ?1",
            params![deck_id],
            |row| row.get::<_, Option<u32>>(0),
        )?,
    };
    Ok(best)
}

/// SQLite-backed deck source and attempt recorder.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: init_database(path)?,
        })
    }

    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn save_deck(&self, deck: &Deck) -> StoreResult<()> {
        save_deck(deck, &self.conn)
    }

    pub fn delete_deck(&self, id: &str) -> StoreResult<bool> {
        delete_deck(id, &self.conn)
    }

    pub fn deck_count(&self) -> StoreResult<usize> {
        deck_count(&self.conn)
    }

    pub fn load_all_decks(&self) -> StoreResult<DeckSet> {
        load_all_decks(&self.conn)
    }

    pub fn attempts_for_deck(&self, deck_id: &str) -> StoreResult<Vec<AttemptRecord>> {
        attempts_for_deck(deck_id, &self.conn)
    }

    pub fn best_percentage(&self, deck_id: &str, user_id: Option<&str>) -> StoreResult<Option<u32>> {
        best_percentage(deck_id, user_id, &self.conn)
    }
}

impl DeckSource for SqliteStore {
    fn fetch_deck(&self, id: &str) -> StoreResult<Deck> {
        get_deck(id, &self.conn)
    }

    fn list_decks(&self) -> StoreResult<Vec<Deck>> {
        get_all_deck_ids(&self.conn)?
            .iter()
            .map(|id| get_deck(id, &self.conn))
            .collect()
    }
}

impl AttemptRecorder for SqliteStore {
    fn record_attempt(&self, attempt: &AttemptRecord) -> StoreResult<()> {
        record_attempt(attempt, &self.conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnswerSpec, Language, LocalizedList, Response, SessionConfig, StudySession, UserAnswer,
    };
    use crate::seeds::sample_decks;
    use std::sync::Arc;

    fn store_with_samples() -> SqliteStore {
        let store = SqliteStore::in_memory().unwrap();
        for deck in sample_decks() {
            store.save_deck(&deck).unwrap();
        }
        store
    }

    #[test]
    fn test_deck_roundtrip_keeps_item_order() {
        let store = store_with_samples();
        for deck in sample_decks() {
            let loaded = store.fetch_deck(&deck.id).unwrap();
            assert_eq!(loaded, deck);
        }
        assert_eq!(store.deck_count().unwrap(), sample_decks().len());
    }

    #[test]
    fn test_fetch_unknown_deck_is_not_found() {
        let store = store_with_samples();
        assert!(matches!(store.fetch_deck("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_save_replaces_items() {
        let store = store_with_samples();
        let mut deck = sample_decks().remove(0);
        deck.items.truncate(1);
        deck.items[0].answer = AnswerSpec::MultipleChoice {
            options: LocalizedList::new().with(Language::Fr, ["x", "y"]),
            correct_index: 0,
        };
        store.save_deck(&deck).unwrap();

        let loaded = store.fetch_deck(&deck.id).unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0], deck.items[0]);
    }

    #[test]
    fn test_delete_deck() {
        let store = store_with_samples();
        let id = sample_decks()[0].id.clone();
        assert!(store.delete_deck(&id).unwrap());
        assert!(!store.delete_deck(&id).unwrap());
        assert!(get_items_for_deck(&id, store.connection()).unwrap().is_empty());
        assert_eq!(store.load_all_decks().unwrap().decks.len(), sample_decks().len() - 1);
    }

    #[test]
    fn test_record_and_read_attempts() {
        let store = store_with_samples();
        let deck = Arc::new(store.fetch_deck("cardio-quiz").unwrap());
        let mut session = StudySession::start(deck, SessionConfig::default()).unwrap();
        session.answer(&UserAnswer::Choice(usize::MAX)).unwrap();
        session.submit().unwrap();

        let record = AttemptRecord::from_session(&session, Some("amina")).unwrap();
        store.record_attempt(&record).unwrap();

        let attempts = store.attempts_for_deck("cardio-quiz").unwrap();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].user_id.as_deref(), Some("amina"));
        assert_eq!(attempts[0].percentage, 0);
        assert_eq!(
            attempts[0].completed_at.timestamp_millis(),
            record.completed_at.timestamp_millis()
        );
        assert_eq!(attempts[0].responses, record.responses);
        assert!(attempts[0].responses.values().any(|r| *r == Response::Incorrect));
    }

    #[test]
    fn test_best_percentage_per_user() {
        let store = store_with_samples();
        let deck = Arc::new(store.fetch_deck("anatomy-cards").unwrap());

        for (user, knew_it) in [("amina", true), ("amina", false), ("youssef", false)] {
            let mut session = StudySession::start(deck.clone(), SessionConfig::default()).unwrap();
            while !session.is_complete() {
                session.respond(if knew_it { Response::Correct } else { Response::Incorrect }).unwrap();
                if !session.is_complete() {
                    session.next().unwrap();
                }
            }
            let record = AttemptRecord::from_session(&session, Some(user)).unwrap();
            store.record_attempt(&record).unwrap();
        }

        assert_eq!(store.best_percentage("anatomy-cards", Some("amina")).unwrap(), Some(100));
        assert_eq!(store.best_percentage("anatomy-cards", Some("youssef")).unwrap(), Some(0));
        assert_eq!(store.best_percentage("anatomy-cards", None).unwrap(), Some(100));
        assert_eq!(store.best_percentage("cardio-quiz", None).unwrap(), None);
    }
}
