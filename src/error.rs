//! Error types shared by the library.

use thiserror::Error;

use crate::models::{Language, Response, SessionStatus};

/// Precondition violations raised by a study session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("deck '{0}' has no items")]
    EmptyDeck(String),

    #[error("deck contains item id '{0}' more than once")]
    DuplicateItemId(String),

    #[error("cannot {action} while the session is {status}")]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },

    #[error("'{0}' is not a valid response")]
    InvalidResponse(Response),
}

/// Structural problems found when validating a deck.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck '{0}' has no items")]
    NoItems(String),

    #[error("deck '{deck}' is missing its {field} in {language}")]
    MissingTranslation {
        deck: String,
        field: &'static str,
        language: Language,
    },

    #[error("deck '{deck}' contains item id '{item}' more than once")]
    DuplicateItem { deck: String, item: String },

    #[error("item '{item}' points at option {index} but has only {len} options in {language}")]
    ChoiceOutOfRange {
        item: String,
        index: usize,
        len: usize,
        language: Language,
    },
}

/// Failures of the deck and attempt stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("deck not found: {0}")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failures while opening a study session from a deck source.
#[derive(Error, Debug)]
pub enum StartError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Failures while importing or exporting deck files.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid deck: {0}")]
    Invalid(#[from] DeckError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
