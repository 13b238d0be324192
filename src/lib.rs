pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod seeds;
pub mod telemetry;

pub use error::{DeckError, ExportError, SessionError, StartError, StoreError};
pub use models::{Deck, DeckSet, Item, Language, Response, SessionConfig, StudySession};
