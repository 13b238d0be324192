pub mod attempt;
pub mod deck;
pub mod deck_set;
pub mod grading;
pub mod item;
pub mod language;
pub mod session;

pub use attempt::AttemptRecord;
pub use deck::{Deck, Difficulty};
pub use deck_set::DeckSet;
pub use grading::{Grade, TextMatching, UserAnswer, grade};
pub use item::{AnswerSpec, Item, ItemKind};
pub use language::{Language, LocalizedList, LocalizedText};
pub use session::{
    Response, SessionConfig, SessionStats, SessionStatus, StudySession, UnansweredPolicy,
};
