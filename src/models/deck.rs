//! Deck is an ordered set of quiz questions or flashcards
use super::{AnswerSpec, Item, ItemKind, Language, LocalizedText};
use crate::error::DeckError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label(self, language: Language) -> &'static str {
        match (self, language) {
            (Difficulty::Beginner, Language::Fr) => "Débutant",
            (Difficulty::Intermediate, Language::Fr) => "Intermédiaire",
            (Difficulty::Advanced, Language::Fr) => "Avancé",
            (Difficulty::Beginner, Language::Ar) => "مبتدئ",
            (Difficulty::Intermediate, Language::Ar) => "متوسط",
            (Difficulty::Advanced, Language::Ar) => "متقدم",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Difficulty> {
        match value {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub items: Vec<Item>,
}

impl Deck {
    pub fn new(id: impl Into<String>, title: LocalizedText) -> Self {
        Self {
            id: id.into(),
            title,
            description: LocalizedText::new(),
            category: String::new(),
            difficulty: Difficulty::default(),
            items: Vec::new(),
        }
    }

    /// A deck is a quiz when every item can be graded automatically.
    pub fn is_quiz(&self) -> bool {
        !self.items.is_empty()
            && self
                .items
                .iter()
                .all(|item| item.kind() != ItemKind::Flashcard)
    }

    /// Checks the deck is startable and translated for every supported language.
    pub fn validate(&self) -> Result<(), DeckError> {
        for (field, text) in [("title", &self.title), ("description", &self.description)] {
            if let Some(&language) = text.missing_languages().first() {
                return Err(DeckError::MissingTranslation {
                    deck: self.id.clone(),
                    field,
                    language,
                });
            }
        }

        if self.items.is_empty() {
            return Err(DeckError::NoItems(self.id.clone()));
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(DeckError::DuplicateItem {
                    deck: self.id.clone(),
                    item: item.id.clone(),
                });
            }

            if let AnswerSpec::MultipleChoice {
                options,
                correct_index,
            } = &item.answer
            {
                for (language, list) in options.languages() {
                    if *correct_index >= list.len() {
                        return Err(DeckError::ChoiceOutOfRange {
                            item: item.id.clone(),
                            index: *correct_index,
                            len: list.len(),
                            language,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
