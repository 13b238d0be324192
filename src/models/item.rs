//! A single quiz question or flashcard, and the shape of its answer.
use super::{Language, LocalizedList, LocalizedText};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub prompt: LocalizedText,
    pub answer: AnswerSpec,
    /// Shown during review of quiz questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<LocalizedText>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerSpec {
    MultipleChoice {
        options: LocalizedList,
        correct_index: usize,
    },
    TrueFalse {
        correct_value: bool,
    },
    ShortAnswer {
        correct_text: LocalizedText,
    },
    /// Correctness is reported by the learner.
    Flashcard {
        back: LocalizedText,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Flashcard,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemKind::MultipleChoice => "multiple choice",
            ItemKind::TrueFalse => "true/false",
            ItemKind::ShortAnswer => "short answer",
            ItemKind::Flashcard => "flashcard",
        };
        f.write_str(label)
    }
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self.answer {
            AnswerSpec::MultipleChoice { .. } => ItemKind::MultipleChoice,
            AnswerSpec::TrueFalse { .. } => ItemKind::TrueFalse,
            AnswerSpec::ShortAnswer { .. } => ItemKind::ShortAnswer,
            AnswerSpec::Flashcard { .. } => ItemKind::Flashcard,
        }
    }

    /// Text shown when the item is revealed: the back face of a flashcard,
    /// or the expected answer of a question.
    pub fn answer_text(&self, language: Language) -> String {
        match &self.answer {
            AnswerSpec::MultipleChoice {
                options,
                correct_index,
            } => options
                .resolve(language)
                .get(*correct_index)
                .cloned()
                .unwrap_or_default(),
            AnswerSpec::TrueFalse { correct_value } => match (language, correct_value) {
                (Language::Fr, true) => "Vrai".to_string(),
                (Language::Fr, false) => "Faux".to_string(),
                (Language::Ar, true) => "صحيح".to_string(),
                (Language::Ar, false) => "خطأ".to_string(),
            },
            AnswerSpec::ShortAnswer { correct_text } => correct_text.resolve(language).to_string(),
            AnswerSpec::Flashcard { back } => back.resolve(language).to_string(),
        }
    }
}
