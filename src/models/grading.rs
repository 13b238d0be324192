//! Answer checking for quiz items and self-assessed flashcards.
//!
//! Grading is a pure function of the item, the learner's answer and the
//! active language. Short answers are compared as text after normalization:
//! - `Strict`: trimmed and lower-cased, then compared exactly
//! - `Lenient`: additionally folds French accents, strips Arabic harakat and
//!   tatweel, unifies alef forms, drops punctuation and collapses whitespace

use super::{AnswerSpec, Item, Language, Response};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAnswer {
    /// Index into the options of a multiple-choice item.
    Choice(usize),
    Bool(bool),
    Text(String),
    /// The learner's own verdict on a flashcard.
    SelfAssessed(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Incorrect,
}

impl Grade {
    fn from_bool(correct: bool) -> Self {
        if correct {
            Grade::Correct
        } else {
            Grade::Incorrect
        }
    }
}

impl From<Grade> for Response {
    fn from(grade: Grade) -> Self {
        match grade {
            Grade::Correct => Response::Correct,
            Grade::Incorrect => Response::Incorrect,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatching {
    #[default]
    Strict,
    Lenient,
}

/// Grades `answer` against `item`. An answer of the wrong shape is incorrect.
pub fn grade(item: &Item, answer: &UserAnswer, language: Language, matching: TextMatching) -> Grade {
    let correct = match (&item.answer, answer) {
        (AnswerSpec::MultipleChoice { correct_index, .. }, UserAnswer::Choice(index)) => {
            index == correct_index
        }
        (AnswerSpec::TrueFalse { correct_value }, UserAnswer::Bool(value)) => {
            value == correct_value
        }
        (AnswerSpec::ShortAnswer { correct_text }, UserAnswer::Text(text)) => {
            normalize(text, matching) == normalize(correct_text.resolve(language), matching)
        }
        (AnswerSpec::Flashcard { .. }, UserAnswer::SelfAssessed(knew_it)) => *knew_it,
        _ => false,
    };
    Grade::from_bool(correct)
}

pub fn normalize(text: &str, matching: TextMatching) -> String {
    let lowered = text.trim().to_lowercase();
    match matching {
        TextMatching::Strict => lowered,
        TextMatching::Lenient => {
            let mut folded = String::with_capacity(lowered.len());
            for c in lowered.chars() {
                fold_char(c, &mut folded);
            }
            folded.split_whitespace().collect::<Vec<_>>().join(" ")
        }
    }
}

fn fold_char(c: char, out: &mut String) {
    match c {
        'à' | 'â' | 'ä' | 'á' => out.push('a'),
        'ç' => out.push('c'),
        'é' | 'è' | 'ê' | 'ë' => out.push('e'),
        'î' | 'ï' => out.push('i'),
        'ô' | 'ö' => out.push('o'),
        'ù' | 'û' | 'ü' => out.push('u'),
        'ÿ' => out.push('y'),
        'œ' => out.push_str("oe"),
        'æ' => out.push_str("ae"),
        // harakat, superscript alef, tatweel
        '\u{064B}'..='\u{0652}' | '\u{0670}' | '\u{0640}' => {}
        'أ' | 'إ' | 'آ' => out.push('ا'),
        '،' | '؛' | '؟' => out.push(' '),
        // "l'insuline" and "l insuline" match
        c if c.is_ascii_punctuation() => out.push(' '),
        c => out.push(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocalizedList, LocalizedText};

    fn item(answer: AnswerSpec) -> Item {
        Item {
            id: "i".to_string(),
            prompt: LocalizedText::fr_ar("?", "؟"),
            answer,
            explanation: None,
        }
    }

    fn short(fr: &str, ar: &str) -> Item {
        item(AnswerSpec::ShortAnswer {
            correct_text: LocalizedText::fr_ar(fr, ar),
        })
    }

    #[test]
    fn test_multiple_choice_compares_index() {
        let q = item(AnswerSpec::MultipleChoice {
            options: LocalizedList::new().with(Language::Fr, ["a", "b"]),
            correct_index: 1,
        });
        let strict = TextMatching::Strict;
        assert_eq!(grade(&q, &UserAnswer::Choice(1), Language::Fr, strict), Grade::Correct);
        assert_eq!(grade(&q, &UserAnswer::Choice(0), Language::Fr, strict), Grade::Incorrect);
    }

    #[test]
    fn test_true_false_compares_value() {
        let q = item(AnswerSpec::TrueFalse { correct_value: false });
        let strict = TextMatching::Strict;
        assert_eq!(grade(&q, &UserAnswer::Bool(false), Language::Ar, strict), Grade::Correct);
        assert_eq!(grade(&q, &UserAnswer::Bool(true), Language::Ar, strict), Grade::Incorrect);
    }

    #[test]
    fn test_short_answer_trims_and_ignores_case() {
        let q = short("Insuline", "الأنسولين");
        let answer = UserAnswer::Text("  insuline  ".to_string());
        assert_eq!(grade(&q, &answer, Language::Fr, TextMatching::Strict), Grade::Correct);
    }

    #[test]
    fn test_short_answer_uses_active_language() {
        let q = short("Insuline", "الأنسولين");
        let answer = UserAnswer::Text("insuline".to_string());
        assert_eq!(grade(&q, &answer, Language::Ar, TextMatching::Strict), Grade::Incorrect);
        let answer = UserAnswer::Text("الأنسولين".to_string());
        assert_eq!(grade(&q, &answer, Language::Ar, TextMatching::Strict), Grade::Correct);
    }

    #[test]
    fn test_strict_matching_keeps_accents() {
        let q = short("Hépatite", "التهاب الكبد");
        let answer = UserAnswer::Text("hepatite".to_string());
        assert_eq!(grade(&q, &answer, Language::Fr, TextMatching::Strict), Grade::Incorrect);
        assert_eq!(grade(&q, &answer, Language::Fr, TextMatching::Lenient), Grade::Correct);
    }

    #[test]
    fn test_lenient_matching_strips_harakat_and_punctuation() {
        let q = short("Cœur", "القَلْب");
        let answer = UserAnswer::Text("القلب".to_string());
        assert_eq!(grade(&q, &answer, Language::Ar, TextMatching::Lenient), Grade::Correct);
        let answer = UserAnswer::Text("coeur !".to_string());
        assert_eq!(grade(&q, &answer, Language::Fr, TextMatching::Lenient), Grade::Correct);
    }

    #[test]
    fn test_lenient_matching_unifies_alef_forms() {
        assert_eq!(
            normalize("إبرة", TextMatching::Lenient),
            normalize("ابرة", TextMatching::Lenient)
        );
    }

    #[test]
    fn test_flashcard_uses_self_assessment() {
        let card = item(AnswerSpec::Flashcard {
            back: LocalizedText::fr_ar("Dos", "ظهر"),
        });
        let strict = TextMatching::Strict;
        assert_eq!(grade(&card, &UserAnswer::SelfAssessed(true), Language::Fr, strict), Grade::Correct);
        assert_eq!(grade(&card, &UserAnswer::SelfAssessed(false), Language::Fr, strict), Grade::Incorrect);
    }

    #[test]
    fn test_mismatched_answer_shape_is_incorrect() {
        let q = item(AnswerSpec::TrueFalse { correct_value: true });
        let answer = UserAnswer::Text("true".to_string());
        assert_eq!(grade(&q, &answer, Language::Fr, TextMatching::Lenient), Grade::Incorrect);
    }
}
