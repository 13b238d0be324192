//! JSON import/export module for study decks.
//! Provides functionality to save and load Deck structures to/from JSON files.

use crate::error::ExportError;
use crate::models::Deck;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Exports a deck to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_json_to_path(deck: &Deck, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let json_string = serde_json::to_string_pretty(deck)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(json_string.as_bytes())?;
    info!(target: "medstudy", deck = %deck.id, path = %path.as_ref().display(), "Deck exported");
    Ok(())
}

/// Imports a deck from a JSON file.
/// Returns an error if the file doesn't exist, contains invalid JSON,
/// or describes a deck that cannot be studied.
pub fn import_json(path: impl AsRef<Path>) -> Result<Deck, ExportError> {
    let mut file = File::open(path.as_ref())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let deck = parse_deck(&contents)?;

    info!(target: "medstudy", deck = %deck.id, path = %path.as_ref().display(), "Deck imported");
    Ok(deck)
}

/// Deserializes and validates a deck from JSON text.
pub fn parse_deck(json: &str) -> Result<Deck, ExportError> {
    let deck: Deck = serde_json::from_str(json)?;
    deck.validate()?;
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckError;
    use crate::seeds::sample_decks;
    use std::fs;

    #[test]
    fn test_export_json_to_path() {
        let deck = sample_decks().remove(0);
        let test_file = "test_export.json";

        let result = export_json_to_path(&deck, test_file);
        assert!(result.is_ok());

        assert!(fs::metadata(test_file).is_ok(), "File should exist");

        let _ = fs::remove_file(test_file);
    }

    #[test]
    fn test_import_json() {
        let json_content = r#"{
  "id": "pharma",
  "title": {"fr": "Pharmacologie", "ar": "علم الأدوية"},
  "description": {"fr": "Antibiotiques", "ar": "المضادات الحيوية"},
  "category": "pharmacology",
  "difficulty": "intermediate",
  "items": [
    {
      "id": "amox",
      "prompt": {"fr": "Classe de l'amoxicilline ?", "ar": "ما فئة الأموكسيسيلين؟"},
      "answer": {"type": "short_answer", "correct_text": {"fr": "Pénicilline", "ar": "البنسلين"}}
    }
  ]
}"#;

        let test_file = "test_import.json";
        fs::write(test_file, json_content).unwrap();

        let result = import_json(test_file);
        let _ = fs::remove_file(test_file);

        let deck = result.unwrap();
        assert_eq!(deck.id, "pharma");
        assert_eq!(deck.items.len(), 1);
        assert_eq!(deck.items[0].id, "amox");
        assert!(deck.is_quiz());
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let test_file = "test_roundtrip.json";
        for original_deck in sample_decks() {
            export_json_to_path(&original_deck, test_file).unwrap();
            let imported_deck = import_json(test_file).unwrap();
            assert_eq!(original_deck, imported_deck);
        }
        let _ = fs::remove_file(test_file);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json("nonexistent_file_xyz123.json");
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let result = parse_deck("{ this is not valid json }");
        assert!(matches!(result, Err(ExportError::Json(_))));
    }

    #[test]
    fn test_import_rejects_empty_deck() {
        let json = r#"{
  "id": "empty",
  "title": {"fr": "Vide", "ar": "فارغ"},
  "description": {"fr": "Rien", "ar": "لا شيء"},
  "items": []
}"#;
        let result = parse_deck(json);
        assert!(matches!(
            result,
            Err(ExportError::Invalid(DeckError::NoItems(id))) if id == "empty"
        ));
    }
}
