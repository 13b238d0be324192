//! Languages supported by the deck content, and text keyed by language.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    Ar,
}

impl Language {
    pub const DEFAULT: Language = Language::Fr;
    pub const ALL: [Language; 2] = [Language::Fr, Language::Ar];

    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Ar => "ar",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Fr => "Français",
            Language::Ar => "العربية",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar)
    }

    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Language::Fr),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::DEFAULT
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Text with one translation per language.
///
/// Lookups fall back to [`Language::DEFAULT`], then to whatever translation
/// exists, so a partially translated deck still renders something.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Language, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
        self.0.insert(language, text.into());
        self
    }

    /// Shorthand for the common French + Arabic pair.
    pub fn fr_ar(fr: impl Into<String>, ar: impl Into<String>) -> Self {
        Self::new().with(Language::Fr, fr).with(Language::Ar, ar)
    }

    pub fn get(&self, language: Language) -> Option<&str> {
        self.0.get(&language).map(String::as_str)
    }

    pub fn resolve(&self, language: Language) -> &str {
        self.get(language)
            .or_else(|| self.get(Language::DEFAULT))
            .or_else(|| self.0.values().next().map(String::as_str))
            .unwrap_or("")
    }

    pub fn has(&self, language: Language) -> bool {
        self.get(language).is_some_and(|text| !text.trim().is_empty())
    }

    pub fn missing_languages(&self) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|&lang| !self.has(lang))
            .collect()
    }
}

/// Ordered lists keyed by language, used for multiple-choice options.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedList(BTreeMap<Language, Vec<String>>);

impl LocalizedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<S: Into<String>>(
        mut self,
        language: Language,
        entries: impl IntoIterator<Item = S>,
    ) -> Self {
        self.0
            .insert(language, entries.into_iter().map(Into::into).collect());
        self
    }

    pub fn resolve(&self, language: Language) -> &[String] {
        self.0
            .get(&language)
            .or_else(|| self.0.get(&Language::DEFAULT))
            .or_else(|| self.0.values().next())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn languages(&self) -> impl Iterator<Item = (Language, &[String])> {
        self.0.iter().map(|(lang, list)| (*lang, list.as_slice()))
    }
}
