use chrono::Utc;
use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gateway::LexicalDetails;

/// Kind of vocabulary item, chosen by the user when the entry is added.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    #[default]
    Word,
    Phrase,
    PhrasalVerb,
    Idiom,
    Collocation,
}

impl EntryType {
    pub const ALL: [EntryType; 5] = [
        EntryType::Word,
        EntryType::Phrase,
        EntryType::PhrasalVerb,
        EntryType::Idiom,
        EntryType::Collocation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Word => "word",
            EntryType::Phrase => "phrase",
            EntryType::PhrasalVerb => "phrasal_verb",
            EntryType::Idiom => "idiom",
            EntryType::Collocation => "collocation",
        }
    }

    /// Badge text shown next to an entry.
    pub fn label(self) -> &'static str {
        match self {
            EntryType::Word => "WORD",
            EntryType::Phrase => "PHRASE",
            EntryType::PhrasalVerb => "PHRASAL VERB",
            EntryType::Idiom => "IDIOM",
            EntryType::Collocation => "COLLOCATION",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A stored vocabulary item. Field names match the JSON written by the
/// browser version of the app so existing exports load unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabEntry {
    pub id: String,
    pub original: String,
    #[serde(default)]
    pub phonetics: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub vietnamese_meaning: String,
    #[serde(default)]
    pub example: String,
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

impl VocabEntry {
    pub fn from_lookup(original: &str, details: LexicalDetails, entry_type: EntryType) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            original: normalize_text(original),
            phonetics: normalize_text(&details.phonetics),
            part_of_speech: normalize_text(&details.part_of_speech),
            vietnamese_meaning: normalize_text(&details.vietnamese_meaning),
            example: normalize_text(&details.example),
            entry_type,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Text before the first newline of the Vietnamese meaning.
    pub fn first_meaning(&self) -> &str {
        self.vietnamese_meaning
            .split('\n')
            .next()
            .unwrap_or_default()
            .trim_end_matches('\r')
    }

    /// Every non-empty sense of the Vietnamese meaning, one per line.
    pub fn meanings(&self) -> impl Iterator<Item = &str> {
        self.vietnamese_meaning
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// Trim and NFC-normalize user or service supplied text.
pub fn normalize_text(text: &str) -> String {
    ComposingNormalizerBorrowed::new_nfc()
        .normalize(text.trim())
        .into_owned()
}
