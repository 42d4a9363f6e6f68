//! Boundary to the generative-AI service that fills in entry details and
//! pronounces terms. The rest of the crate only sees the two traits below.

pub mod audio;
pub mod gemini;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured lexical data returned for one lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalDetails {
    #[serde(default)]
    pub phonetics: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub vietnamese_meaning: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub did_you_mean: Option<String>,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("network support is not compiled in")]
    Disabled,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service answered with HTTP {0}")]
    Status(u16),
    #[error("response is missing {0}")]
    EmptyResponse(&'static str),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("audio cache write failed: {0}")]
    Cache(String),
}

pub trait LexicalGateway: Send + Sync {
    fn lookup(&self, text: &str) -> Result<LexicalDetails, GatewayError>;
}

pub trait SpeechGateway: Send + Sync {
    /// Raw 16-bit little-endian mono PCM at [`audio::SAMPLE_RATE`].
    fn synthesize(&self, text: &str) -> Result<Vec<u8>, GatewayError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupOutcome {
    Entry(LexicalDetails),
    /// The service thinks the input is misspelled and proposes this instead.
    Suggestion(String),
}

/// Decide whether a lookup produced an entry or a spelling suggestion.
///
/// A non-empty `didYouMean` that differs from the input (ignoring case) wins
/// over the returned details. A response without any Vietnamese meaning is
/// unusable.
pub fn classify(input: &str, details: LexicalDetails) -> Result<LookupOutcome, GatewayError> {
    if let Some(suggestion) = details.did_you_mean.as_deref().map(str::trim)
        && !suggestion.is_empty()
        && suggestion.to_lowercase() != input.trim().to_lowercase()
    {
        return Ok(LookupOutcome::Suggestion(suggestion.to_string()));
    }
    if details.vietnamese_meaning.trim().is_empty() {
        return Err(GatewayError::EmptyResponse("a Vietnamese meaning"));
    }
    Ok(LookupOutcome::Entry(details))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(did_you_mean: Option<&str>) -> LexicalDetails {
        LexicalDetails {
            phonetics: "/ˈæp.əl/".to_string(),
            part_of_speech: "noun".to_string(),
            vietnamese_meaning: "quả táo".to_string(),
            example: "An apple a day.".to_string(),
            did_you_mean: did_you_mean.map(str::to_string),
        }
    }

    #[test]
    fn suggestion_when_spelling_differs() {
        let outcome = classify("aple", details(Some("apple"))).unwrap();
        assert_eq!(outcome, LookupOutcome::Suggestion("apple".to_string()));
    }

    #[test]
    fn same_word_in_other_case_is_not_a_suggestion() {
        let outcome = classify("Apple", details(Some("apple"))).unwrap();
        assert!(matches!(outcome, LookupOutcome::Entry(_)));
    }

    #[test]
    fn empty_suggestion_is_ignored() {
        let outcome = classify("apple", details(Some("  "))).unwrap();
        assert!(matches!(outcome, LookupOutcome::Entry(_)));
        let outcome = classify("apple", details(None)).unwrap();
        assert!(matches!(outcome, LookupOutcome::Entry(_)));
    }

    #[test]
    fn missing_meaning_is_unusable() {
        let mut d = details(None);
        d.vietnamese_meaning = "\n".to_string();
        assert!(matches!(
            classify("apple", d),
            Err(GatewayError::EmptyResponse(_))
        ));
    }

    #[test]
    fn details_tolerate_missing_fields() {
        let d: LexicalDetails =
            serde_json::from_str(r#"{"vietnameseMeaning":"chạy","didYouMean":""}"#).unwrap();
        assert_eq!(d.vietnamese_meaning, "chạy");
        assert!(d.phonetics.is_empty());
        assert_eq!(d.did_you_mean.as_deref(), Some(""));
    }
}
