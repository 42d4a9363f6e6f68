use std::path::PathBuf;

use thiserror::Error;

/// Failures that reach the user. Each one is caught where it happens and
/// turned into a status message or dropped; none of them ends the program.
#[derive(Debug, Error)]
pub enum VocabError {
    #[error("lookup failed for \"{input}\": {reason}")]
    LookupFailure { input: String, reason: String },

    #[error("speech synthesis failed for \"{term}\": {reason}")]
    SpeechFailure { term: String, reason: String },

    #[error("export failed: {0}")]
    ExportFailure(String),

    #[error("stored entries in {} were unreadable and have been discarded: {reason}", path.display())]
    StorageCorruption { path: PathBuf, reason: String },
}
