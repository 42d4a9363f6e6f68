pub mod flashcard;
pub mod matching;
pub mod random;
pub mod result;
pub mod timeline;

use std::time::Duration;

use thiserror::Error;

use crate::session::flashcard::FlashcardSession;
use crate::session::matching::MatchSession;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("need at least {needed} entries, have {available}")]
    NotEnoughEntries { needed: usize, available: usize },
}

/// The one review mode currently in progress.
pub enum ActiveSession {
    Flashcards(FlashcardSession),
    Matching(MatchSession),
}

impl ActiveSession {
    pub fn advance(&mut self, elapsed: Duration) {
        match self {
            ActiveSession::Flashcards(session) => session.advance(elapsed),
            ActiveSession::Matching(session) => session.advance(elapsed),
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            ActiveSession::Flashcards(session) => session.is_finished(),
            ActiveSession::Matching(session) => session.is_finished(),
        }
    }

    pub fn as_flashcards(&self) -> Option<&FlashcardSession> {
        match self {
            ActiveSession::Flashcards(session) => Some(session),
            ActiveSession::Matching(_) => None,
        }
    }

    pub fn as_matching(&self) -> Option<&MatchSession> {
        match self {
            ActiveSession::Matching(session) => Some(session),
            ActiveSession::Flashcards(_) => None,
        }
    }
}
