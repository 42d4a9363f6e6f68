use std::time::Duration;

use tracing::info;

use crate::entry::VocabEntry;
use crate::session::SessionError;
use crate::session::random::{RandomSource, shuffled};
use crate::session::result::FlashcardSummary;
use crate::session::timeline::Timeline;

pub const FLIP_BACK_DELAY: Duration = Duration::from_millis(150);

#[derive(Debug)]
enum FlashcardAction {
    NextCard,
}

/// Linear review over a deck shuffled once at construction.
pub struct FlashcardSession {
    deck: Vec<VocabEntry>,
    index: usize,
    flipped: bool,
    learned: usize,
    finished: bool,
    timeline: Timeline<FlashcardAction>,
}

impl FlashcardSession {
    pub fn new(entries: &[VocabEntry], random: &mut dyn RandomSource) -> Result<Self, SessionError> {
        if entries.is_empty() {
            return Err(SessionError::NotEnoughEntries {
                needed: 1,
                available: 0,
            });
        }
        Ok(Self {
            deck: shuffled(entries.to_vec(), random),
            index: 0,
            flipped: false,
            learned: 0,
            finished: false,
            timeline: Timeline::new(),
        })
    }

    pub fn current(&self) -> Option<&VocabEntry> {
        if self.finished {
            return None;
        }
        self.deck.get(self.index)
    }

    pub fn deck(&self) -> &[VocabEntry] {
        &self.deck
    }

    pub fn total(&self) -> usize {
        self.deck.len()
    }

    /// One-based position of the card on screen.
    pub fn position(&self) -> usize {
        (self.index + 1).min(self.deck.len())
    }

    pub fn progress(&self) -> f64 {
        self.position() as f64 / self.deck.len() as f64
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn learned(&self) -> usize {
        self.learned
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn advance_pending(&self) -> bool {
        !self.timeline.is_empty()
    }

    pub fn flip(&mut self) {
        if self.finished || self.advance_pending() {
            return;
        }
        self.flipped = !self.flipped;
    }

    /// Record a verdict for the current card. Returns false when ignored.
    pub fn decide(&mut self, learned: bool) -> bool {
        if self.finished || self.advance_pending() {
            return false;
        }
        if learned {
            self.learned += 1;
        }
        if self.index + 1 >= self.deck.len() {
            self.finish();
        } else {
            self.flipped = false;
            self.timeline
                .schedule(FLIP_BACK_DELAY, FlashcardAction::NextCard);
        }
        true
    }

    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.timeline.now() + elapsed;
        while let Some(action) = self.timeline.pop_due(target) {
            match action {
                FlashcardAction::NextCard => {
                    self.index = (self.index + 1).min(self.deck.len() - 1);
                }
            }
        }
        self.timeline.advance_to(target);
    }

    pub fn summary(&self) -> Option<FlashcardSummary> {
        self.finished
            .then(|| FlashcardSummary::new(self.deck.len(), self.learned))
    }

    fn finish(&mut self) {
        self.finished = true;
        self.flipped = false;
        self.timeline.clear();
        info!(
            total = self.deck.len(),
            learned = self.learned,
            "flashcard review finished"
        );
    }
}
