//! Matching game: pair each English term with its Vietnamese meaning before
//! the countdown runs out.
//!
//! The session is a plain state machine. The host feeds it card selections
//! and wall-clock deltas through [`MatchSession::advance`]; every visual
//! delay (match resolution, mismatch flash, hint glow, win banner) is a
//! deferred action on the session's own [`Timeline`], so a reset or a dropped
//! session cancels them all.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, info};

use crate::entry::VocabEntry;
use crate::session::SessionError;
use crate::session::random::{RandomSource, shuffled};
use crate::session::result::{MatchOutcome, MatchSummary, accuracy_percent};
use crate::session::timeline::Timeline;

pub const MAX_PAIRS: usize = 8;
pub const MIN_MATCH_ENTRIES: usize = 3;
pub const SECONDS_PER_PAIR: u32 = 15;
pub const HINTS_PER_GAME: u32 = 2;

pub const TICK: Duration = Duration::from_secs(1);
pub const MATCH_RESOLVE_DELAY: Duration = Duration::from_millis(300);
pub const MISMATCH_CLEAR_DELAY: Duration = Duration::from_millis(600);
pub const HINT_DURATION: Duration = Duration::from_millis(1500);
pub const WIN_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardSide {
    /// English term.
    Source,
    /// First Vietnamese meaning.
    Target,
}

impl CardSide {
    fn prefix(self) -> &'static str {
        match self {
            CardSide::Source => "en",
            CardSide::Target => "vi",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchCard {
    pub id: String,
    pub original_id: String,
    pub content: String,
    pub side: CardSide,
}

impl MatchCard {
    fn new(entry: &VocabEntry, side: CardSide) -> Self {
        let content = match side {
            CardSide::Source => entry.original.clone(),
            CardSide::Target => entry.first_meaning().to_string(),
        };
        Self {
            id: format!("{}-{}", side.prefix(), entry.id),
            original_id: entry.id.clone(),
            content,
            side,
        }
    }

    pub fn pairs_with(&self, other: &MatchCard) -> bool {
        self.original_id == other.original_id && self.side != other.side
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPhase {
    Playing,
    Finished(MatchOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Ignored,
    Selected,
    Matched,
    Mismatched,
}

/// How a card should be drawn right now, highest precedence first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardStatus {
    Matched,
    Wrong,
    Selected,
    Hinted,
    Idle,
}

#[derive(Debug)]
enum MatchAction {
    ResolveMatch(String),
    ClearMismatch,
    ClearHint(u64),
    Finish(MatchOutcome),
}

pub struct MatchSession {
    pool: Vec<VocabEntry>,
    cards: Vec<MatchCard>,
    pairs: usize,
    selected: Vec<String>,
    matched: HashSet<String>,
    wrong: HashSet<String>,
    hinted: HashSet<String>,
    hint_generation: u64,
    correct: u32,
    incorrect: u32,
    hints_left: u32,
    time_budget: u32,
    time_left: u32,
    paused: bool,
    phase: MatchPhase,
    second_started: Duration,
    timeline: Timeline<MatchAction>,
    random: Box<dyn RandomSource>,
}

impl MatchSession {
    pub fn new(entries: &[VocabEntry], random: Box<dyn RandomSource>) -> Result<Self, SessionError> {
        if entries.len() < MIN_MATCH_ENTRIES {
            return Err(SessionError::NotEnoughEntries {
                needed: MIN_MATCH_ENTRIES,
                available: entries.len(),
            });
        }
        let mut session = Self {
            pool: entries.to_vec(),
            cards: Vec::new(),
            pairs: 0,
            selected: Vec::new(),
            matched: HashSet::new(),
            wrong: HashSet::new(),
            hinted: HashSet::new(),
            hint_generation: 0,
            correct: 0,
            incorrect: 0,
            hints_left: HINTS_PER_GAME,
            time_budget: 0,
            time_left: 0,
            paused: false,
            phase: MatchPhase::Playing,
            second_started: Duration::ZERO,
            timeline: Timeline::new(),
            random,
        };
        session.reset();
        Ok(session)
    }

    /// Deal a fresh deck and restore every counter to its starting value.
    pub fn reset(&mut self) {
        self.cards = deal(&self.pool, self.random.as_mut());
        self.pairs = self.cards.len() / 2;
        self.time_budget = SECONDS_PER_PAIR * self.pairs as u32;
        self.time_left = self.time_budget;
        self.selected.clear();
        self.matched.clear();
        self.wrong.clear();
        self.hinted.clear();
        self.correct = 0;
        self.incorrect = 0;
        self.hints_left = HINTS_PER_GAME;
        self.paused = false;
        self.phase = MatchPhase::Playing;
        self.timeline = Timeline::new();
        self.second_started = Duration::ZERO;
        debug!(pairs = self.pairs, budget = self.time_budget, "matching deck dealt");
    }

    pub fn cards(&self) -> &[MatchCard] {
        &self.cards
    }

    pub fn card(&self, card_id: &str) -> Option<&MatchCard> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn pairs(&self) -> usize {
        self.pairs
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    pub fn is_matched(&self, entry_id: &str) -> bool {
        self.matched.contains(entry_id)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    pub fn hints_left(&self) -> u32 {
        self.hints_left
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn time_budget(&self) -> u32 {
        self.time_budget
    }

    pub fn time_ratio(&self) -> f64 {
        if self.time_budget == 0 {
            return 0.0;
        }
        self.time_left as f64 / self.time_budget as f64
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, MatchPhase::Finished(_))
    }

    /// Every dealt pair is in the matched set.
    pub fn is_complete(&self) -> bool {
        self.pairs > 0 && self.matched.len() == self.pairs
    }

    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.correct, self.incorrect)
    }

    pub fn card_status(&self, card: &MatchCard) -> CardStatus {
        if self.matched.contains(&card.original_id) {
            CardStatus::Matched
        } else if self.wrong.contains(&card.id) {
            CardStatus::Wrong
        } else if self.selected.contains(&card.id) {
            CardStatus::Selected
        } else if self.hinted.contains(&card.id) {
            CardStatus::Hinted
        } else {
            CardStatus::Idle
        }
    }

    pub fn summary(&self) -> Option<MatchSummary> {
        let MatchPhase::Finished(outcome) = self.phase else {
            return None;
        };
        Some(MatchSummary {
            outcome,
            pairs: self.pairs,
            matched: self.matched.len(),
            correct: self.correct,
            incorrect: self.incorrect,
            accuracy: self.accuracy(),
            time_left: self.time_left,
            time_budget: self.time_budget,
        })
    }

    pub fn select(&mut self, card_id: &str) -> SelectOutcome {
        if self.is_finished() || self.paused || self.selected.len() >= 2 {
            return SelectOutcome::Ignored;
        }
        let Some(card) = self.card(card_id) else {
            return SelectOutcome::Ignored;
        };
        if self.matched.contains(&card.original_id) || self.selected.iter().any(|id| id == card_id) {
            return SelectOutcome::Ignored;
        }

        self.selected.push(card_id.to_string());
        if self.selected.len() < 2 {
            return SelectOutcome::Selected;
        }

        let (first, second) = match (self.card(&self.selected[0]), self.card(&self.selected[1])) {
            (Some(a), Some(b)) => (a, b),
            _ => return SelectOutcome::Ignored,
        };
        if first.pairs_with(second) {
            let entry_id = first.original_id.clone();
            self.correct += 1;
            self.timeline
                .schedule(MATCH_RESOLVE_DELAY, MatchAction::ResolveMatch(entry_id));
            SelectOutcome::Matched
        } else {
            self.incorrect += 1;
            self.wrong = self.selected.iter().cloned().collect();
            self.timeline
                .schedule(MISMATCH_CLEAR_DELAY, MatchAction::ClearMismatch);
            SelectOutcome::Mismatched
        }
    }

    /// Highlight both cards of one random unmatched entry. Returns the entry id.
    pub fn hint(&mut self) -> Option<String> {
        if self.hints_left == 0 || self.paused || self.is_finished() {
            return None;
        }
        let unmatched: Vec<&MatchCard> = self
            .cards
            .iter()
            .filter(|c| !self.matched.contains(&c.original_id))
            .collect();
        if unmatched.is_empty() {
            return None;
        }
        let entry_id = unmatched[self.random.pick(unmatched.len())]
            .original_id
            .clone();

        self.hinted = self
            .cards
            .iter()
            .filter(|c| c.original_id == entry_id)
            .map(|c| c.id.clone())
            .collect();
        self.hints_left -= 1;
        self.hint_generation += 1;
        self.timeline
            .schedule(HINT_DURATION, MatchAction::ClearHint(self.hint_generation));
        Some(entry_id)
    }

    /// Re-randomize display order without touching game state.
    pub fn shuffle(&mut self) {
        if self.is_finished() {
            return;
        }
        let cards = std::mem::take(&mut self.cards);
        self.cards = shuffled(cards, self.random.as_mut());
    }

    /// Returns the new pause state.
    pub fn toggle_pause(&mut self) -> bool {
        if self.is_finished() {
            return self.paused;
        }
        self.paused = !self.paused;
        if !self.paused {
            // A resumed countdown starts a full second from now.
            self.second_started = self.timeline.now();
        }
        self.paused
    }

    /// Move the session clock forward, firing deferred actions and countdown
    /// ticks in time order. An action due exactly on a second boundary runs
    /// before that boundary's tick, so a final match that lands as the clock
    /// expires still wins.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.timeline.now() + elapsed;
        loop {
            let next_tick = self
                .countdown_running()
                .then(|| self.second_started + TICK);
            let next_due = self.timeline.next_due();

            match (next_due, next_tick) {
                (Some(due), tick) if due <= target && tick.is_none_or(|t| due <= t) => {
                    if let Some(action) = self.timeline.pop_due(due) {
                        self.apply(action);
                    }
                }
                (_, Some(tick)) if tick <= target => {
                    self.timeline.advance_to(tick);
                    self.second_started = tick;
                    self.countdown_tick();
                }
                _ => break,
            }
        }
        self.timeline.advance_to(target);
    }

    fn countdown_running(&self) -> bool {
        self.phase == MatchPhase::Playing && !self.paused && !self.is_complete()
    }

    fn countdown_tick(&mut self) {
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            self.finish(MatchOutcome::Timeout);
        }
    }

    fn apply(&mut self, action: MatchAction) {
        match action {
            MatchAction::ResolveMatch(entry_id) => {
                self.matched.insert(entry_id);
                self.selected.clear();
                if self.is_complete() && self.phase == MatchPhase::Playing {
                    self.timeline
                        .schedule(WIN_DELAY, MatchAction::Finish(MatchOutcome::Win));
                }
            }
            MatchAction::ClearMismatch => {
                self.selected.clear();
                self.wrong.clear();
            }
            MatchAction::ClearHint(generation) => {
                if generation == self.hint_generation {
                    self.hinted.clear();
                }
            }
            MatchAction::Finish(outcome) => self.finish(outcome),
        }
    }

    fn finish(&mut self, outcome: MatchOutcome) {
        if self.phase != MatchPhase::Playing {
            return;
        }
        self.phase = MatchPhase::Finished(outcome);
        self.paused = false;
        self.timeline.clear();
        self.selected.clear();
        self.wrong.clear();
        self.hinted.clear();
        info!(
            ?outcome,
            matched = self.matched.len(),
            pairs = self.pairs,
            correct = self.correct,
            incorrect = self.incorrect,
            time_left = self.time_left,
            "matching game finished"
        );
    }
}

/// Pick up to [`MAX_PAIRS`] distinct entries and lay out both cards of each
/// in random order.
fn deal(pool: &[VocabEntry], random: &mut dyn RandomSource) -> Vec<MatchCard> {
    let mut seen = HashSet::new();
    let picked: Vec<&VocabEntry> = random
        .permutation(pool.len())
        .into_iter()
        .filter_map(|i| pool.get(i))
        .filter(|e| seen.insert(e.id.clone()))
        .take(MAX_PAIRS)
        .collect();

    let cards: Vec<MatchCard> = picked
        .iter()
        .map(|e| MatchCard::new(e, CardSide::Source))
        .chain(picked.iter().map(|e| MatchCard::new(e, CardSide::Target)))
        .collect();
    shuffled(cards, random)
}
