use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use chrono::Local;
use rust_i18n::t;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::entry::{EntryType, VocabEntry};
use crate::error::VocabError;
use crate::event::{AppEvent, LookupReply, SpeechReply};
use crate::export;
use crate::gateway::audio::{self, AudioCache};
use crate::gateway::gemini::GeminiClient;
use crate::gateway::{LexicalGateway, LookupOutcome, SpeechGateway, classify};
use crate::session::ActiveSession;
use crate::session::flashcard::FlashcardSession;
use crate::session::matching::{MIN_MATCH_ENTRIES, MatchPhase, MatchSession, SelectOutcome};
use crate::session::random::RngSource;
use crate::session::result::MatchOutcome;
use crate::store::entry_store::EntryStore;
use crate::store::json_store::JsonStore;
use crate::ui::components::match_board::{CursorMove, move_cursor};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Flashcards,
    Matching,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: &'static Theme,
    pub store: EntryStore,
    pub input: LineInput,
    pub entry_type: EntryType,
    pub selected: usize,
    pub status: Option<Status>,
    pub suggestion: Option<String>,
    pub pending_lookup: Option<String>,
    pub speaking: Option<String>,
    pub session: Option<ActiveSession>,
    pub board_cursor: usize,
    pub should_quit: bool,
    bell: bool,
    rng_seed: Option<u64>,
    lexical: Arc<dyn LexicalGateway>,
    speech: Arc<dyn SpeechGateway>,
    audio_cache: Option<Arc<AudioCache>>,
    events: Sender<AppEvent>,
}

impl App {
    /// Production wiring: entries under `data_dir`, Gemini for both gateways.
    pub fn new(config: Config, data_dir: &Path, events: Sender<AppEvent>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let (store, problem) = match JsonStore::with_base_dir(data_dir.to_path_buf()) {
            Ok(backend) => EntryStore::open(backend),
            Err(e) => {
                warn!(error = %e, "data directory unavailable, entries will not be saved");
                (EntryStore::in_memory(Vec::new()), None)
            }
        };

        let audio_cache = match AudioCache::new(&data_dir.join("audio")) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!(error = %e, "audio cache unavailable");
                None
            }
        };

        let client = Arc::new(GeminiClient::from_config(&config));
        let mut app = Self::with_parts(
            config,
            theme,
            store,
            client.clone(),
            client,
            audio_cache,
            events,
        );
        if problem.is_some() {
            app.status = Some(Status::error(t!("status.storage_reset")));
        }
        app
    }

    pub fn with_parts(
        config: Config,
        theme: &'static Theme,
        store: EntryStore,
        lexical: Arc<dyn LexicalGateway>,
        speech: Arc<dyn SpeechGateway>,
        audio_cache: Option<AudioCache>,
        events: Sender<AppEvent>,
    ) -> Self {
        let entry_type = config.default_entry_type;
        Self {
            screen: AppScreen::Home,
            config,
            theme,
            store,
            input: LineInput::default(),
            entry_type,
            selected: 0,
            status: None,
            suggestion: None,
            pending_lookup: None,
            speaking: None,
            session: None,
            board_cursor: 0,
            should_quit: false,
            bell: false,
            rng_seed: None,
            lexical,
            speech,
            audio_cache: audio_cache.map(Arc::new),
            events,
        }
    }

    /// Make every deck order reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    fn random(&self) -> RngSource {
        match self.rng_seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_entropy(),
        }
    }

    /// True once per requested bell.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    fn ring(&mut self) {
        if self.config.sound_effects {
            self.bell = true;
        }
    }

    pub fn selected_entry(&self) -> Option<&VocabEntry> {
        self.store.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.store.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_entry_type(&mut self, forward: bool) {
        self.entry_type = if forward {
            self.entry_type.next()
        } else {
            self.entry_type.prev()
        };
    }

    // --- lookups ---

    pub fn submit_input(&mut self) {
        if self.input.is_blank() {
            return;
        }
        let text = self.input.value().trim().to_string();
        self.start_lookup(text);
    }

    fn start_lookup(&mut self, text: String) {
        if self.pending_lookup.is_some() {
            self.status = Some(Status::info(t!("status.busy")));
            return;
        }
        self.status = None;
        self.suggestion = None;
        self.pending_lookup = Some(text.clone());
        info!(input = %text, entry_type = self.entry_type.as_str(), "lookup started");

        let gateway = Arc::clone(&self.lexical);
        let tx = self.events.clone();
        let entry_type = self.entry_type;
        thread::spawn(move || {
            let result = gateway.lookup(&text);
            let _ = tx.send(AppEvent::Lookup(LookupReply {
                input: text,
                entry_type,
                result,
            }));
        });
    }

    pub fn finish_lookup(&mut self, reply: LookupReply) {
        self.pending_lookup = None;
        let LookupReply {
            input,
            entry_type,
            result,
        } = reply;

        match result.and_then(|details| classify(&input, details)) {
            Ok(LookupOutcome::Suggestion(word)) => {
                debug!(input = %input, suggestion = %word, "spelling suggestion");
                self.suggestion = Some(word);
            }
            Ok(LookupOutcome::Entry(details)) => {
                let entry = VocabEntry::from_lookup(&input, details, entry_type);
                self.status = Some(Status::info(t!("status.added", word = entry.original)));
                self.store.add(entry);
                self.input.clear();
                self.selected = 0;
            }
            Err(e) => {
                let err = VocabError::LookupFailure {
                    input,
                    reason: e.to_string(),
                };
                warn!(error = %err, "lookup failed");
                self.status = Some(Status::error(t!("status.lookup_failed")));
            }
        }
    }

    pub fn accept_suggestion(&mut self) {
        if let Some(word) = self.suggestion.take() {
            self.input.set(&word);
            self.start_lookup(word);
        }
    }

    pub fn dismiss_suggestion(&mut self) {
        self.suggestion = None;
    }

    // --- entries ---

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_entry().map(|e| e.id.clone()) else {
            return;
        };
        if let Some(removed) = self.store.remove(&id) {
            self.status = Some(Status::info(t!("status.deleted", word = removed.original)));
        }
        if self.selected >= self.store.len() {
            self.selected = self.store.len().saturating_sub(1);
        }
    }

    pub fn export(&mut self) {
        let dir = self.config.export_path();
        let today = Local::now().date_naive();
        self.status = Some(match export::export_to_dir(self.store.entries(), &dir, today) {
            Ok(Some(path)) => Status::info(t!("status.exported", path = path.display())),
            Ok(None) => Status::info(t!("status.export_empty")),
            Err(e) => {
                warn!(error = %e, "export failed");
                Status::error(t!("status.export_failed", reason = e))
            }
        });
    }

    // --- pronunciation ---

    pub fn speak_selected(&mut self) {
        if let Some(term) = self.selected_entry().map(|e| e.original.clone()) {
            self.speak(term);
        }
    }

    pub fn speak_current_card(&mut self) {
        let term = self
            .session
            .as_ref()
            .and_then(ActiveSession::as_flashcards)
            .and_then(FlashcardSession::current)
            .map(|e| e.original.clone());
        if let Some(term) = term {
            self.speak(term);
        }
    }

    fn speak(&mut self, term: String) {
        if self.speaking.is_some() {
            return;
        }
        let Some(cache) = self.audio_cache.clone() else {
            return;
        };
        self.speaking = Some(term.clone());
        let gateway = Arc::clone(&self.speech);
        let player = self.config.audio_player.clone();
        let tx = self.events.clone();
        thread::spawn(move || {
            let result = audio::pronounce(gateway.as_ref(), &cache, &term);
            if let Ok(path) = &result {
                if !audio::play(&player, path) {
                    debug!(path = %path.display(), "pronunciation cached, not played");
                }
            }
            let _ = tx.send(AppEvent::Speech(SpeechReply { term, result }));
        });
    }

    pub fn finish_speech(&mut self, reply: SpeechReply) {
        self.speaking = None;
        match reply.result {
            Ok(path) => debug!(term = %reply.term, path = %path.display(), "pronunciation finished"),
            Err(e) => {
                let err = VocabError::SpeechFailure {
                    term: reply.term,
                    reason: e.to_string(),
                };
                warn!(error = %err, "speech synthesis failed");
            }
        }
    }

    // --- sessions ---

    pub fn start_flashcards(&mut self) {
        let mut random = self.random();
        match FlashcardSession::new(self.store.entries(), &mut random) {
            Ok(session) => {
                info!(cards = session.total(), "flashcard review started");
                self.session = Some(ActiveSession::Flashcards(session));
                self.screen = AppScreen::Flashcards;
                self.status = None;
            }
            Err(e) => {
                debug!(error = %e, "flashcards not started");
                self.status = Some(Status::info(t!("status.need_entries", count = 1)));
            }
        }
    }

    pub fn start_matching(&mut self) {
        match MatchSession::new(self.store.entries(), Box::new(self.random())) {
            Ok(session) => {
                info!(pairs = session.pairs(), "matching game started");
                self.session = Some(ActiveSession::Matching(session));
                self.screen = AppScreen::Matching;
                self.board_cursor = 0;
                self.status = None;
            }
            Err(e) => {
                debug!(error = %e, "matching not started");
                self.status = Some(Status::info(t!(
                    "status.need_entries",
                    count = MIN_MATCH_ENTRIES
                )));
            }
        }
    }

    /// Drop the running session and everything it had scheduled.
    pub fn exit_session(&mut self) {
        self.session = None;
        self.board_cursor = 0;
        self.screen = AppScreen::Home;
    }

    /// Start the current mode over.
    pub fn restart_session(&mut self) {
        match self.screen {
            AppScreen::Flashcards => self.start_flashcards(),
            AppScreen::Matching => {
                if let Some(game) = self.matching_mut() {
                    game.reset();
                }
                self.board_cursor = 0;
            }
            AppScreen::Home => {}
        }
    }

    /// Feed wall-clock time into the running session.
    pub fn advance(&mut self, elapsed: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let was_playing = session.as_matching().is_some_and(|g| !g.is_finished());
        session.advance(elapsed);
        let timed_out = session
            .as_matching()
            .is_some_and(|g| g.phase() == MatchPhase::Finished(MatchOutcome::Timeout));
        if was_playing && timed_out {
            self.ring();
        }
    }

    pub fn flashcards(&self) -> Option<&FlashcardSession> {
        self.session.as_ref().and_then(ActiveSession::as_flashcards)
    }

    pub fn matching(&self) -> Option<&MatchSession> {
        self.session.as_ref().and_then(ActiveSession::as_matching)
    }

    fn flashcards_mut(&mut self) -> Option<&mut FlashcardSession> {
        match self.session.as_mut() {
            Some(ActiveSession::Flashcards(session)) => Some(session),
            _ => None,
        }
    }

    fn matching_mut(&mut self) -> Option<&mut MatchSession> {
        match self.session.as_mut() {
            Some(ActiveSession::Matching(session)) => Some(session),
            _ => None,
        }
    }

    pub fn flash_flip(&mut self) {
        if let Some(session) = self.flashcards_mut() {
            session.flip();
        }
    }

    pub fn flash_decide(&mut self, learned: bool) {
        if let Some(session) = self.flashcards_mut() {
            session.decide(learned);
        }
    }

    pub fn match_move(&mut self, step: CursorMove, columns: usize) {
        let len = self.matching().map_or(0, |g| g.cards().len());
        self.board_cursor = move_cursor(self.board_cursor, len, columns, step);
    }

    pub fn match_select(&mut self) -> SelectOutcome {
        let cursor = self.board_cursor;
        let Some(game) = self.matching_mut() else {
            return SelectOutcome::Ignored;
        };
        let Some(card_id) = game.cards().get(cursor).map(|c| c.id.clone()) else {
            return SelectOutcome::Ignored;
        };
        let outcome = game.select(&card_id);
        if outcome == SelectOutcome::Mismatched {
            self.ring();
        }
        outcome
    }

    pub fn match_hint(&mut self) {
        if let Some(game) = self.matching_mut() {
            game.hint();
        }
    }

    pub fn match_shuffle(&mut self) {
        if let Some(game) = self.matching_mut() {
            game.shuffle();
        }
    }

    pub fn match_toggle_pause(&mut self) {
        if let Some(game) = self.matching_mut() {
            game.toggle_pause();
        }
    }
}
