use std::fs;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use tempfile::TempDir;

use vocabr::app::{App, AppScreen, StatusKind};
use vocabr::config::Config;
use vocabr::entry::{EntryType, VocabEntry};
use vocabr::event::AppEvent;
use vocabr::gateway::audio::AudioCache;
use vocabr::gateway::{GatewayError, LexicalDetails, LexicalGateway, SpeechGateway};
use vocabr::session::matching::SelectOutcome;
use vocabr::store::entry_store::EntryStore;
use vocabr::ui::theme::Theme;

const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

struct FakeLexical;

impl LexicalGateway for FakeLexical {
    fn lookup(&self, text: &str) -> Result<LexicalDetails, GatewayError> {
        match text {
            "recieve" => Ok(LexicalDetails {
                did_you_mean: Some("receive".to_string()),
                ..LexicalDetails::default()
            }),
            "offline" => Err(GatewayError::Transport("connection refused".to_string())),
            _ => Ok(LexicalDetails {
                phonetics: "/rɪˈzɪl.jənt/".to_string(),
                part_of_speech: "adjective".to_string(),
                vietnamese_meaning: "kiên cường\nmau phục hồi".to_string(),
                example: format!("She is {text}."),
                did_you_mean: None,
            }),
        }
    }
}

struct FakeSpeech;

impl SpeechGateway for FakeSpeech {
    fn synthesize(&self, _text: &str) -> Result<Vec<u8>, GatewayError> {
        Ok(vec![0, 0, 1, 0])
    }
}

fn entry(i: usize) -> VocabEntry {
    VocabEntry {
        id: format!("id{i}"),
        original: format!("word{i}"),
        phonetics: String::new(),
        part_of_speech: "noun".to_string(),
        vietnamese_meaning: format!("nghĩa {i}"),
        example: String::new(),
        entry_type: EntryType::Word,
        timestamp: i as i64,
    }
}

fn app_with(entries: Vec<VocabEntry>, config: Config, audio: Option<AudioCache>) -> (App, Receiver<AppEvent>) {
    let (tx, rx) = mpsc::channel();
    let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
    let app = App::with_parts(
        config,
        theme,
        EntryStore::in_memory(entries),
        Arc::new(FakeLexical),
        Arc::new(FakeSpeech),
        audio,
        tx,
    )
    .with_seed(11);
    (app, rx)
}

/// Deliver the next background reply to the app.
fn pump(app: &mut App, rx: &Receiver<AppEvent>) {
    match rx.recv_timeout(REPLY_TIMEOUT).unwrap() {
        AppEvent::Lookup(reply) => app.finish_lookup(reply),
        AppEvent::Speech(reply) => app.finish_speech(reply),
        _ => panic!("unexpected event"),
    }
}

#[test]
fn lookup_adds_entry_at_top() {
    let (mut app, rx) = app_with(vec![entry(0)], Config::default(), None);
    app.selected = 0;
    app.cycle_entry_type(true);
    app.input.set("  resilient ");
    app.submit_input();
    assert_eq!(app.pending_lookup.as_deref(), Some("resilient"));

    pump(&mut app, &rx);
    assert!(app.pending_lookup.is_none());
    assert_eq!(app.store.len(), 2);
    let added = app.store.get(0).unwrap();
    assert_eq!(added.original, "resilient");
    assert_eq!(added.part_of_speech, "adjective");
    assert_eq!(added.entry_type, EntryType::Phrase);
    assert!(app.input.is_blank());
    assert_eq!(app.selected, 0);
    assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Info));
}

#[test]
fn blank_input_never_starts_a_lookup() {
    let (mut app, rx) = app_with(Vec::new(), Config::default(), None);
    app.input.set("   ");
    app.submit_input();
    assert!(app.pending_lookup.is_none());
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
}

#[test]
fn second_lookup_is_refused_while_one_is_running() {
    let (mut app, rx) = app_with(Vec::new(), Config::default(), None);
    app.input.set("first");
    app.submit_input();
    app.input.set("second");
    app.submit_input();
    assert_eq!(app.pending_lookup.as_deref(), Some("first"));

    pump(&mut app, &rx);
    assert_eq!(app.store.len(), 1);
    assert_eq!(app.store.get(0).unwrap().original, "first");
}

#[test]
fn misspelling_offers_suggestion_that_can_be_accepted() {
    let (mut app, rx) = app_with(Vec::new(), Config::default(), None);
    app.input.set("recieve");
    app.submit_input();
    pump(&mut app, &rx);

    assert_eq!(app.suggestion.as_deref(), Some("receive"));
    assert!(app.store.is_empty());

    app.accept_suggestion();
    assert!(app.suggestion.is_none());
    assert_eq!(app.input.value(), "receive");
    pump(&mut app, &rx);
    assert_eq!(app.store.get(0).unwrap().original, "receive");
}

#[test]
fn dismissed_suggestion_keeps_input() {
    let (mut app, rx) = app_with(Vec::new(), Config::default(), None);
    app.input.set("recieve");
    app.submit_input();
    pump(&mut app, &rx);

    app.dismiss_suggestion();
    assert!(app.suggestion.is_none());
    assert_eq!(app.input.value(), "recieve");
    assert!(app.store.is_empty());
}

#[test]
fn failed_lookup_reports_error_and_keeps_list() {
    let (mut app, rx) = app_with(vec![entry(0)], Config::default(), None);
    app.input.set("offline");
    app.submit_input();
    pump(&mut app, &rx);

    assert_eq!(app.store.len(), 1);
    assert_eq!(app.input.value(), "offline");
    assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
}

#[test]
fn delete_keeps_selection_in_range() {
    let (mut app, _rx) = app_with(vec![entry(0), entry(1), entry(2)], Config::default(), None);
    app.select_next();
    app.select_next();
    app.select_next();
    assert_eq!(app.selected, 2);

    app.delete_selected();
    assert_eq!(app.store.len(), 2);
    assert_eq!(app.selected, 1);

    app.delete_selected();
    app.delete_selected();
    assert!(app.store.is_empty());
    assert_eq!(app.selected, 0);
    app.delete_selected();
}

#[test]
fn matching_needs_three_entries() {
    let (mut app, _rx) = app_with(vec![entry(0), entry(1)], Config::default(), None);
    app.start_matching();
    assert_eq!(app.screen, AppScreen::Home);
    assert!(app.session.is_none());
    assert!(app.status.is_some());

    let (mut app, _rx) = app_with((0..3).map(entry).collect(), Config::default(), None);
    app.start_matching();
    assert_eq!(app.screen, AppScreen::Matching);
    assert_eq!(app.matching().unwrap().pairs(), 3);

    app.exit_session();
    assert_eq!(app.screen, AppScreen::Home);
    assert!(app.session.is_none());
}

#[test]
fn flashcards_need_one_entry() {
    let (mut app, _rx) = app_with(Vec::new(), Config::default(), None);
    app.start_flashcards();
    assert_eq!(app.screen, AppScreen::Home);

    let (mut app, _rx) = app_with(vec![entry(0)], Config::default(), None);
    app.start_flashcards();
    assert_eq!(app.screen, AppScreen::Flashcards);
    app.flash_flip();
    assert!(app.flashcards().unwrap().is_flipped());
    app.flash_decide(true);
    let summary = app.flashcards().unwrap().summary().unwrap();
    assert_eq!(summary.learned, 1);

    app.restart_session();
    assert!(!app.flashcards().unwrap().is_finished());
}

fn mismatch_cursor(app: &App) -> usize {
    let cards = app.matching().unwrap().cards();
    cards
        .iter()
        .position(|c| c.original_id != cards[0].original_id)
        .unwrap()
}

#[test]
fn wrong_pair_rings_bell_when_enabled() {
    let (mut app, _rx) = app_with((0..4).map(entry).collect(), Config::default(), None);
    app.start_matching();
    app.board_cursor = 0;
    assert_eq!(app.match_select(), SelectOutcome::Selected);
    app.board_cursor = mismatch_cursor(&app);
    assert_eq!(app.match_select(), SelectOutcome::Mismatched);
    assert!(app.take_bell());
    assert!(!app.take_bell());

    let config = Config {
        sound_effects: false,
        ..Config::default()
    };
    let (mut quiet, _rx) = app_with((0..4).map(entry).collect(), config, None);
    quiet.start_matching();
    quiet.match_select();
    quiet.board_cursor = mismatch_cursor(&quiet);
    assert_eq!(quiet.match_select(), SelectOutcome::Mismatched);
    assert!(!quiet.take_bell());
}

#[test]
fn timeout_rings_bell_once() {
    let (mut app, _rx) = app_with((0..3).map(entry).collect(), Config::default(), None);
    app.start_matching();
    app.advance(Duration::from_secs(44));
    assert!(!app.take_bell());
    app.advance(Duration::from_secs(1));
    assert!(app.matching().unwrap().is_finished());
    assert!(app.take_bell());

    app.advance(Duration::from_secs(5));
    assert!(!app.take_bell());
}

#[test]
fn restart_resets_matching_board() {
    let (mut app, _rx) = app_with((0..3).map(entry).collect(), Config::default(), None);
    app.start_matching();
    app.match_hint();
    app.advance(Duration::from_secs(10));
    app.board_cursor = 4;

    app.restart_session();
    let game = app.matching().unwrap();
    assert_eq!(game.hints_left(), 2);
    assert_eq!(game.time_left(), game.time_budget());
    assert_eq!(app.board_cursor, 0);
}

#[test]
fn export_writes_docx_into_configured_dir() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        export_dir: dir.path().to_string_lossy().to_string(),
        ..Config::default()
    };
    let (mut app, _rx) = app_with(vec![entry(0), entry(1)], config, None);
    app.export();
    assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Info));

    let files: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("Vocab_List_"));
    assert!(files[0].ends_with(".docx"));
}

#[test]
fn export_with_no_entries_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        export_dir: dir.path().to_string_lossy().to_string(),
        ..Config::default()
    };
    let (mut app, _rx) = app_with(Vec::new(), config, None);
    app.export();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn pronunciation_is_cached_on_disk() {
    let dir = TempDir::new().unwrap();
    let cache = AudioCache::new(dir.path()).unwrap();
    let expected = cache.path_for("word0");
    let (mut app, rx) = app_with(vec![entry(0)], Config::default(), Some(cache));

    app.speak_selected();
    assert_eq!(app.speaking.as_deref(), Some("word0"));
    pump(&mut app, &rx);
    assert!(app.speaking.is_none());
    assert!(expected.exists());
}

#[cfg(unix)]
#[test]
fn pronunciation_plays_before_reply_arrives() {
    let dir = TempDir::new().unwrap();
    let cache = AudioCache::new(dir.path()).unwrap();
    let config = Config {
        audio_player: "true".to_string(),
        ..Config::default()
    };
    let expected = cache.path_for("word0");
    let (mut app, rx) = app_with(vec![entry(0)], config, Some(cache));

    app.speak_selected();
    pump(&mut app, &rx);
    assert!(app.speaking.is_none());
    assert!(expected.exists());
}
