use std::collections::HashSet;
use std::time::Duration;

use vocabr::entry::{EntryType, VocabEntry};
use vocabr::session::flashcard::{FLIP_BACK_DELAY, FlashcardSession};
use vocabr::session::matching::{
    CardStatus, HINT_DURATION, MATCH_RESOLVE_DELAY, MISMATCH_CLEAR_DELAY, MatchPhase,
    MatchSession, SelectOutcome, WIN_DELAY,
};
use vocabr::session::random::{RngSource, ScriptedSource};
use vocabr::session::result::MatchOutcome;

fn entries(n: usize) -> Vec<VocabEntry> {
    (0..n)
        .map(|i| VocabEntry {
            id: format!("id{i}"),
            original: format!("term {i}"),
            phonetics: format!("/t{i}/"),
            part_of_speech: "noun".to_string(),
            vietnamese_meaning: format!("nghĩa {i}\nnghĩa khác {i}"),
            example: format!("Example {i}."),
            entry_type: EntryType::Word,
            timestamp: i as i64,
        })
        .collect()
}

/// Source and target card ids for every dealt pair, in card order.
fn pair_ids(game: &MatchSession) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for card in game.cards() {
        if !seen.insert(card.original_id.clone()) {
            continue;
        }
        let partner = game
            .cards()
            .iter()
            .find(|c| c.id != card.id && c.original_id == card.original_id)
            .unwrap();
        pairs.push((card.id.clone(), partner.id.clone()));
    }
    pairs
}

#[test]
fn full_matching_game_is_won() {
    let mut game = MatchSession::new(&entries(10), Box::new(RngSource::seeded(42))).unwrap();
    assert_eq!(game.pairs(), 8);

    for (a, b) in pair_ids(&game) {
        assert_eq!(game.select(&a), SelectOutcome::Selected);
        assert_eq!(game.select(&b), SelectOutcome::Matched);
        game.advance(MATCH_RESOLVE_DELAY);
    }
    assert!(game.is_complete());
    assert_eq!(game.phase(), MatchPhase::Playing);

    game.advance(WIN_DELAY);
    let summary = game.summary().unwrap();
    assert_eq!(summary.outcome, MatchOutcome::Win);
    assert_eq!(summary.matched, 8);
    assert_eq!(summary.correct, 8);
    assert_eq!(summary.incorrect, 0);
    assert_eq!(summary.accuracy, 100);
}

#[test]
fn countdown_runs_out_and_locks_the_board() {
    let mut game = MatchSession::new(&entries(3), Box::new(ScriptedSource::identity())).unwrap();
    assert_eq!(game.time_budget(), 45);

    game.advance(Duration::from_secs(44));
    assert_eq!(game.time_left(), 1);
    assert!(!game.is_finished());

    game.advance(Duration::from_secs(1));
    assert_eq!(game.phase(), MatchPhase::Finished(MatchOutcome::Timeout));

    let first = game.cards()[0].id.clone();
    assert_eq!(game.select(&first), SelectOutcome::Ignored);
    assert_eq!(game.hint(), None);
}

#[test]
fn mismatch_flashes_then_clears() {
    let mut game = MatchSession::new(&entries(4), Box::new(ScriptedSource::identity())).unwrap();
    assert_eq!(game.select("en-id0"), SelectOutcome::Selected);
    assert_eq!(game.select("vi-id1"), SelectOutcome::Mismatched);

    let wrong = game.card("en-id0").unwrap().clone();
    assert_eq!(game.card_status(&wrong), CardStatus::Wrong);
    // Board stays locked until the flash is over.
    assert_eq!(game.select("en-id2"), SelectOutcome::Ignored);

    game.advance(MISMATCH_CLEAR_DELAY);
    assert_eq!(game.card_status(&wrong), CardStatus::Idle);
    assert!(game.selected().is_empty());
    assert_eq!(game.incorrect(), 1);
    assert_eq!(game.select("en-id2"), SelectOutcome::Selected);
}

#[test]
fn pause_freezes_countdown_and_input() {
    let mut game = MatchSession::new(&entries(3), Box::new(ScriptedSource::identity())).unwrap();
    game.advance(Duration::from_secs(5));
    assert_eq!(game.time_left(), 40);

    assert!(game.toggle_pause());
    game.advance(Duration::from_secs(30));
    assert_eq!(game.time_left(), 40);
    assert_eq!(game.select("en-id0"), SelectOutcome::Ignored);
    assert_eq!(game.hint(), None);

    assert!(!game.toggle_pause());
    game.advance(Duration::from_secs(1));
    assert_eq!(game.time_left(), 39);
}

#[test]
fn hints_are_limited_and_expire() {
    let mut game = MatchSession::new(
        &entries(4),
        Box::new(ScriptedSource::identity().with_picks([2, 0])),
    )
    .unwrap();

    let hinted = game.hint().unwrap();
    let card = game.card(&format!("en-{hinted}")).unwrap().clone();
    assert_eq!(game.card_status(&card), CardStatus::Hinted);

    game.advance(HINT_DURATION);
    assert_eq!(game.card_status(&card), CardStatus::Idle);

    assert!(game.hint().is_some());
    assert_eq!(game.hints_left(), 0);
    assert_eq!(game.hint(), None);
}

#[test]
fn reset_deals_a_fresh_game() {
    let mut game = MatchSession::new(&entries(5), Box::new(RngSource::seeded(3))).unwrap();
    let (a, b) = pair_ids(&game).remove(0);
    game.select(&a);
    game.select(&b);
    game.advance(Duration::from_secs(3));
    assert_eq!(game.matched_count(), 1);

    game.reset();
    assert_eq!(game.matched_count(), 0);
    assert_eq!(game.correct(), 0);
    assert_eq!(game.time_left(), game.time_budget());
    assert_eq!(game.hints_left(), 2);
    assert_eq!(game.phase(), MatchPhase::Playing);
}

#[test]
fn flashcard_review_walks_the_whole_deck() {
    let deck = entries(3);
    let mut session = FlashcardSession::new(&deck, &mut ScriptedSource::reversed()).unwrap();
    assert_eq!(session.current().unwrap().id, "id2");

    session.flip();
    assert!(session.is_flipped());
    assert!(session.decide(true));
    assert!(!session.is_flipped());
    // The next card only shows once the flip-back finishes.
    assert_eq!(session.current().unwrap().id, "id2");
    session.advance(FLIP_BACK_DELAY);
    assert_eq!(session.current().unwrap().id, "id1");

    assert!(session.decide(false));
    session.advance(FLIP_BACK_DELAY);
    assert!(session.decide(true));

    let summary = session.summary().unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.learned, 2);
    assert_eq!(summary.not_learned, 1);
    assert!(session.current().is_none());
}
