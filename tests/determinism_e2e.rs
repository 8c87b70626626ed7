//! End-to-end determinism tests
//!
//! A match is a pure function of its decks and seed: playing it twice must
//! produce the same event log. Tests are generated for each `.deck` file in
//! `decks/` by the `dir-test` macro.

mod common;

use common::catalog;
use dir_test::{dir_test, Fixture};
use similar_asserts::assert_eq;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use tcg_engine::core::PlayerName;
use tcg_engine::game::{
    EventClock, GameLoop, GameResult, GameState, HeuristicPlanner, PerSide, RulesConfig,
    SeededCoins, Side, TrainerTable, VerbosityLevel,
};
use tcg_engine::loader::{CardDatabase, DeckList, DeckLoader, GameInitializer};

fn play(db: &CardDatabase, player: &DeckList, opponent: &DeckList, seed: u64) -> (GameResult, GameState) {
    let mut coins = SeededCoins::new(seed);
    let game = GameInitializer::new(db)
        .init_match(
            PerSide::new(PlayerName::new("Alice"), PlayerName::new("Bob")),
            PerSide::new(player, opponent),
            RulesConfig {
                event_clock: EventClock::Logical,
                ..RulesConfig::default()
            },
            Arc::new(TrainerTable::standard()),
            &mut coins,
        )
        .unwrap();
    let mut p1 = HeuristicPlanner::new(Side::Player);
    let mut p2 = HeuristicPlanner::new(Side::Opponent);
    let mut game_loop = GameLoop::new(game, &mut coins).with_verbosity(VerbosityLevel::Silent);
    let result = game_loop.run_game(&mut p1, &mut p2).unwrap();
    (result, game_loop.game)
}

/// Run the binary and drop the catalog load line, which carries a timing
fn run_binary(deck: &str, seed: u64) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_tcg"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["play", deck, deck, "--seed", &seed.to_string(), "--verbosity=verbose"])
        .output()
        .expect("Failed to run tcg binary");
    assert!(output.status.success(), "tcg exited with {:?}", output.status);
    String::from_utf8(output.stdout)
        .expect("Invalid UTF-8 in stdout")
        .lines()
        .filter(|line| !line.starts_with("Loaded "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/decks",
    glob: "**/*.deck",
)]
fn test_deck_determinism(fixture: Fixture<&str>) {
    let db = catalog();
    let deck = DeckLoader::parse(fixture.content()).unwrap();

    let (result1, game1) = play(&db, &deck, &deck, 42);
    let (result2, game2) = play(&db, &deck, &deck, 42);

    assert!(!game1.events.is_empty());
    assert_eq!(result1, result2, "{} changed result with the same seed", fixture.path());
    assert_eq!(game1.events.messages(), game2.events.messages());
    assert_eq!(game1, game2);
}

#[test]
fn test_different_seeds_diverge() {
    let db = catalog();
    let fire = DeckLoader::load_from_file(Path::new("decks/fire.deck")).unwrap();
    let water = DeckLoader::load_from_file(Path::new("decks/water.deck")).unwrap();

    let logs: Vec<Vec<String>> = (0..4)
        .map(|seed| {
            let (_, game) = play(&db, &fire, &water, seed);
            game.events.messages().into_iter().map(String::from).collect()
        })
        .collect();
    assert!(logs.windows(2).any(|pair| pair[0] != pair[1]));
}

#[test]
fn test_matches_finish() {
    let db = catalog();
    let grass = DeckLoader::load_from_file(Path::new("decks/grass.deck")).unwrap();
    let psychic = DeckLoader::load_from_file(Path::new("decks/psychic.deck")).unwrap();
    for seed in 0..5 {
        let (result, game) = play(&db, &grass, &psychic, seed);
        assert!(result.turns_played > 0);
        if let Some(winner) = result.winner {
            assert_eq!(game.winner(), Some(winner));
        }
    }
}

#[test]
fn test_binary_is_deterministic() {
    let run1 = run_binary("decks/fire.deck", 7);
    let run2 = run_binary("decks/fire.deck", 7);
    assert!(run1.contains("=== Game Over ==="));
    assert_eq!(run1, run2);
}
