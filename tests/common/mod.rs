//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use tcg_engine::core::{Card, CardDefinition, CardId};
use tcg_engine::game::{
    GameAction, GameState, InPlay, Position, RulesConfig, ScriptedCoins, Side, TrainerTable,
};
use tcg_engine::loader::CardDatabase;
use tcg_engine::zones::Zone;

pub fn catalog() -> CardDatabase {
    CardDatabase::load_from_dir(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/catalog")))
        .expect("sample catalog loads")
}

pub fn def(db: &CardDatabase, name: &str) -> Arc<CardDefinition> {
    db.get_by_name(name)
        .cloned()
        .unwrap_or_else(|| panic!("{} is not in the catalog", name))
}

/// A match in the Playing phase, turn 1, Player to act
///
/// Each side has `player`/`opponent` as its active creature, ten Bill cards
/// in the deck and six prizes.
pub fn duel(db: &CardDatabase, player: &str, opponent: &str) -> GameState {
    duel_with_rules(db, player, opponent, RulesConfig::default())
}

pub fn duel_with_rules(
    db: &CardDatabase,
    player: &str,
    opponent: &str,
    rules: RulesConfig,
) -> GameState {
    let mut game = GameState::new("Alice", "Bob", rules, Arc::new(TrainerTable::standard()));
    let mut coins = ScriptedCoins::default();
    for (side, name) in [(Side::Player, player), (Side::Opponent, opponent)] {
        for _ in 0..10 {
            game.add_card(side, def(db, "Bill"), Zone::Deck);
        }
        for _ in 0..6 {
            game.add_card(side, def(db, "Bill"), Zone::Prizes);
        }
        let id = game.add_card(side, def(db, name), Zone::Hand);
        game = game
            .apply(side, &GameAction::PlaceActive { card: id }, &mut coins)
            .expect("place active");
    }
    for side in Side::BOTH {
        game = game.apply(side, &GameAction::EndTurn, &mut coins).expect("ready");
    }
    game
}

/// Put a creature straight onto the bench, bypassing the hand
pub fn bench(game: &mut GameState, db: &CardDatabase, side: Side, name: &str) -> usize {
    let id = game.add_card(side, def(db, name), Zone::Hand);
    let card = game.side_mut(side).hand.remove(id).expect("just added");
    let slot = game.side(side).first_empty_bench_slot().expect("bench has room");
    game.side_mut(side).bench[slot] = Some(InPlay::new(card, 1));
    slot
}

/// Attach energy directly, without using the once-per-turn attachment
pub fn energize(game: &mut GameState, db: &CardDatabase, side: Side, position: Position, energy: &str, count: usize) {
    for _ in 0..count {
        let id = game.add_card(side, def(db, energy), Zone::Hand);
        let card: Card = game.side_mut(side).hand.remove(id).expect("just added");
        game.side_mut(side)
            .creature_mut(position)
            .expect("creature in play")
            .energy
            .push(card);
    }
}

pub fn hand_card(game: &mut GameState, db: &CardDatabase, side: Side, name: &str) -> CardId {
    game.add_card(side, def(db, name), Zone::Hand)
}

pub fn active(game: &GameState, side: Side) -> &InPlay {
    game.side(side).active.as_ref().expect("active creature")
}
