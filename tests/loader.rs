//! Sample catalog, deck lists and config files

mod common;

use common::catalog;
use similar_asserts::assert_eq;
use std::path::{Path, PathBuf};
use tcg_engine::core::{CardKind, CardNumber, DamageMode, Power, Stage};
use tcg_engine::game::{RulesConfig, TrainerTable};
use tcg_engine::loader::{AsyncCardDatabase, DeckLoader, GameInitializer};

fn manifest_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn test_catalog_loads_every_file() {
    let db = catalog();
    assert_eq!(db.len(), 45);

    let charizard = db.get(CardNumber::new(4)).unwrap();
    let CardKind::Creature(data) = &charizard.kind else {
        panic!("Charizard is a creature");
    };
    assert_eq!(data.stage, Stage::Stage2);
    assert_eq!(data.hp, 120);
    assert_eq!(
        data.evolves_from.as_ref().map(|n| n.to_string()),
        Some("Charmeleon".to_string())
    );
}

#[test]
fn test_lookup_by_name_ignores_case_and_accents() {
    let db = catalog();
    assert_eq!(db.get_by_name("  PIKACHU ").map(|d| d.number), Some(CardNumber::new(58)));
    assert_eq!(db.get_by_name("Pikachú").map(|d| d.number), Some(CardNumber::new(58)));
    assert!(db.get_by_name("Mewtwo").is_none());
}

#[test]
fn test_damage_text_is_normalized() {
    let db = catalog();
    let mode_of = |name: &str, attack: usize| {
        let def = db.get_by_name(name).unwrap();
        let data = def.creature().unwrap();
        (data.attacks[attack].damage, data.attacks[attack].damage_mode)
    };
    assert_eq!(mode_of("Blastoise", 0), (40, DamageMode::Plus));
    assert_eq!(mode_of("Poliwhirl", 0), (30, DamageMode::Times));
    assert_eq!(mode_of("Machoke", 0), (50, DamageMode::Minus));
    assert_eq!(mode_of("Charmander", 0), (10, DamageMode::Flat));
}

#[test]
fn test_passive_power_loads() {
    let db = catalog();
    let voltorb = db.get_by_name("Voltorb").unwrap();
    assert_eq!(
        voltorb.creature().and_then(|c| c.power.clone()),
        Some(Power::RetreatDiscount { amount: 1 })
    );
}

#[test]
fn test_sample_decks_resolve() {
    let db = catalog();
    let initializer = GameInitializer::new(&db);
    let mut found = 0;
    for entry in std::fs::read_dir(manifest_path("decks")).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|s| s.to_str()) != Some("deck") {
            continue;
        }
        let deck = DeckLoader::load_from_file(&path).unwrap();
        assert_eq!(deck.total_cards(), 60, "{}", path.display());
        let cards = initializer.resolve_deck(&deck).unwrap();
        assert!(cards.iter().any(|c| c.creature().map_or(false, |d| d.stage == Stage::Basic)));
        found += 1;
    }
    assert_eq!(found, 5);
}

#[test]
fn test_config_files_match_defaults() {
    let rules = RulesConfig::from_file(&manifest_path("config/rules.json")).unwrap();
    assert_eq!(rules, RulesConfig::default());

    let trainers = TrainerTable::from_file(&manifest_path("config/trainers.json")).unwrap();
    assert_eq!(trainers, TrainerTable::standard());
}

#[tokio::test]
async fn test_async_database_matches_sync() {
    let sync_db = catalog();
    let async_db = AsyncCardDatabase::new(manifest_path("catalog"));
    let (count, _) = async_db.eager_load().await.unwrap();
    assert_eq!(count, sync_db.len());

    let snapshot = async_db.snapshot().await;
    for def in sync_db.iter() {
        assert_eq!(snapshot.get(def.number), Some(def));
    }
    assert_eq!(
        async_db.get_by_name("blastoise").await.map(|d| d.number),
        Some(CardNumber::new(2))
    );
}
