//! Match throughput benchmarks
//!
//! Measures heuristic-vs-heuristic matches using Criterion.rs:
//!
//! 1. **Fresh** - build a new match from the deck lists each iteration
//! 2. **Apply** - replay one turn's actions against a fixed snapshot
//!
//! Card data and deck lists are loaded once up front so file I/O is not
//! part of the measurement.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tcg_engine::{
    core::PlayerName,
    game::{
        plan_turn, GameLoop, GameState, HeuristicPlanner, PerSide, RulesConfig, SeededCoins,
        Side, TrainerTable, VerbosityLevel,
    },
    loader::{CardDatabase, DeckList, DeckLoader, GameInitializer},
    Result,
};

/// Metrics collected during one match
#[derive(Debug, Clone)]
struct GameMetrics {
    turns: u32,
    events: usize,
    duration: Duration,
}

impl GameMetrics {
    fn games_per_sec(&self) -> f64 {
        1.0 / self.duration.as_secs_f64()
    }

    fn events_per_sec(&self) -> f64 {
        self.events as f64 / self.duration.as_secs_f64()
    }

    fn events_per_turn(&self) -> f64 {
        if self.turns == 0 {
            0.0
        } else {
            self.events as f64 / self.turns as f64
        }
    }
}

/// Data loaded once and reused across iterations
struct BenchmarkSetup {
    card_db: CardDatabase,
    decks: Vec<(String, DeckList)>,
    trainers: Arc<TrainerTable>,
}

impl BenchmarkSetup {
    fn load() -> Result<Self> {
        let card_db = CardDatabase::load_from_dir(&PathBuf::from("catalog"))?;
        let mut decks = Vec::new();
        for name in ["fire", "water", "grass"] {
            let path = PathBuf::from(format!("decks/{name}.deck"));
            decks.push((name.to_string(), DeckLoader::load_from_file(&path)?));
        }
        Ok(BenchmarkSetup {
            card_db,
            decks,
            trainers: Arc::new(TrainerTable::standard()),
        })
    }

    fn init(&self, player: &DeckList, opponent: &DeckList, coins: &mut SeededCoins) -> Result<GameState> {
        GameInitializer::new(&self.card_db).init_match(
            PerSide::new(PlayerName::new("Player 1"), PlayerName::new("Player 2")),
            PerSide::new(player, opponent),
            RulesConfig::default(),
            Arc::clone(&self.trainers),
            coins,
        )
    }
}

/// Run a single match and collect metrics
fn run_game_with_metrics(setup: &BenchmarkSetup, player: &DeckList, opponent: &DeckList, seed: u64) -> Result<GameMetrics> {
    let start = Instant::now();
    let mut coins = SeededCoins::new(seed);
    let game = setup.init(player, opponent, &mut coins)?;

    let mut controller1 = HeuristicPlanner::new(Side::Player);
    let mut controller2 = HeuristicPlanner::new(Side::Opponent);
    let mut game_loop = GameLoop::new(game, &mut coins).with_verbosity(VerbosityLevel::Silent);
    let result = game_loop.run_game(&mut controller1, &mut controller2)?;

    Ok(GameMetrics {
        turns: result.turns_played,
        events: game_loop.game.events.len(),
        duration: start.elapsed(),
    })
}

/// Fresh mode: build and play a whole match each iteration
fn bench_game_fresh(c: &mut Criterion) {
    let setup = match BenchmarkSetup::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to load resources: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    for (name, deck) in &setup.decks {
        let (_, water) = &setup.decks[1];
        println!("\nWarmup {} vs water (seed {}):", name, seed);
        if let Ok(metrics) = run_game_with_metrics(&setup, deck, water, seed) {
            println!("  Turns: {}", metrics.turns);
            println!("  Events: {}", metrics.events);
            println!("  Duration: {:?}", metrics.duration);
            println!("  Games/sec: {:.2}", metrics.games_per_sec());
            println!("  Events/sec: {:.2}", metrics.events_per_sec());
            println!("  Events/turn: {:.2}", metrics.events_per_turn());
        }

        group.bench_with_input(BenchmarkId::new("fresh", name), deck, |b, deck| {
            b.iter(|| {
                let metrics = run_game_with_metrics(&setup, deck, water, black_box(seed))
                    .expect("match failed");
                black_box(metrics.turns)
            });
        });
    }
    group.finish();
}

/// Apply mode: plan once, then measure applying the plan to a fixed snapshot
fn bench_turn_apply(c: &mut Criterion) {
    let setup = match BenchmarkSetup::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to load resources: {}", e);
            return;
        }
    };

    let (_, fire) = &setup.decks[0];
    let (_, water) = &setup.decks[1];
    let mut coins = SeededCoins::new(7);
    let Ok(mut game) = setup.init(fire, water, &mut coins) else {
        eprintln!("Skipping benchmark - failed to set up match");
        return;
    };

    // Play through setup so the snapshot sits at the first real turn
    let mut p1 = HeuristicPlanner::new(Side::Player);
    let mut p2 = HeuristicPlanner::new(Side::Opponent);
    let mut game_loop = GameLoop::new(game.clone(), &mut coins)
        .with_max_turns(1)
        .with_verbosity(VerbosityLevel::Silent);
    if game_loop.run_game(&mut p1, &mut p2).is_ok() {
        game = game_loop.game;
    }

    let side = game.turn.current_side;
    let plan = plan_turn(&game, side);

    let mut group = c.benchmark_group("turn_apply");
    group.bench_function("plan", |b| b.iter(|| black_box(plan_turn(black_box(&game), side))));
    group.bench_function("apply_plan", |b| {
        b.iter(|| {
            let mut coins = SeededCoins::new(black_box(7));
            let mut state = game.clone();
            for action in &plan {
                state = state.apply_or_keep(side, action, &mut coins);
            }
            black_box(state)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_game_fresh, bench_turn_apply);
criterion_main!(benches);
