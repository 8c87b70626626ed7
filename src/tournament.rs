//! Tournament mode: many seeded AI-vs-AI matches in parallel
//!
//! Each game derives its deck pairing and its coin seed from the tournament
//! seed and the game index, so a tournament replays exactly regardless of
//! how rayon schedules the games.

use crate::core::PlayerName;
use crate::game::{
    GameLoop, GameResult, HeuristicPlanner, PerSide, RulesConfig, SeededCoins, Side,
    TrainerTable, VerbosityLevel,
};
use crate::loader::{CardDatabase, DeckList, GameInitializer};
use crate::{Result, TcgError};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Tournament settings
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    pub games: usize,
    /// Stop starting new games after this long
    pub time_limit: Option<Duration>,
    pub seed: u64,
    pub max_turns: u32,
    pub rules: RulesConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            games: 100,
            time_limit: None,
            seed: 42,
            max_turns: 200,
            rules: RulesConfig::default(),
        }
    }
}

/// Per-game coin seed derived from the tournament seed
pub fn game_seed(tournament_seed: u64, game_idx: usize) -> u64 {
    tournament_seed.wrapping_add((game_idx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Play one silent heuristic-vs-heuristic match
pub fn play_match(
    db: &CardDatabase,
    decks: PerSide<&DeckList>,
    rules: RulesConfig,
    trainers: Arc<TrainerTable>,
    seed: u64,
    max_turns: u32,
) -> Result<GameResult> {
    let mut coins = SeededCoins::new(seed);
    let game = GameInitializer::new(db).init_match(
        PerSide::new(PlayerName::new("Player"), PlayerName::new("Opponent")),
        decks,
        rules,
        trainers,
        &mut coins,
    )?;
    let mut player = HeuristicPlanner::new(Side::Player);
    let mut opponent = HeuristicPlanner::new(Side::Opponent);
    let mut game_loop = GameLoop::new(game, &mut coins)
        .with_max_turns(max_turns)
        .with_verbosity(VerbosityLevel::Silent);
    game_loop.run_game(&mut player, &mut opponent)
}

/// Aggregated results of a tournament
#[derive(Debug, Default, Clone)]
pub struct TournamentReport {
    pub games_played: usize,
    pub player_wins: usize,
    pub opponent_wins: usize,
    /// Games without a winner (turn limit or stalled)
    pub unfinished: usize,
    pub failed: usize,
    pub deck_wins: HashMap<String, usize>,
    pub deck_games: HashMap<String, usize>,
    /// Keyed by (player deck, opponent deck): (player wins, opponent wins, unfinished)
    pub matchups: HashMap<(String, String), (usize, usize, usize)>,
    pub total_turns: u64,
    pub elapsed: Duration,
}

impl TournamentReport {
    fn record(&mut self, decks: (&str, &str), result: &GameResult) {
        let (player_deck, opponent_deck) = decks;
        self.games_played += 1;
        self.total_turns += result.turns_played as u64;
        *self.deck_games.entry(player_deck.to_string()).or_insert(0) += 1;
        *self.deck_games.entry(opponent_deck.to_string()).or_insert(0) += 1;
        let matchup = self
            .matchups
            .entry((player_deck.to_string(), opponent_deck.to_string()))
            .or_insert((0, 0, 0));
        match result.winner {
            Some(Side::Player) => {
                self.player_wins += 1;
                matchup.0 += 1;
                *self.deck_wins.entry(player_deck.to_string()).or_insert(0) += 1;
            }
            Some(Side::Opponent) => {
                self.opponent_wins += 1;
                matchup.1 += 1;
                *self.deck_wins.entry(opponent_deck.to_string()).or_insert(0) += 1;
            }
            None => {
                self.unfinished += 1;
                matchup.2 += 1;
            }
        }
    }

    pub fn average_turns(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_turns as f64 / self.games_played as f64
        }
    }
}

/// Run a tournament over named decks
pub fn run_tourney(
    db: &CardDatabase,
    decks: &[(String, DeckList)],
    trainers: Arc<TrainerTable>,
    config: &TournamentConfig,
) -> Result<TournamentReport> {
    if decks.is_empty() {
        return Err(TcgError::InvalidSetup(
            "Tournament requires at least one deck".to_string(),
        ));
    }
    let start = Instant::now();
    let deadline = config.time_limit.map(|limit| start + limit);

    let outcomes: Vec<_> = (0..config.games)
        .into_par_iter()
        .filter_map(|game_idx| {
            if deadline.map_or(false, |d| Instant::now() >= d) {
                return None;
            }
            let mut deck_rng =
                rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(config.seed.wrapping_add(game_idx as u64));
            let player_idx = deck_rng.gen_range(0..decks.len());
            let opponent_idx = deck_rng.gen_range(0..decks.len());
            let result = play_match(
                db,
                PerSide::new(&decks[player_idx].1, &decks[opponent_idx].1),
                config.rules.clone(),
                Arc::clone(&trainers),
                game_seed(config.seed, game_idx),
                config.max_turns,
            );
            Some((game_idx, player_idx, opponent_idx, result))
        })
        .collect();

    let mut report = TournamentReport::default();
    for (game_idx, player_idx, opponent_idx, result) in outcomes {
        match result {
            Ok(result) => report.record((&decks[player_idx].0, &decks[opponent_idx].0), &result),
            Err(e) => {
                eprintln!("Warning: Game {} failed: {}", game_idx, e);
                report.failed += 1;
            }
        }
    }
    report.elapsed = start.elapsed();
    Ok(report)
}

fn percent(n: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * n as f64 / total as f64
    }
}

/// Print a report to stdout
pub fn print_report(report: &TournamentReport) {
    println!("\n=== Tournament Complete ===");
    println!("Total games played: {}", report.games_played);
    if report.failed > 0 {
        println!("Failed games: {}", report.failed);
    }
    println!("Elapsed time: {:.2}s", report.elapsed.as_secs_f64());
    println!("Average turns per game: {:.1}\n", report.average_turns());

    let total = report.games_played;
    println!("=== Side Statistics ===");
    println!("Player wins: {} ({:.1}%)", report.player_wins, percent(report.player_wins, total));
    println!(
        "Opponent wins: {} ({:.1}%)",
        report.opponent_wins,
        percent(report.opponent_wins, total)
    );
    println!("Unfinished: {} ({:.1}%)", report.unfinished, percent(report.unfinished, total));

    println!("\n=== Deck Win Rates ===");
    let mut deck_games: Vec<_> = report.deck_games.iter().collect();
    deck_games.sort();
    for (deck, games) in deck_games {
        let wins = report.deck_wins.get(deck).copied().unwrap_or(0);
        println!("  {}: {}/{} ({:.1}%)", deck, wins, games, percent(wins, *games));
    }

    println!("\n=== Matchup Results ===");
    let mut matchups: Vec<_> = report.matchups.iter().collect();
    matchups.sort();
    for ((player_deck, opponent_deck), (player_wins, opponent_wins, unfinished)) in matchups {
        let games = player_wins + opponent_wins + unfinished;
        println!("  {} vs {}: {} games", player_deck, opponent_deck, games);
        println!("    Player: {} ({:.1}%)", player_wins, percent(*player_wins, games));
        println!("    Opponent: {} ({:.1}%)", opponent_wins, percent(*opponent_wins, games));
        if *unfinished > 0 {
            println!("    Unfinished: {}", unfinished);
        }
    }
}
