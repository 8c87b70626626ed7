//! TCG Engine - Main Binary
//!
//! Runs seeded AI-vs-AI matches from a JSON catalog and `.deck` lists

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tcg_engine::{
    core::PlayerName,
    game::{
        GameLoop, HeuristicPlanner, PerSide, RulesConfig, SeededCoins, Side, TrainerTable,
        VerbosityLevel,
    },
    loader::{AsyncCardDatabase, CardDatabase, DeckList, DeckLoader, GameInitializer},
    tournament::{print_report, run_tourney, TournamentConfig},
};

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "tcg")]
#[command(about = "TCG Engine - two-player creature card game simulator", long_about = None)]
struct Cli {
    /// Directory of JSON catalog files
    #[arg(long, global = true, default_value = "catalog")]
    catalog: PathBuf,

    /// Rules file (JSON); missing fields use the standard rules
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    /// Trainer effect table (JSON); defaults to the standard trainers
    #[arg(long, global = true)]
    trainers: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one seeded match between two heuristic planners
    Play {
        /// Deck list for the player side
        #[arg(value_name = "PLAYER_DECK")]
        deck1: PathBuf,

        /// Deck list for the opponent side
        #[arg(value_name = "OPPONENT_DECK")]
        deck2: PathBuf,

        /// Player name
        #[arg(long, default_value = "Player")]
        p1_name: String,

        /// Opponent name
        #[arg(long, default_value = "Opponent")]
        p2_name: String,

        /// Random seed for coin flips and shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Stop the match after this many turns
        #[arg(long, default_value_t = 200)]
        max_turns: u32,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,
    },

    /// Run many seeded matches in parallel and report win rates
    Tourney {
        /// Deck lists (or directories of .deck files) to draw pairings from
        #[arg(value_name = "DECKS", required = true)]
        decks: Vec<PathBuf>,

        /// Number of games to play
        #[arg(long, short = 'g', default_value_t = 100)]
        games: usize,

        /// Stop starting new games after this many seconds
        #[arg(long)]
        seconds: Option<u64>,

        /// Tournament seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Turn cap per game
        #[arg(long, default_value_t = 200)]
        max_turns: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => RulesConfig::from_file(path)
            .with_context(|| format!("loading rules from {}", path.display()))?,
        None => RulesConfig::default(),
    };
    let trainers = match &cli.trainers {
        Some(path) => TrainerTable::from_file(path)
            .with_context(|| format!("loading trainers from {}", path.display()))?,
        None => TrainerTable::standard(),
    };
    let card_db = load_catalog(&cli.catalog).await?;

    match cli.command {
        Commands::Play {
            deck1,
            deck2,
            p1_name,
            p2_name,
            seed,
            max_turns,
            verbosity,
        } => {
            let decks = PerSide::new(load_deck(&deck1)?, load_deck(&deck2)?);
            run_play(
                &card_db,
                decks,
                PerSide::new(PlayerName::new(&p1_name), PlayerName::new(&p2_name)),
                rules,
                Arc::new(trainers),
                seed,
                max_turns,
                verbosity.into(),
            )
        }
        Commands::Tourney {
            decks,
            games,
            seconds,
            seed,
            max_turns,
        } => {
            let decks = collect_decks(&decks)?;
            let config = TournamentConfig {
                games,
                time_limit: seconds.map(Duration::from_secs),
                seed,
                max_turns,
                rules,
            };
            println!("=== Tournament Mode ===");
            println!("Decks: {}", decks.len());
            println!("Games: {}", games);
            println!("Seed: {}\n", seed);
            let report = run_tourney(&card_db, &decks, Arc::new(trainers), &config)?;
            print_report(&report);
            Ok(())
        }
    }
}

async fn load_catalog(dir: &Path) -> anyhow::Result<CardDatabase> {
    let db = AsyncCardDatabase::new(dir.to_path_buf());
    let (count, duration) = db
        .eager_load()
        .await
        .with_context(|| format!("loading catalog from {}", dir.display()))?;
    println!("Loaded {} cards in {:.2}ms", count, duration.as_secs_f64() * 1000.0);
    Ok(db.snapshot().await)
}

fn load_deck(path: &Path) -> anyhow::Result<DeckList> {
    DeckLoader::load_from_file(path).with_context(|| format!("loading deck {}", path.display()))
}

/// Expand deck arguments: files are taken as-is, directories contribute
/// every `.deck` file they contain
fn collect_decks(paths: &[PathBuf]) -> anyhow::Result<Vec<(String, DeckList)>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("deck"))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    if files.is_empty() {
        bail!("no deck files found");
    }

    files
        .iter()
        .map(|path| {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("deck")
                .to_string();
            Ok((name, load_deck(path)?))
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn run_play(
    card_db: &CardDatabase,
    decks: PerSide<DeckList>,
    names: PerSide<PlayerName>,
    rules: RulesConfig,
    trainers: Arc<TrainerTable>,
    seed: Option<u64>,
    max_turns: u32,
    verbosity: VerbosityLevel,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    if verbosity >= VerbosityLevel::Minimal {
        println!("=== TCG Match ===");
        println!("Seed: {}\n", seed);
    }

    let mut coins = SeededCoins::new(seed);
    let [deck1, deck2] = decks.into_array();
    let game = GameInitializer::new(card_db).init_match(
        names,
        PerSide::new(&deck1, &deck2),
        rules,
        trainers,
        &mut coins,
    )?;

    let mut player = HeuristicPlanner::new(Side::Player);
    let mut opponent = HeuristicPlanner::new(Side::Opponent);
    let mut game_loop = GameLoop::new(game, &mut coins)
        .with_max_turns(max_turns)
        .with_verbosity(verbosity);
    let result = game_loop.run_game(&mut player, &mut opponent)?;

    println!("\n=== Game Over ===");
    match result.winner {
        Some(side) => println!(
            "Winner: {} ({})",
            game_loop.game.side(side).name,
            result.end_reason
        ),
        None => println!("No winner ({})", result.end_reason),
    }
    println!("Turns played: {}", result.turns_played);
    Ok(())
}
