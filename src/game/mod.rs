//! Match state, the resolution engine, and the match driver

pub mod actions;
mod attack;
pub mod coins;
pub mod config;
pub mod controller;
pub mod creature;
pub mod damage;
pub mod events;
pub mod executor;
pub mod game_loop;
mod knockout;
pub mod logger;
pub mod modifiers;
pub mod phase;
mod play;
pub mod planner;
pub mod protection;
pub mod rules;
pub mod side;
pub mod state;
pub mod status;
pub mod trainer;
mod turn;

pub use actions::GameAction;
pub use coins::{Coin, CoinSource, ScriptedCoins, SeededCoins};
pub use config::RulesConfig;
pub use controller::{GameStateView, PlayerController};
pub use creature::InPlay;
pub use events::{EventClock, EventId, EventKind, EventLog, GameEvent};
pub use executor::{ActionExecutor, ExecutionReport};
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel};
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use modifiers::DamageModifier;
pub use phase::{GamePhase, MatchResult, TurnStructure, WinReason};
pub use planner::{best_promotion, plan_turn, HeuristicPlanner};
pub use protection::{Protection, ProtectionKind};
pub use rules::PendingChoice;
pub use side::{PerSide, Position, Side, SideState, BENCH_SIZE};
pub use state::GameState;
pub use status::{resolve_checkup, CheckupOptions, CheckupOutcome, Condition, ConditionSet};
pub use trainer::{TrainerEffect, TrainerTable};
