//! TCG Engine - rules engine for a two-player trading-card battle game
//!
//! The engine owns the match state machine, attack and effect resolution,
//! status conditions and protection windows, and a heuristic opponent that
//! plans and executes whole turns through the same rules as a human side.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod tournament;
pub mod zones;

pub use error::{Rejection, Result, TcgError};
