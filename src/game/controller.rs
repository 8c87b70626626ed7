//! Controller interface for deciding a side's actions
//!
//! A controller only ever sees a read-only `GameStateView`. It answers with
//! an ordered plan for its turn and with the two choices a knockout can force
//! on it (which prize to take, which benched creature to promote). The
//! `ActionExecutor` applies the answers through `GameState::apply`.

use crate::core::Card;
use crate::game::{GameAction, GamePhase, GameState, Side, SideState};

/// Read-only view of a match from one side
pub struct GameStateView<'a> {
    game: &'a GameState,
    side: Side,
}

impl<'a> GameStateView<'a> {
    pub fn new(game: &'a GameState, side: Side) -> Self {
        GameStateView { game, side }
    }

    /// Side this view is for
    pub fn side(&self) -> Side {
        self.side
    }

    /// Underlying snapshot (for simulation on a private copy)
    pub fn state(&self) -> &'a GameState {
        self.game
    }

    pub fn me(&self) -> &'a SideState {
        self.game.side(self.side)
    }

    pub fn opponent(&self) -> &'a SideState {
        self.game.side(self.side.opponent())
    }

    pub fn hand(&self) -> &'a [Card] {
        &self.me().hand.cards
    }

    pub fn phase(&self) -> GamePhase {
        self.game.phase()
    }

    pub fn is_my_turn(&self) -> bool {
        self.game.turn.current_side == self.side
    }
}

/// Decides actions for one side
pub trait PlayerController {
    /// Side this controller plays
    fn side(&self) -> Side;

    /// Short name used in logs
    fn name(&self) -> &str;

    /// Ordered actions for the current turn (or for setup)
    ///
    /// A plan ending in an attack needs no `EndTurn`: attacking closes the turn.
    fn plan_turn(&mut self, view: &GameStateView) -> Vec<GameAction>;

    /// Pick a benched creature to promote; `candidates` are bench slot indices
    fn choose_promotion(&mut self, view: &GameStateView, candidates: &[usize]) -> usize;

    /// Pick one of `remaining` face-down prize cards
    fn choose_prize(&mut self, _view: &GameStateView, _remaining: usize) -> usize {
        0
    }

    /// Optional: Called when the game ends (for cleanup/logging)
    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}
