//! Match driver
//!
//! Runs a match between two controllers: setup for both sides, then one
//! planned turn at a time, routing every pending prize or promotion choice to
//! the controller of the side that owns it.

use crate::game::controller::{GameStateView, PlayerController};
use crate::game::executor::ActionExecutor;
use crate::game::{
    CoinSource, GameAction, GameLogger, GamePhase, GameState, PendingChoice, Side, WinReason,
};
use crate::{Result, TcgError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verbosity level for game output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns and actions (default)
    #[default]
    Normal = 2,
    /// Verbose - every event, plus rejected actions
    Verbose = 3,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// Winner of the game (None if the turn limit was hit or play stalled)
    pub winner: Option<Side>,
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEndReason {
    /// The match declared a winner
    Win(WinReason),
    /// Game reached maximum turn limit
    TurnLimit,
    /// Neither controller could move the match forward
    Stalled,
}

impl fmt::Display for GameEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEndReason::Win(reason) => write!(f, "{}", reason),
            GameEndReason::TurnLimit => write!(f, "turn limit reached"),
            GameEndReason::Stalled => write!(f, "no legal progress"),
        }
    }
}

/// Game loop manager
pub struct GameLoop<'a> {
    /// Current snapshot of the match
    pub game: GameState,
    coins: &'a mut dyn CoinSource,
    logger: GameLogger,
    max_turns: u32,
}

/// Turn position used to detect whether a plan moved the match forward
fn progress_marker(game: &GameState) -> (GamePhase, u32, Side) {
    (game.turn.phase, game.turn.turn_number, game.turn.current_side)
}

impl<'a> GameLoop<'a> {
    pub fn new(game: GameState, coins: &'a mut dyn CoinSource) -> Self {
        GameLoop {
            game,
            coins,
            logger: GameLogger::new(),
            max_turns: 200,
        }
    }

    /// Set maximum turns before giving up without a winner
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.logger.set_verbosity(verbosity);
        self
    }

    /// Run the match to completion
    ///
    /// The controllers may be passed in either order; each one plays the side
    /// it reports. Two controllers claiming the same side is an error.
    pub fn run_game(
        &mut self,
        controller1: &mut dyn PlayerController,
        controller2: &mut dyn PlayerController,
    ) -> Result<GameResult> {
        if controller1.side() == controller2.side() {
            return Err(TcgError::InvalidSetup(format!(
                "both controllers play the {} side",
                controller1.side()
            )));
        }
        let mut controllers: [&mut dyn PlayerController; 2] =
            if controller1.side() == Side::Player {
                [&mut *controller1, &mut *controller2]
            } else {
                [&mut *controller2, &mut *controller1]
            };

        let result = loop {
            if let Some(result) = self.finished() {
                break result;
            }
            let before = progress_marker(&self.game);
            let events_before = self.game.events.len();

            if let Some((side, choice)) = self.game.pending_choice() {
                self.resolve_choice(&mut *controllers[side.index()], side, choice)?;
            } else if self.game.phase() == GamePhase::Setup {
                for side in Side::BOTH {
                    if !self.game.side(side).ready && !self.game.is_over() {
                        self.play_plan(&mut *controllers[side.index()], side)?;
                    }
                }
            } else {
                let side = self.game.turn.current_side;
                self.play_plan(&mut *controllers[side.index()], side)?;
                if progress_marker(&self.game) == before
                    && self.game.pending_choice().is_none()
                    && !self.game.is_over()
                {
                    self.force_end_turn(side)?;
                }
            }

            if progress_marker(&self.game) == before
                && self.game.events.len() == events_before
                && !self.game.is_over()
            {
                break self.stalled();
            }
        };

        self.logger.minimal(&format!(
            "Game over after {} turns: {}",
            result.turns_played, result.end_reason
        ));
        for side in Side::BOTH {
            let view = GameStateView::new(&self.game, side);
            controllers[side.index()].on_game_end(&view, result.winner == Some(side));
        }
        Ok(result)
    }

    /// Winner or turn limit, if the match should stop now
    fn finished(&self) -> Option<GameResult> {
        let turns_played = self.game.turn.turn_number;
        if let Some(result) = &self.game.result {
            return Some(GameResult {
                winner: Some(result.winner),
                turns_played,
                end_reason: GameEndReason::Win(result.reason),
            });
        }
        if turns_played > self.max_turns {
            return Some(GameResult {
                winner: None,
                turns_played: self.max_turns,
                end_reason: GameEndReason::TurnLimit,
            });
        }
        None
    }

    fn stalled(&self) -> GameResult {
        GameResult {
            winner: None,
            turns_played: self.game.turn.turn_number,
            end_reason: GameEndReason::Stalled,
        }
    }

    fn play_plan(&mut self, controller: &mut dyn PlayerController, side: Side) -> Result<()> {
        let plan = {
            let view = GameStateView::new(&self.game, side);
            controller.plan_turn(&view)
        };
        for action in &plan {
            self.logger
                .controller_choice(controller.name(), &format!("{} plans to {}", side, action));
        }
        let executor = ActionExecutor::new(&self.logger);
        let report = executor.execute(&self.game, side, &plan, &mut *self.coins)?;
        self.game = report.state;
        Ok(())
    }

    fn force_end_turn(&mut self, side: Side) -> Result<()> {
        let executor = ActionExecutor::new(&self.logger);
        if let Ok(next) = executor.step(&self.game, side, &GameAction::EndTurn, &mut *self.coins)? {
            self.game = next;
        }
        Ok(())
    }

    fn resolve_choice(
        &mut self,
        controller: &mut dyn PlayerController,
        side: Side,
        choice: PendingChoice,
    ) -> Result<()> {
        let action = {
            let view = GameStateView::new(&self.game, side);
            match choice {
                PendingChoice::Prize(_) => {
                    let remaining = self.game.side(side).prizes.len();
                    GameAction::TakePrize {
                        index: controller.choose_prize(&view, remaining),
                    }
                }
                PendingChoice::Promotion => {
                    let candidates: Vec<usize> =
                        self.game.side(side).benched().map(|(i, _)| i).collect();
                    GameAction::Promote {
                        bench_slot: controller.choose_promotion(&view, &candidates),
                    }
                }
            }
        };
        self.logger
            .controller_choice(controller.name(), &format!("{} chose to {}", side, action));

        let executor = ActionExecutor::new(&self.logger);
        self.game = match executor.step(&self.game, side, &action, &mut *self.coins)? {
            Ok(next) => next,
            // An out-of-range choice falls back to the automatic one
            Err(_) => executor.resolve_own_choices(&self.game, side, &mut *self.coins)?,
        };
        Ok(())
    }
}
