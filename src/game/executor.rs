//! Applying a planned turn to the live match
//!
//! The executor feeds a plan to `GameState::apply` one action at a time with
//! the acting side passed explicitly. Rejected actions are logged and skipped.
//! The acting side's own prize and promotion choices are resolved
//! automatically; the other side's are left for its controller, so a turn
//! whose end is deferred on them stays deferred.

/// Echo a slice of new events through the logger
///
/// Compiled out without the `verbose-logging` feature.
macro_rules! echo_events {
    ($logger:expr, $events:expr) => {
        #[cfg(feature = "verbose-logging")]
        {
            for event in $events {
                $logger.event(event);
            }
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = (&$logger, $events);
        }
    };
}

use crate::game::planner::best_promotion;
use crate::game::{CoinSource, GameAction, GameLogger, GameState, Side};
use crate::{Rejection, Result, TcgError};

/// Outcome of executing one plan
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Snapshot after the last accepted action
    pub state: GameState,
    pub applied: Vec<GameAction>,
    pub rejected: Vec<(GameAction, Rejection)>,
}

impl ExecutionReport {
    /// The plan's attack was accepted (which closes the turn)
    pub fn attacked(&self) -> bool {
        self.applied
            .iter()
            .any(|a| matches!(a, GameAction::Attack { .. }))
    }
}

pub struct ActionExecutor<'a> {
    logger: &'a GameLogger,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(logger: &'a GameLogger) -> Self {
        ActionExecutor { logger }
    }

    /// Apply `action`, echoing the events it produced
    ///
    /// Rejections come back as `Ok(Err(..))` so callers can carry on; any
    /// other error is propagated.
    pub fn step(
        &self,
        state: &GameState,
        side: Side,
        action: &GameAction,
        coins: &mut dyn CoinSource,
    ) -> Result<std::result::Result<GameState, Rejection>> {
        match state.apply(side, action, coins) {
            Ok(next) => {
                echo_events!(self.logger, next.events.since(state.events.len()));
                Ok(Ok(next))
            }
            Err(TcgError::Rejected(reason)) => {
                self.logger
                    .verbose(&format!("{}: {} rejected ({})", side, action, reason));
                Ok(Err(reason))
            }
            Err(e) => Err(e),
        }
    }

    /// Execute `plan` for `side`
    pub fn execute(
        &self,
        state: &GameState,
        side: Side,
        plan: &[GameAction],
        coins: &mut dyn CoinSource,
    ) -> Result<ExecutionReport> {
        let mut current = self.resolve_own_choices(state, side, coins)?;
        let mut applied = Vec::new();
        let mut rejected = Vec::new();

        for action in plan {
            if current.is_over() {
                break;
            }
            match self.step(&current, side, action, coins)? {
                Ok(next) => {
                    current = self.resolve_own_choices(&next, side, coins)?;
                    applied.push(action.clone());
                    if matches!(action, GameAction::Attack { .. } | GameAction::EndTurn) {
                        break;
                    }
                }
                Err(reason) => rejected.push((action.clone(), reason)),
            }
        }

        Ok(ExecutionReport {
            state: current,
            applied,
            rejected,
        })
    }

    /// Take `side`'s pending prizes (first card each time) and promote its
    /// sturdiest benched creature
    pub fn resolve_own_choices(
        &self,
        state: &GameState,
        side: Side,
        coins: &mut dyn CoinSource,
    ) -> Result<GameState> {
        let mut current = state.clone();
        while !current.is_over() {
            let me = current.side(side);
            let action = if me.pending_prizes > 0 {
                GameAction::TakePrize { index: 0 }
            } else if me.pending_promotion {
                match best_promotion(me) {
                    Some(bench_slot) => GameAction::Promote { bench_slot },
                    None => break,
                }
            } else {
                break;
            };
            match self.step(&current, side, &action, coins)? {
                Ok(next) => current = next,
                Err(_) => break,
            }
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDefinition, EnergyType};
    use crate::game::{RulesConfig, ScriptedCoins, TrainerTable};
    use crate::zones::Zone;
    use std::sync::Arc;

    #[test]
    fn test_rejections_are_skipped() {
        let mut game = GameState::new(
            "Alice",
            "Bob",
            RulesConfig::default(),
            Arc::new(TrainerTable::standard()),
        );
        let def = Arc::new(CardDefinition::basic_creature(1, "Pup", 50, EnergyType::Fighting));
        let pup = game.add_card(Side::Player, def, Zone::Hand);

        let mut logger = GameLogger::new();
        logger.enable_capture();
        let executor = ActionExecutor::new(&logger);
        let plan = vec![
            GameAction::Attack { index: 0 },
            GameAction::PlaceActive { card: pup },
            GameAction::EndTurn,
        ];
        let report = executor
            .execute(&game, Side::Player, &plan, &mut ScriptedCoins::default())
            .unwrap();

        assert_eq!(report.applied.len(), 2);
        assert_eq!(report.rejected, vec![(GameAction::Attack { index: 0 }, Rejection::WrongPhase)]);
        assert!(report.state.side(Side::Player).ready);
        assert!(logger.logs().iter().any(|l| l.message.contains("rejected")));
    }

    #[test]
    fn test_accepted_actions_echo_events() {
        let mut game = GameState::new(
            "Alice",
            "Bob",
            RulesConfig::default(),
            Arc::new(TrainerTable::standard()),
        );
        let def = Arc::new(CardDefinition::basic_creature(1, "Pup", 50, EnergyType::Fighting));
        let pup = game.add_card(Side::Player, def, Zone::Hand);

        let mut logger = GameLogger::new();
        logger.enable_capture();
        let executor = ActionExecutor::new(&logger);
        let next = executor
            .step(
                &game,
                Side::Player,
                &GameAction::PlaceActive { card: pup },
                &mut ScriptedCoins::default(),
            )
            .unwrap()
            .unwrap();

        let echoed = logger
            .logs()
            .iter()
            .filter(|l| l.category.as_deref() == Some("game_event"))
            .count();
        if cfg!(feature = "verbose-logging") {
            assert_eq!(echoed, next.events.len() - game.events.len());
            assert!(echoed > 0);
        } else {
            assert_eq!(echoed, 0);
        }
    }
}
