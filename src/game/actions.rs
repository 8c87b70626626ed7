//! Action requests and their dispatch

use crate::core::CardId;
use crate::game::{CoinSource, GamePhase, GameState, Position, Side};
use crate::{Rejection, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// An action request from one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Put a basic creature from hand into the empty active spot
    PlaceActive { card: CardId },

    /// Put a basic creature from hand on the bench (first empty slot when `slot` is None)
    PlaceBench { card: CardId, slot: Option<usize> },

    /// Attach an energy card from hand (once per turn)
    AttachEnergy { card: CardId, target: Position },

    /// Play an evolution card from hand onto a creature in play
    Evolve { card: CardId, target: Position },

    /// Use one of the active creature's attacks; ends the turn
    Attack { index: usize },

    /// Play a trainer card; `target` defaults to the active creature
    PlayTrainer {
        card: CardId,
        target: Option<Position>,
    },

    /// Swap the active creature with a benched one, discarding the chosen energy
    Retreat {
        bench_slot: usize,
        energy: SmallVec<[CardId; 4]>,
    },

    /// End the turn (during setup: declare this side ready)
    EndTurn,

    /// Move a benched creature into the empty active spot after a knockout
    Promote { bench_slot: usize },

    /// Take a prize card into hand after a knockout
    TakePrize { index: usize },
}

impl GameAction {
    /// Actions that resolve a pending choice rather than take a turn
    pub fn is_choice(&self) -> bool {
        matches!(self, GameAction::Promote { .. } | GameAction::TakePrize { .. })
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameAction::PlaceActive { card } => write!(f, "place card {} as active", card),
            GameAction::PlaceBench { card, slot } => match slot {
                Some(s) => write!(f, "place card {} on bench {}", card, s),
                None => write!(f, "place card {} on bench", card),
            },
            GameAction::AttachEnergy { card, target } => {
                write!(f, "attach energy {} to {}", card, target)
            }
            GameAction::Evolve { card, target } => write!(f, "evolve {} with card {}", target, card),
            GameAction::Attack { index } => write!(f, "attack {}", index),
            GameAction::PlayTrainer { card, target } => match target {
                Some(t) => write!(f, "play trainer {} on {}", card, t),
                None => write!(f, "play trainer {}", card),
            },
            GameAction::Retreat { bench_slot, energy } => {
                write!(f, "retreat to bench {} discarding {} energy", bench_slot, energy.len())
            }
            GameAction::EndTurn => write!(f, "end turn"),
            GameAction::Promote { bench_slot } => write!(f, "promote bench {}", bench_slot),
            GameAction::TakePrize { index } => write!(f, "take prize {}", index),
        }
    }
}

impl GameState {
    /// Gate an action on phase and pending choices, then route it
    pub(crate) fn dispatch(
        &mut self,
        side: Side,
        action: &GameAction,
        coins: &mut dyn CoinSource,
    ) -> Result<()> {
        if self.is_over() {
            return Err(Rejection::GameOver.into());
        }

        if !action.is_choice() && Side::BOTH.iter().any(|s| self.side(*s).has_pending_choice()) {
            return Err(Rejection::PendingChoice.into());
        }

        if self.turn.phase == GamePhase::Setup {
            return match action {
                GameAction::PlaceActive { .. }
                | GameAction::PlaceBench { .. }
                | GameAction::Evolve { .. }
                | GameAction::EndTurn
                    if self.side(side).ready =>
                {
                    Err(Rejection::WrongPhase.into())
                }
                GameAction::PlaceActive { card } => self.place_active(side, *card),
                GameAction::PlaceBench { card, slot } => self.place_bench(side, *card, *slot),
                GameAction::Evolve { card, target } => self.evolve(side, *card, *target),
                GameAction::EndTurn => self.declare_ready(side, coins),
                _ => Err(Rejection::WrongPhase.into()),
            };
        }

        match action {
            GameAction::Promote { bench_slot } => return self.promote(side, *bench_slot, coins),
            GameAction::TakePrize { index } => return self.take_prize(side, *index, coins),
            _ => {}
        }

        self.require_turn(side)?;

        match action {
            GameAction::PlaceActive { card } => self.place_active(side, *card),
            GameAction::PlaceBench { card, slot } => self.place_bench(side, *card, *slot),
            GameAction::AttachEnergy { card, target } => self.attach_energy(side, *card, *target),
            GameAction::Evolve { card, target } => self.evolve(side, *card, *target),
            GameAction::Attack { index } => self.resolve_attack(side, *index, coins),
            GameAction::PlayTrainer { card, target } => self.play_trainer(side, *card, *target),
            GameAction::Retreat { bench_slot, energy } => self.retreat(side, *bench_slot, energy),
            GameAction::EndTurn => {
                let name = self.side(side).name.clone();
                self.events.action(Some(side), format!("{} ends the turn", name));
                self.end_turn(coins);
                Ok(())
            }
            GameAction::Promote { .. } | GameAction::TakePrize { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        let action = GameAction::PlaceBench {
            card: CardId::new(3),
            slot: Some(1),
        };
        assert_eq!(action.to_string(), "place card 3 on bench 1");
        assert_eq!(GameAction::EndTurn.to_string(), "end turn");
    }

    #[test]
    fn test_choice_actions() {
        assert!(GameAction::Promote { bench_slot: 0 }.is_choice());
        assert!(GameAction::TakePrize { index: 0 }.is_choice());
        assert!(!GameAction::Attack { index: 0 }.is_choice());
    }
}
