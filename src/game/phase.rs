//! Match phases and turn structure

use crate::game::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Match phases; transitions only go forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    Playing,
    GameOver,
}

/// Why a side won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// Took the last prize
    Prizes,
    /// Opponent had nothing left to promote
    NoBench,
    /// Opponent could not draw at the start of its turn
    DeckOut,
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinReason::Prizes => write!(f, "took all prize cards"),
            WinReason::NoBench => write!(f, "opponent has no creature left to promote"),
            WinReason::DeckOut => write!(f, "opponent could not draw a card"),
        }
    }
}

/// Terminal result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Side,
    pub reason: WinReason,
}

/// Turn bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStructure {
    /// 0 during setup, 1 on the first playing turn
    pub turn_number: u32,
    pub starting_side: Side,
    pub current_side: Side,
    pub phase: GamePhase,
    /// The turn has ended but waits for a prize or promotion choice
    pub turn_end_pending: bool,
}

impl TurnStructure {
    pub fn new(starting_side: Side) -> Self {
        TurnStructure {
            turn_number: 0,
            starting_side,
            current_side: starting_side,
            phase: GamePhase::Setup,
            turn_end_pending: false,
        }
    }

    /// Turn number recorded on a creature entering play
    ///
    /// Setup placements count as turn 1 so they cannot evolve on the first turn.
    pub fn placement_turn(&self) -> u32 {
        self.turn_number.max(1)
    }

    /// Advance to the other side's turn
    pub fn advance(&mut self) {
        self.turn_number += 1;
        self.current_side = self.current_side.opponent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_turn_pinned_in_setup() {
        let mut turn = TurnStructure::new(Side::Player);
        assert_eq!(turn.turn_number, 0);
        assert_eq!(turn.placement_turn(), 1);

        turn.turn_number = 1;
        assert_eq!(turn.placement_turn(), 1);
        turn.advance();
        assert_eq!(turn.placement_turn(), 2);
        assert_eq!(turn.current_side, Side::Opponent);
    }
}
