//! Timed damage modifiers (e.g. a +10 boost for this turn)

use crate::core::CardName;
use crate::game::Side;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageModifier {
    /// Side whose attacks are modified
    pub owner: Side,
    pub amount: i32,
    /// Removed at the end of this turn number
    pub expires_after_turn: u32,
    pub source: CardName,
}

/// Sum of the modifiers that apply to `side`'s attacks
pub fn total_for(modifiers: &[DamageModifier], side: Side) -> i32 {
    modifiers
        .iter()
        .filter(|m| m.owner == side)
        .map(|m| m.amount)
        .sum()
}

/// Drop every modifier whose window ends at `turn`
pub fn expire(modifiers: &mut Vec<DamageModifier>, turn: u32) {
    modifiers.retain(|m| m.expires_after_turn > turn);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boost(owner: Side, amount: i32, turn: u32) -> DamageModifier {
        DamageModifier {
            owner,
            amount,
            expires_after_turn: turn,
            source: CardName::new("PlusPower"),
        }
    }

    #[test]
    fn test_total_only_counts_owner() {
        let mods = vec![
            boost(Side::Player, 10, 1),
            boost(Side::Player, 10, 1),
            boost(Side::Opponent, 20, 1),
        ];
        assert_eq!(total_for(&mods, Side::Player), 20);
        assert_eq!(total_for(&mods, Side::Opponent), 20);
    }

    #[test]
    fn test_expire_by_turn() {
        let mut mods = vec![boost(Side::Player, 10, 1), boost(Side::Player, 10, 2)];
        expire(&mut mods, 1);
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].expires_after_turn, 2);
    }
}
