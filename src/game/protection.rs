//! Time-boxed protection windows

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionKind {
    /// Prevents attack damage
    Damage,
    /// Prevents attack damage and every other effect of the attack
    DamageAndEffects,
}

impl ProtectionKind {
    pub fn blocks_damage(&self) -> bool {
        true
    }

    pub fn blocks_effects(&self) -> bool {
        matches!(self, ProtectionKind::DamageAndEffects)
    }
}

/// A protection grant on one creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protection {
    pub kind: ProtectionKind,
    /// Last turn number on which the grant holds
    pub expires_after_turn: u32,
}

impl Protection {
    pub fn grant(kind: ProtectionKind, expiry_turn: u32) -> Self {
        Protection {
            kind,
            expires_after_turn: expiry_turn,
        }
    }

    /// A grant past its expiry is void even if nobody cleared it
    pub fn is_active(&self, current_turn: u32) -> bool {
        current_turn <= self.expires_after_turn
    }

    pub fn blocks_damage(&self, current_turn: u32) -> bool {
        self.is_active(current_turn) && self.kind.blocks_damage()
    }

    pub fn blocks_effects(&self, current_turn: u32) -> bool {
        self.is_active(current_turn) && self.kind.blocks_effects()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let p = Protection::grant(ProtectionKind::Damage, 4);
        assert!(p.is_active(3));
        assert!(p.is_active(4));
        assert!(!p.is_active(5));
        assert!(!p.blocks_damage(5));
    }

    #[test]
    fn test_kinds() {
        let weak = Protection::grant(ProtectionKind::Damage, 2);
        let strong = Protection::grant(ProtectionKind::DamageAndEffects, 2);
        assert!(weak.blocks_damage(2));
        assert!(!weak.blocks_effects(2));
        assert!(strong.blocks_damage(2));
        assert!(strong.blocks_effects(2));
    }
}
