//! Energy types and attack/retreat costs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Energy types; also used as a creature's type for weakness and resistance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyType {
    Grass,
    Fire,
    Water,
    Lightning,
    Psychic,
    Fighting,
    Colorless,
}

impl EnergyType {
    pub const ALL: [EnergyType; 7] = [
        EnergyType::Grass,
        EnergyType::Fire,
        EnergyType::Water,
        EnergyType::Lightning,
        EnergyType::Psychic,
        EnergyType::Fighting,
        EnergyType::Colorless,
    ];

    /// Single-letter code used in cost strings
    pub fn code(&self) -> char {
        match self {
            EnergyType::Grass => 'G',
            EnergyType::Fire => 'R',
            EnergyType::Water => 'W',
            EnergyType::Lightning => 'L',
            EnergyType::Psychic => 'P',
            EnergyType::Fighting => 'F',
            EnergyType::Colorless => 'C',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        EnergyType::ALL
            .iter()
            .copied()
            .find(|t| t.code() == c.to_ascii_uppercase())
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnergyType::Grass => "Grass",
            EnergyType::Fire => "Fire",
            EnergyType::Water => "Water",
            EnergyType::Lightning => "Lightning",
            EnergyType::Psychic => "Psychic",
            EnergyType::Fighting => "Fighting",
            EnergyType::Colorless => "Colorless",
        };
        write!(f, "{name}")
    }
}

/// Represents an energy cost (e.g., "RRC" = 2 fire + 1 of any type)
/// Copy-eligible since it's just 7 u8 fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnergyCost {
    pub grass: u8,
    pub fire: u8,
    pub water: u8,
    pub lightning: u8,
    pub psychic: u8,
    pub fighting: u8,
    /// Satisfied by energy of any type
    pub colorless: u8,
}

impl EnergyCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cost of `n` energy of any type (retreat costs)
    pub fn colorless(n: u8) -> Self {
        EnergyCost {
            colorless: n,
            ..Self::default()
        }
    }

    /// Parse a cost string like "RRC" or "WC"
    pub fn from_string(s: &str) -> Self {
        let mut cost = EnergyCost::new();
        for c in s.chars() {
            if let Some(t) = EnergyType::from_code(c) {
                *cost.slot_mut(t) += 1;
            }
        }
        cost
    }

    fn slot_mut(&mut self, t: EnergyType) -> &mut u8 {
        match t {
            EnergyType::Grass => &mut self.grass,
            EnergyType::Fire => &mut self.fire,
            EnergyType::Water => &mut self.water,
            EnergyType::Lightning => &mut self.lightning,
            EnergyType::Psychic => &mut self.psychic,
            EnergyType::Fighting => &mut self.fighting,
            EnergyType::Colorless => &mut self.colorless,
        }
    }

    /// Required count for a type (colorless is the any-type requirement)
    pub fn count_of(&self, t: EnergyType) -> u8 {
        match t {
            EnergyType::Grass => self.grass,
            EnergyType::Fire => self.fire,
            EnergyType::Water => self.water,
            EnergyType::Lightning => self.lightning,
            EnergyType::Psychic => self.psychic,
            EnergyType::Fighting => self.fighting,
            EnergyType::Colorless => self.colorless,
        }
    }

    /// Total energy required
    pub fn total(&self) -> u8 {
        self.grass
            + self.fire
            + self.water
            + self.lightning
            + self.psychic
            + self.fighting
            + self.colorless
    }

    /// Check whether the attached energy covers this cost
    ///
    /// Typed requirements must be met by energy of that type; whatever is
    /// left over pays the colorless part.
    pub fn can_pay(&self, attached: &[EnergyType]) -> bool {
        let typed_ok = EnergyType::ALL
            .iter()
            .filter(|t| **t != EnergyType::Colorless)
            .all(|t| attached.iter().filter(|a| *a == t).count() >= self.count_of(*t) as usize);
        typed_ok && attached.len() >= self.total() as usize
    }

    /// How many attached energy cards are missing to pay this cost
    pub fn shortfall(&self, attached: &[EnergyType]) -> u8 {
        let mut missing = 0usize;
        let mut surplus = 0usize;
        for t in EnergyType::ALL.iter().filter(|t| **t != EnergyType::Colorless) {
            let have = attached.iter().filter(|a| *a == t).count();
            let need = self.count_of(*t) as usize;
            if have < need {
                missing += need - have;
            } else {
                surplus += have - need;
            }
        }
        // Colorless energy cards only ever count toward the any-type part
        surplus += attached.iter().filter(|a| **a == EnergyType::Colorless).count();
        missing += (self.colorless as usize).saturating_sub(surplus);
        missing.min(u8::MAX as usize) as u8
    }
}

impl fmt::Display for EnergyCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in EnergyType::ALL {
            for _ in 0..self.count_of(t) {
                write!(f, "{}", t.code())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cost() {
        let cost = EnergyCost::from_string("RRC");
        assert_eq!(cost.fire, 2);
        assert_eq!(EnergyCost::from_string("FF").fighting, 2);
        assert_eq!(cost.colorless, 1);
        assert_eq!(cost.total(), 3);
        assert_eq!(cost.to_string(), "RRC");
    }

    #[test]
    fn test_can_pay_typed_and_colorless() {
        let cost = EnergyCost::from_string("RC");
        assert!(cost.can_pay(&[EnergyType::Fire, EnergyType::Water]));
        assert!(cost.can_pay(&[EnergyType::Fire, EnergyType::Fire]));
        assert!(!cost.can_pay(&[EnergyType::Water, EnergyType::Water]));
        assert!(!cost.can_pay(&[EnergyType::Fire]));
    }

    #[test]
    fn test_shortfall() {
        let cost = EnergyCost::from_string("RRC");
        assert_eq!(cost.shortfall(&[]), 3);
        assert_eq!(cost.shortfall(&[EnergyType::Fire]), 2);
        assert_eq!(cost.shortfall(&[EnergyType::Water, EnergyType::Water]), 2);
        assert_eq!(
            cost.shortfall(&[EnergyType::Fire, EnergyType::Fire, EnergyType::Grass]),
            0
        );
    }

    #[test]
    fn test_colorless_retreat_cost() {
        let cost = EnergyCost::colorless(2);
        assert!(cost.can_pay(&[EnergyType::Grass, EnergyType::Psychic]));
        assert!(!cost.can_pay(&[EnergyType::Grass]));
    }
}
