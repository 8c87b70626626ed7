//! Attacks and their declared effects

use crate::core::{EnergyCost, EnergyType};
use crate::game::{Coin, Condition, ProtectionKind};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// How the printed damage number combines with the attack's effects
///
/// Catalog text such as "30+", "10×" or "50-" is normalized into this
/// form when the catalog is loaded; the engine never parses damage text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DamageMode {
    /// Plain number
    #[default]
    Flat,
    /// Number plus bonuses ("30+")
    Plus,
    /// Number times a count ("10×")
    Times,
    /// Number minus reductions ("50-")
    Minus,
}

impl DamageMode {
    pub fn suffix(&self) -> &'static str {
        match self {
            DamageMode::Flat => "",
            DamageMode::Plus => "+",
            DamageMode::Times => "×",
            DamageMode::Minus => "-",
        }
    }
}

/// Which participant of an attack an effect refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    Attacker,
    Defender,
}

/// Whose bench a bench-damage effect hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchTarget {
    Own,
    Opponent,
    Both,
}

/// One declared effect of an attack, applied in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackEffect {
    /// +`per` damage for each attached `energy` beyond what the cost used, up to `max`
    ExtraEnergyBonus { energy: EnergyType, per: u32, max: u8 },
    /// `per` damage for each damage counter on `target` (added, or subtracted for "50-")
    DamageCounterScaling { target: Participant, per: u32 },
    /// Flip `flips` coins; damage is the printed number times the count of `count`
    CoinFlipMultiplier { flips: u8, count: Coin },
    /// Flip `flips` coins; +`per` damage for each `count`
    CoinFlipBonus { flips: u8, per: u32, count: Coin },
    /// Flip a coin; tails means the attack does nothing
    CoinFlipOrFail,
    SelfDamage { amount: u32 },
    /// Never modified by weakness or resistance
    BenchDamage { target: BenchTarget, amount: u32 },
    InflictCondition {
        target: Participant,
        condition: Condition,
        #[serde(default)]
        coin_gated: bool,
    },
    /// Discard energy; with `is_cost` the attack cannot be used unless it can be paid
    DiscardEnergy {
        from: Participant,
        #[serde(default)]
        energy: Option<EnergyType>,
        count: u8,
        #[serde(default)]
        is_cost: bool,
    },
    Draw { count: u8 },
    /// The defending side switches its active with a benched creature
    ForceSwitch,
    /// Protect the attacker during the opponent's next turn
    Protect {
        protection: ProtectionKind,
        #[serde(default)]
        coin_gated: bool,
    },
    HealSelf { amount: u32 },
    /// Change the defender's weakness until it leaves the active spot
    ConvertWeakness { to: EnergyType },
    /// Return the defender's highest evolution card to its owner's hand
    DevolveDefender,
}

impl AttackEffect {
    /// Energy the attacker discards as the price of using the attack
    ///
    /// Costs are paid even when the defender's protection cancels every
    /// other effect.
    pub fn is_cost(&self) -> bool {
        matches!(
            self,
            AttackEffect::DiscardEnergy {
                from: Participant::Attacker,
                is_cost: true,
                ..
            }
        )
    }
}

/// An attack printed on a creature card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub cost: EnergyCost,
    pub damage: u32,
    #[serde(default)]
    pub damage_mode: DamageMode,
    #[serde(default)]
    pub effects: SmallVec<[AttackEffect; 2]>,
    /// Can only be used once while this creature stays in play
    #[serde(default)]
    pub once_while_in_play: bool,
    #[serde(default)]
    pub text: String,
}

impl Attack {
    pub fn new(name: impl Into<String>, cost: &str, damage: u32) -> Self {
        Attack {
            name: name.into(),
            cost: EnergyCost::from_string(cost),
            damage,
            damage_mode: DamageMode::Flat,
            effects: SmallVec::new(),
            once_while_in_play: false,
            text: String::new(),
        }
    }

    pub fn with_mode(mut self, mode: DamageMode) -> Self {
        self.damage_mode = mode;
        self
    }

    pub fn with_effect(mut self, effect: AttackEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn once_while_in_play(mut self) -> Self {
        self.once_while_in_play = true;
        self
    }

    /// Discard requirements that must be payable before the attack is legal
    pub fn discard_costs(&self) -> impl Iterator<Item = (Option<EnergyType>, u8)> + '_ {
        self.effects.iter().filter_map(|e| match e {
            AttackEffect::DiscardEnergy {
                from: Participant::Attacker,
                energy,
                count,
                is_cost: true,
            } => Some((*energy, *count)),
            _ => None,
        })
    }
}

impl fmt::Display for Attack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.cost)?;
        if self.damage > 0 {
            write!(f, " {}{}", self.damage, self.damage_mode.suffix())?;
        }
        Ok(())
    }
}
