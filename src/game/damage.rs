//! Damage computation: base amount, bonuses, weakness and resistance

use crate::core::{Attack, AttackEffect, DamageMode, EnergyCost, EnergyType, Participant};
use crate::game::{modifiers, Coin, CoinSource, GameState, InPlay, RulesConfig, Side};

/// Energy of `energy` type attached beyond what paying `cost` needs
///
/// Other attached types pay the colorless part first, so only the surplus
/// that nothing else could have covered counts as extra.
pub fn extra_energy(cost: &EnergyCost, attached: &[EnergyType], energy: EnergyType) -> u32 {
    if energy == EnergyType::Colorless {
        return attached.len().saturating_sub(cost.total() as usize) as u32;
    }
    let of_type = attached.iter().filter(|t| **t == energy).count();
    let others = attached.len() - of_type;
    let others_typed_need: usize = EnergyType::ALL
        .iter()
        .filter(|t| **t != energy && **t != EnergyType::Colorless)
        .map(|t| cost.count_of(*t) as usize)
        .sum();
    let others_spare = others.saturating_sub(others_typed_need);
    let colorless_left = (cost.colorless as usize).saturating_sub(others_spare);
    of_type
        .saturating_sub(cost.count_of(energy) as usize)
        .saturating_sub(colorless_left) as u32
}

/// Weakness doubles first, then resistance subtracts (floored at 0)
pub fn apply_weakness_resistance(
    damage: u32,
    attacker_type: EnergyType,
    defender: &InPlay,
    rules: &RulesConfig,
) -> u32 {
    if damage == 0 {
        return 0;
    }
    let mut damage = damage;
    if defender.weakness() == Some(attacker_type) {
        damage *= rules.weakness_multiplier;
    }
    if defender.resistance() == Some(attacker_type) {
        damage = damage.saturating_sub(rules.resistance_reduction);
    }
    damage
}

/// Damage before weakness and resistance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DamageRoll {
    pub amount: u32,
    /// A coin flip said the attack does nothing
    pub failed: bool,
}

fn apply_modifier(damage: u32, modifier: i32) -> u32 {
    (damage as i64 + modifier as i64).max(0) as u32
}

impl GameState {
    /// Base damage plus bonuses, flipping any coins the attack calls for
    pub(crate) fn roll_damage(
        &self,
        side: Side,
        attack: &Attack,
        coins: &mut dyn CoinSource,
    ) -> DamageRoll {
        let attacker = self.side(side).active.as_ref();
        let defender = self.side(side.opponent()).active.as_ref();
        let attached = attacker.map(|a| a.attached_types()).unwrap_or_default();

        let mut base = attack.damage;
        let mut bonus: u32 = 0;
        let mut reduction: u32 = 0;

        for effect in &attack.effects {
            match effect {
                AttackEffect::CoinFlipOrFail => {
                    if coins.flip() == Coin::Tails {
                        return DamageRoll {
                            amount: 0,
                            failed: true,
                        };
                    }
                }
                AttackEffect::CoinFlipMultiplier { flips, count } => {
                    base = attack.damage * coins.count(*flips, *count);
                }
                AttackEffect::CoinFlipBonus { flips, per, count } => {
                    bonus += per * coins.count(*flips, *count);
                }
                AttackEffect::ExtraEnergyBonus { energy, per, max } => {
                    let extra = extra_energy(&attack.cost, &attached, *energy).min(*max as u32);
                    bonus += per * extra;
                }
                AttackEffect::DamageCounterScaling { target, per } => {
                    let subject = match target {
                        Participant::Attacker => attacker,
                        Participant::Defender => defender,
                    };
                    let counters = subject.map(|c| c.damage / 10).unwrap_or(0);
                    if attack.damage_mode == DamageMode::Minus {
                        reduction += per * counters;
                    } else {
                        bonus += per * counters;
                    }
                }
                _ => {}
            }
        }

        let raw = (base + bonus).saturating_sub(reduction);
        // A roll of nothing stays nothing, boosts included
        let amount = if raw == 0 {
            0
        } else {
            apply_modifier(raw, modifiers::total_for(&self.modifiers, side))
        };
        DamageRoll {
            amount,
            failed: false,
        }
    }

    /// Expected damage of an attack against the current defender
    ///
    /// Same weakness/resistance math as resolution, but coin-flip effects are
    /// ignored and a protected defender estimates to 0.
    pub fn estimate_damage(&self, side: Side, index: usize) -> u32 {
        let Some(attacker) = self.side(side).active.as_ref() else {
            return 0;
        };
        let Some(defender) = self.side(side.opponent()).active.as_ref() else {
            return 0;
        };
        let Some(attack) = attacker.attack(index) else {
            return 0;
        };
        if defender
            .protection
            .map_or(false, |p| p.blocks_damage(self.turn.turn_number))
        {
            return 0;
        }
        if attack.damage == 0 {
            return 0;
        }
        let boosted = apply_modifier(attack.damage, modifiers::total_for(&self.modifiers, side));
        apply_weakness_resistance(boosted, attacker.element(), defender, &self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardDefinition, CardId};
    use std::sync::Arc;

    fn defender(weak: Option<EnergyType>, resist: Option<EnergyType>) -> InPlay {
        let mut def = CardDefinition::basic_creature(1, "Target", 100, EnergyType::Grass);
        if let Some(w) = weak {
            def = def.with_weakness(w);
        }
        if let Some(r) = resist {
            def = def.with_resistance(r);
        }
        InPlay::new(Card::new(CardId::new(1), Arc::new(def)), 1)
    }

    #[test]
    fn test_weakness_before_resistance() {
        let rules = RulesConfig::default();
        let both = defender(Some(EnergyType::Fire), Some(EnergyType::Fire));
        assert_eq!(apply_weakness_resistance(30, EnergyType::Fire, &both, &rules), 30);

        let weak = defender(Some(EnergyType::Fire), None);
        assert_eq!(apply_weakness_resistance(30, EnergyType::Fire, &weak, &rules), 60);

        let resist = defender(None, Some(EnergyType::Fire));
        assert_eq!(apply_weakness_resistance(20, EnergyType::Fire, &resist, &rules), 0);
        assert_eq!(apply_weakness_resistance(20, EnergyType::Water, &resist, &rules), 20);
    }

    #[test]
    fn test_extra_energy() {
        let w = EnergyType::Water;
        let cost = EnergyCost::from_string("WWW");
        assert_eq!(extra_energy(&cost, &[w, w, w, w, w], w), 2);

        let cost = EnergyCost::from_string("WWC");
        assert_eq!(extra_energy(&cost, &[w, w, w, EnergyType::Fighting], w), 1);
        assert_eq!(extra_energy(&cost, &[w, w, w], w), 0);
        assert_eq!(extra_energy(&cost, &[w, w, w, w], EnergyType::Colorless), 1);
    }

    #[test]
    fn test_modifier_floors_at_zero() {
        assert_eq!(apply_modifier(10, -20), 0);
        assert_eq!(apply_modifier(10, 10), 20);
    }
}
