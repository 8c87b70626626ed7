//! Special conditions and the between-turns checkup

use crate::game::{Coin, CoinSource, GameState, Position, Side};
use crate::{Rejection, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Asleep,
    Confused,
    Paralyzed,
    Poisoned,
    Burned,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::Asleep => "asleep",
            Condition::Confused => "confused",
            Condition::Paralyzed => "paralyzed",
            Condition::Poisoned => "poisoned",
            Condition::Burned => "burned",
        };
        write!(f, "{name}")
    }
}

/// Conditions on one creature
///
/// At most one of asleep/confused/paralyzed; poison and burn stack with anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionSet {
    exclusive: Option<Condition>,
    poisoned: bool,
    burned: bool,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, evicting any other exclusive one
    pub fn apply(&mut self, condition: Condition) {
        match condition {
            Condition::Poisoned => self.poisoned = true,
            Condition::Burned => self.burned = true,
            exclusive => self.exclusive = Some(exclusive),
        }
    }

    pub fn remove(&mut self, condition: Condition) {
        match condition {
            Condition::Poisoned => self.poisoned = false,
            Condition::Burned => self.burned = false,
            exclusive => {
                if self.exclusive == Some(exclusive) {
                    self.exclusive = None;
                }
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn contains(&self, condition: Condition) -> bool {
        match condition {
            Condition::Poisoned => self.poisoned,
            Condition::Burned => self.burned,
            exclusive => self.exclusive == Some(exclusive),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exclusive.is_none() && !self.poisoned && !self.burned
    }

    pub fn iter(&self) -> impl Iterator<Item = Condition> {
        let mut out: SmallVec<[Condition; 3]> = SmallVec::new();
        out.extend(self.exclusive);
        if self.poisoned {
            out.push(Condition::Poisoned);
        }
        if self.burned {
            out.push(Condition::Burned);
        }
        out.into_iter()
    }

    /// The condition that stops the creature from attacking, if any
    pub fn blocks_attack(&self) -> Option<Condition> {
        match self.exclusive {
            Some(c @ (Condition::Asleep | Condition::Paralyzed)) => Some(c),
            _ => None,
        }
    }

    /// The condition that stops the creature from retreating, if any
    pub fn blocks_retreat(&self) -> Option<Condition> {
        match self.exclusive {
            Some(Condition::Paralyzed) => Some(Condition::Paralyzed),
            _ => None,
        }
    }
}

/// Tunables for the checkup step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckupOptions {
    pub poison_damage: u32,
    pub burn_damage: u32,
    pub clear_paralysis: bool,
}

impl Default for CheckupOptions {
    fn default() -> Self {
        CheckupOptions {
            poison_damage: 10,
            burn_damage: 20,
            clear_paralysis: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckupOutcome {
    pub conditions: ConditionSet,
    /// Damage to add to the creature
    pub damage: u32,
    pub cured: SmallVec<[Condition; 3]>,
}

/// Resolve one creature's checkup
///
/// Order: poison damage, burn damage then a flip to cure burn, one wake-up
/// flip for sleep, then paralysis wears off (unless disabled).
pub fn resolve_checkup(
    conditions: ConditionSet,
    options: &CheckupOptions,
    coins: &mut dyn CoinSource,
) -> CheckupOutcome {
    let mut next = conditions;
    let mut damage = 0;
    let mut cured = SmallVec::new();

    if next.poisoned {
        damage += options.poison_damage;
    }

    if next.burned {
        damage += options.burn_damage;
        if coins.flip() == Coin::Heads {
            next.remove(Condition::Burned);
            cured.push(Condition::Burned);
        }
    }

    if next.contains(Condition::Asleep) && coins.flip() == Coin::Heads {
        next.remove(Condition::Asleep);
        cured.push(Condition::Asleep);
    }

    if options.clear_paralysis && next.contains(Condition::Paralyzed) {
        next.remove(Condition::Paralyzed);
        cured.push(Condition::Paralyzed);
    }

    CheckupOutcome {
        conditions: next,
        damage,
        cured,
    }
}

impl GameState {
    /// Apply a condition to a creature in play
    pub fn apply_condition(
        &mut self,
        side: Side,
        position: Position,
        condition: Condition,
    ) -> Result<()> {
        let name = self.side(side).name.clone();
        let creature = self
            .side_mut(side)
            .creature_mut(position)
            .ok_or(Rejection::EmptySlot)?;
        if creature.conditions.contains(condition) {
            return Ok(());
        }
        creature.conditions.apply(condition);
        let msg = format!("{}'s {} is now {}", name, creature.name(), condition);
        self.events.system(Some(side), msg);
        Ok(())
    }

    /// Remove one condition from a creature
    pub fn remove_condition(
        &mut self,
        side: Side,
        position: Position,
        condition: Condition,
    ) -> Result<()> {
        let creature = self
            .side_mut(side)
            .creature_mut(position)
            .ok_or(Rejection::EmptySlot)?;
        creature.conditions.remove(condition);
        Ok(())
    }

    /// Remove every condition from a creature
    pub fn clear_conditions(&mut self, side: Side, position: Position) -> Result<()> {
        let creature = self
            .side_mut(side)
            .creature_mut(position)
            .ok_or(Rejection::EmptySlot)?;
        creature.conditions.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ScriptedCoins;

    #[test]
    fn test_exclusive_conditions_replace_each_other() {
        let mut set = ConditionSet::new();
        set.apply(Condition::Confused);
        set.apply(Condition::Paralyzed);
        assert!(set.contains(Condition::Paralyzed));
        assert!(!set.contains(Condition::Confused));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Condition::Paralyzed]);
    }

    #[test]
    fn test_poison_coexists() {
        let mut set = ConditionSet::new();
        set.apply(Condition::Poisoned);
        set.apply(Condition::Asleep);
        set.apply(Condition::Poisoned);
        assert!(set.contains(Condition::Poisoned));
        assert!(set.contains(Condition::Asleep));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn test_checkup_poisoned_and_asleep_stays_asleep_on_tails() {
        let mut set = ConditionSet::new();
        set.apply(Condition::Poisoned);
        set.apply(Condition::Asleep);

        let mut coins = ScriptedCoins::new(vec![Coin::Tails]);
        let outcome = resolve_checkup(set, &CheckupOptions::default(), &mut coins);
        assert_eq!(outcome.damage, 10);
        assert!(outcome.cured.is_empty());
        assert!(outcome.conditions.contains(Condition::Asleep));
    }

    #[test]
    fn test_checkup_poisoned_and_asleep_wakes_on_heads() {
        let mut set = ConditionSet::new();
        set.apply(Condition::Poisoned);
        set.apply(Condition::Asleep);

        let mut coins = ScriptedCoins::new(vec![Coin::Heads]);
        let outcome = resolve_checkup(set, &CheckupOptions::default(), &mut coins);
        assert_eq!(outcome.damage, 10);
        assert_eq!(outcome.cured.as_slice(), &[Condition::Asleep]);
        assert!(outcome.conditions.contains(Condition::Poisoned));
        assert_eq!(coins.flips_made(), 1);
    }

    #[test]
    fn test_checkup_burn_flip_and_paralysis() {
        let mut set = ConditionSet::new();
        set.apply(Condition::Burned);
        set.apply(Condition::Paralyzed);

        let mut coins = ScriptedCoins::new(vec![Coin::Tails]);
        let outcome = resolve_checkup(set, &CheckupOptions::default(), &mut coins);
        assert_eq!(outcome.damage, 20);
        assert_eq!(outcome.cured.as_slice(), &[Condition::Paralyzed]);
        assert!(outcome.conditions.contains(Condition::Burned));

        let keep = CheckupOptions {
            clear_paralysis: false,
            ..CheckupOptions::default()
        };
        let outcome = resolve_checkup(set, &keep, &mut ScriptedCoins::new(vec![Coin::Heads]));
        assert_eq!(outcome.cured.as_slice(), &[Condition::Burned]);
        assert!(outcome.conditions.contains(Condition::Paralyzed));
    }
}
