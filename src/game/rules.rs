//! Legality queries
//!
//! The engine gates every action on these predicates; callers can use the
//! same queries to explain to a user why an action would be refused.

use crate::core::{CardId, EnergyType, Power};
use crate::game::{GamePhase, GameState, Position, Side};
use crate::Rejection;
use smallvec::SmallVec;

/// A choice a side must make before play continues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingChoice {
    /// Number of prizes still to take
    Prize(u8),
    Promotion,
}

type Check = std::result::Result<(), Rejection>;

impl GameState {
    /// Active creature exists and is not asleep or paralyzed
    pub fn check_can_act(&self, side: Side) -> Check {
        let active = self.side(side).active.as_ref().ok_or(Rejection::NoActive)?;
        match active.conditions.blocks_attack() {
            Some(condition) => Err(Rejection::AttackerCannotAct(condition)),
            None => Ok(()),
        }
    }

    pub fn can_attack(&self, side: Side) -> bool {
        self.check_can_act(side).is_ok() && self.side(side.opponent()).active.is_some()
    }

    /// Energy attached to the active creature covers the attack's cost
    pub fn attack_cost_met(&self, side: Side, index: usize) -> bool {
        self.side(side)
            .active
            .as_ref()
            .and_then(|a| a.attack(index).map(|atk| atk.cost.can_pay(&a.attached_types())))
            .unwrap_or(false)
    }

    /// Attack exists, its energy cost is paid and its once-per-play latch is free
    pub fn check_attack_cost(&self, side: Side, index: usize) -> Check {
        let active = self.side(side).active.as_ref().ok_or(Rejection::NoActive)?;
        let attack = active.attack(index).ok_or(Rejection::InvalidAttackIndex)?;
        if attack.once_while_in_play && active.used_attacks.contains(&index) {
            return Err(Rejection::AttackAlreadyUsed);
        }
        if !attack.cost.can_pay(&active.attached_types()) {
            return Err(Rejection::InsufficientEnergy);
        }
        Ok(())
    }

    /// Energy the attack makes its user discard is attached
    ///
    /// Requirements on the same energy type add up.
    pub fn check_discard_costs(&self, side: Side, index: usize) -> Check {
        let active = self.side(side).active.as_ref().ok_or(Rejection::NoActive)?;
        let attack = active.attack(index).ok_or(Rejection::InvalidAttackIndex)?;
        let mut needed: SmallVec<[(Option<EnergyType>, u8); 2]> = SmallVec::new();
        for (energy, count) in attack.discard_costs() {
            match needed.iter_mut().find(|(e, _)| *e == energy) {
                Some((_, total)) => *total = total.saturating_add(count),
                None => needed.push((energy, count)),
            }
        }
        for (energy, count) in needed {
            if active.count_energy(energy) < count as usize {
                return Err(Rejection::DiscardCostUnmet {
                    energy: energy.unwrap_or(EnergyType::Colorless),
                    count,
                });
            }
        }
        Ok(())
    }

    /// Energy cost, discard requirement and once-per-play latch for one attack
    pub fn check_attack_requirements(&self, side: Side, index: usize) -> Check {
        self.check_attack_cost(side, index)?;
        self.check_discard_costs(side, index)
    }

    /// Legality checked before a confused attacker flips
    pub fn check_attack_legal(&self, side: Side, index: usize) -> Check {
        self.check_can_act(side)?;
        if self.side(side.opponent()).active.is_none() {
            return Err(Rejection::NoDefender);
        }
        self.check_attack_cost(side, index)
    }

    /// Full legality of an attack, in pipeline order
    pub fn check_attack(&self, side: Side, index: usize) -> Check {
        self.check_attack_legal(side, index)?;
        self.check_discard_costs(side, index)
    }

    /// Attack indices whose cost and requirements are met right now
    pub fn affordable_attacks(&self, side: Side) -> SmallVec<[usize; 2]> {
        let count = self
            .side(side)
            .active
            .as_ref()
            .map(|a| a.attacks().len())
            .unwrap_or(0);
        (0..count)
            .filter(|i| self.check_attack_requirements(side, *i).is_ok())
            .collect()
    }

    pub fn check_evolve(&self, side: Side, card: CardId, target: Position) -> Check {
        let state = self.side(side);
        let evo = state.hand_card(card).ok_or(Rejection::CardNotInHand)?;
        if !evo.is_creature() || evo.is_basic() {
            return Err(Rejection::NotAnEvolution);
        }
        if let Position::Bench(i) = target {
            if i >= state.bench.len() {
                return Err(Rejection::InvalidSlot);
            }
        }
        let base = state.creature(target).ok_or(Rejection::EmptySlot)?;
        if !evo.evolves_from(&base.card) {
            return Err(Rejection::NotAnEvolution);
        }
        if base.entered_turn >= self.turn.placement_turn() {
            return Err(Rejection::EvolutionLocked);
        }
        Ok(())
    }

    pub fn can_evolve(&self, side: Side, card: CardId, target: Position) -> bool {
        self.check_evolve(side, card, target).is_ok()
    }

    /// Retreat cost of the active creature after power discounts
    pub fn retreat_cost(&self, side: Side) -> u8 {
        let state = self.side(side);
        let printed = state
            .active
            .as_ref()
            .map(|a| a.printed_retreat_cost())
            .unwrap_or(0);
        let discount: u8 = state
            .in_play()
            .filter_map(|c| match c.power() {
                Some(Power::RetreatDiscount { amount }) => Some(*amount),
                _ => None,
            })
            .sum();
        printed.saturating_sub(discount)
    }

    pub fn check_retreat(&self, side: Side) -> Check {
        let state = self.side(side);
        if state.retreated {
            return Err(Rejection::AlreadyRetreated);
        }
        let active = state.active.as_ref().ok_or(Rejection::NoActive)?;
        if let Some(condition) = active.conditions.blocks_retreat() {
            return Err(Rejection::RetreatBlocked(condition));
        }
        if !state.has_bench() {
            return Err(Rejection::EmptySlot);
        }
        if active.energy.len() < self.retreat_cost(side) as usize {
            return Err(Rejection::InsufficientEnergy);
        }
        Ok(())
    }

    pub fn can_retreat(&self, side: Side) -> bool {
        self.check_retreat(side).is_ok()
    }

    pub fn can_attach_energy(&self, side: Side) -> bool {
        self.turn.phase == GamePhase::Playing
            && self.turn.current_side == side
            && !self.side(side).energy_attached
    }

    /// First outstanding prize or promotion choice, if any
    pub fn pending_choice(&self) -> Option<(Side, PendingChoice)> {
        Side::BOTH.into_iter().find_map(|side| {
            let state = self.side(side);
            if state.pending_prizes > 0 {
                Some((side, PendingChoice::Prize(state.pending_prizes)))
            } else if state.pending_promotion {
                Some((side, PendingChoice::Promotion))
            } else {
                None
            }
        })
    }
}
