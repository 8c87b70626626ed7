//! A creature in play and its runtime state

use crate::core::{Attack, Card, CardId, EnergyType, GameEntity, Power};
use crate::game::{ConditionSet, Protection};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InPlay {
    /// The top card (current evolution stage)
    pub card: Card,
    /// Attached energy, in attachment order
    pub energy: SmallVec<[Card; 4]>,
    /// Attached non-energy support cards
    pub attachments: SmallVec<[Card; 1]>,
    /// Earlier stages, bottom first
    pub evolution_stack: SmallVec<[Card; 2]>,
    /// Damage taken, in HP points (always a multiple of 10)
    pub damage: u32,
    pub conditions: ConditionSet,
    pub protection: Option<Protection>,
    /// Turn this creature was placed or last evolved
    pub entered_turn: u32,
    pub weakness_override: Option<EnergyType>,
    pub resistance_override: Option<EnergyType>,
    pub type_override: Option<EnergyType>,
    /// Indices of once-while-in-play attacks already used
    pub used_attacks: SmallVec<[usize; 2]>,
}

impl InPlay {
    pub fn new(card: Card, entered_turn: u32) -> Self {
        InPlay {
            card,
            energy: SmallVec::new(),
            attachments: SmallVec::new(),
            evolution_stack: SmallVec::new(),
            damage: 0,
            conditions: ConditionSet::new(),
            protection: None,
            entered_turn,
            weakness_override: None,
            resistance_override: None,
            type_override: None,
            used_attacks: SmallVec::new(),
        }
    }

    pub fn id(&self) -> CardId {
        self.card.id
    }

    pub fn name(&self) -> &str {
        self.card.name()
    }

    pub fn hp(&self) -> u32 {
        self.card.hp()
    }

    pub fn remaining_hp(&self) -> u32 {
        self.hp().saturating_sub(self.damage)
    }

    pub fn is_knocked_out(&self) -> bool {
        self.damage >= self.hp()
    }

    pub fn element(&self) -> EnergyType {
        self.type_override
            .or_else(|| self.card.creature().map(|c| c.element))
            .unwrap_or(EnergyType::Colorless)
    }

    pub fn weakness(&self) -> Option<EnergyType> {
        self.weakness_override
            .or_else(|| self.card.creature().and_then(|c| c.weakness))
    }

    pub fn resistance(&self) -> Option<EnergyType> {
        self.resistance_override
            .or_else(|| self.card.creature().and_then(|c| c.resistance))
    }

    pub fn attacks(&self) -> &[Attack] {
        self.card
            .creature()
            .map(|c| c.attacks.as_slice())
            .unwrap_or(&[])
    }

    pub fn attack(&self, index: usize) -> Option<&Attack> {
        self.attacks().get(index)
    }

    pub fn printed_retreat_cost(&self) -> u8 {
        self.card.creature().map(|c| c.retreat_cost).unwrap_or(0)
    }

    pub fn power(&self) -> Option<&Power> {
        self.card.creature().and_then(|c| c.power.as_ref())
    }

    pub fn attached_types(&self) -> SmallVec<[EnergyType; 4]> {
        self.energy.iter().filter_map(|c| c.energy_type()).collect()
    }

    pub fn count_energy(&self, energy: Option<EnergyType>) -> usize {
        match energy {
            None => self.energy.len(),
            Some(t) => self.energy.iter().filter(|c| c.energy_type() == Some(t)).count(),
        }
    }

    /// Detach up to `count` energy cards of a type (any type when None)
    pub fn detach_energy(&mut self, energy: Option<EnergyType>, count: usize) -> Vec<Card> {
        let mut removed = Vec::new();
        while removed.len() < count {
            let pos = self
                .energy
                .iter()
                .position(|c| energy.is_none() || c.energy_type() == energy);
            match pos {
                Some(i) => removed.push(self.energy.remove(i)),
                None => break,
            }
        }
        removed
    }

    /// Detach specific energy cards by id
    pub fn detach_by_id(&mut self, ids: &[CardId]) -> Vec<Card> {
        let mut removed = Vec::new();
        for id in ids {
            if let Some(i) = self.energy.iter().position(|c| c.id == *id) {
                removed.push(self.energy.remove(i));
            }
        }
        removed
    }

    pub fn add_damage(&mut self, amount: u32) {
        self.damage = self.damage.saturating_add(amount);
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.damage);
        self.damage -= healed;
        healed
    }

    /// Clear conditions, protection and the temporary type changes
    ///
    /// Used when the creature leaves the active spot or becomes a new stage.
    pub fn reset_volatile(&mut self) {
        self.conditions.clear();
        self.protection = None;
        self.weakness_override = None;
        self.resistance_override = None;
        self.type_override = None;
    }

    /// Put an evolution card on top, keeping damage and attachments
    pub fn evolve_into(&mut self, card: Card, turn: u32) {
        let previous = std::mem::replace(&mut self.card, card);
        self.evolution_stack.push(previous);
        self.reset_volatile();
        self.used_attacks.clear();
        self.entered_turn = turn;
    }

    /// Remove the top stage and return it; None for a basic
    pub fn devolve(&mut self) -> Option<Card> {
        let below = self.evolution_stack.pop()?;
        let top = std::mem::replace(&mut self.card, below);
        self.reset_volatile();
        self.used_attacks.clear();
        Some(top)
    }

    /// Every card making up this creature, for the discard pile
    pub fn into_cards(self) -> Vec<Card> {
        let mut cards: Vec<Card> = self.evolution_stack.into_iter().collect();
        cards.push(self.card);
        cards.extend(self.energy);
        cards.extend(self.attachments);
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDefinition, Stage};
    use crate::game::{Condition, ProtectionKind};
    use std::sync::Arc;

    fn card(id: u32, def: CardDefinition) -> Card {
        Card::new(CardId::new(id), Arc::new(def))
    }

    #[test]
    fn test_evolve_keeps_damage_and_clears_conditions() {
        let base = card(1, CardDefinition::basic_creature(46, "Charmander", 50, EnergyType::Fire));
        let evo = card(
            2,
            CardDefinition::basic_creature(24, "Charmeleon", 80, EnergyType::Fire)
                .evolves_from("Charmander", Stage::Stage1),
        );

        let mut creature = InPlay::new(base, 1);
        creature.damage = 30;
        creature.conditions.apply(Condition::Poisoned);
        creature.protection = Some(Protection::grant(ProtectionKind::Damage, 3));

        creature.evolve_into(evo, 2);
        assert_eq!(creature.name(), "Charmeleon");
        assert_eq!(creature.damage, 30);
        assert_eq!(creature.remaining_hp(), 50);
        assert!(creature.conditions.is_empty());
        assert!(creature.protection.is_none());
        assert_eq!(creature.entered_turn, 2);

        let top = creature.devolve().unwrap();
        assert_eq!(top.name(), "Charmeleon");
        assert_eq!(creature.name(), "Charmander");
        assert!(creature.devolve().is_none());
    }

    #[test]
    fn test_detach_energy() {
        let fire = Arc::new(CardDefinition::energy(98, EnergyType::Fire));
        let water = Arc::new(CardDefinition::energy(102, EnergyType::Water));
        let mut creature = InPlay::new(
            card(1, CardDefinition::basic_creature(7, "Squirtle", 40, EnergyType::Water)),
            1,
        );
        creature.energy.push(Card::new(CardId::new(2), Arc::clone(&fire)));
        creature.energy.push(Card::new(CardId::new(3), Arc::clone(&water)));
        creature.energy.push(Card::new(CardId::new(4), Arc::clone(&fire)));

        let removed = creature.detach_energy(Some(EnergyType::Fire), 5);
        assert_eq!(removed.len(), 2);
        assert_eq!(creature.count_energy(None), 1);
        assert_eq!(creature.attached_types().as_slice(), &[EnergyType::Water]);
    }

    #[test]
    fn test_into_cards_collects_everything() {
        let mut creature = InPlay::new(
            card(1, CardDefinition::basic_creature(7, "Squirtle", 40, EnergyType::Water)),
            1,
        );
        creature
            .energy
            .push(card(2, CardDefinition::energy(102, EnergyType::Water)));
        creature.evolve_into(
            card(
                3,
                CardDefinition::basic_creature(42, "Wartortle", 70, EnergyType::Water)
                    .evolves_from("Squirtle", Stage::Stage1),
            ),
            2,
        );
        assert_eq!(creature.into_cards().len(), 3);
    }

    #[test]
    fn test_heal_floors_at_zero() {
        let mut creature = InPlay::new(
            card(1, CardDefinition::basic_creature(7, "Squirtle", 40, EnergyType::Water)),
            1,
        );
        creature.add_damage(10);
        assert_eq!(creature.heal(20), 10);
        assert_eq!(creature.damage, 0);
    }
}
