//! Card definitions and card instances

use crate::core::{Attack, CardName, CardNumber, EnergyType, EntityId, GameEntity};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

pub type CardId = EntityId<Card>;

/// Evolution stage of a creature card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Basic,
    Stage1,
    Stage2,
}

/// Passive powers that are active while the holder is in play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Power {
    /// The owner's active creature retreats for `amount` less energy
    RetreatDiscount { amount: u8 },
}

/// Creature-specific printed data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureData {
    pub stage: Stage,
    /// Name of the card this one evolves from (None for basics)
    pub evolves_from: Option<CardName>,
    pub hp: u32,
    /// The creature's type, used against the defender's weakness and resistance
    pub element: EnergyType,
    pub weakness: Option<EnergyType>,
    pub resistance: Option<EnergyType>,
    pub retreat_cost: u8,
    pub attacks: SmallVec<[Attack; 2]>,
    pub power: Option<Power>,
}

/// Card kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Creature(CreatureData),
    Energy(EnergyType),
    /// Effect bodies come from the trainer table, looked up by name
    Trainer,
}

/// Immutable catalog entry shared by every copy of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub number: CardNumber,
    pub name: CardName,
    pub kind: CardKind,
    #[serde(default)]
    pub text: String,
}

impl CardDefinition {
    /// A basic creature with no attacks, weakness, resistance or retreat cost
    pub fn basic_creature(number: u32, name: &str, hp: u32, element: EnergyType) -> Self {
        CardDefinition {
            number: CardNumber::new(number),
            name: CardName::new(name),
            kind: CardKind::Creature(CreatureData {
                stage: Stage::Basic,
                evolves_from: None,
                hp,
                element,
                weakness: None,
                resistance: None,
                retreat_cost: 0,
                attacks: SmallVec::new(),
                power: None,
            }),
            text: String::new(),
        }
    }

    pub fn energy(number: u32, element: EnergyType) -> Self {
        CardDefinition {
            number: CardNumber::new(number),
            name: CardName::new(format!("{element} Energy")),
            kind: CardKind::Energy(element),
            text: String::new(),
        }
    }

    pub fn trainer(number: u32, name: &str) -> Self {
        CardDefinition {
            number: CardNumber::new(number),
            name: CardName::new(name),
            kind: CardKind::Trainer,
            text: String::new(),
        }
    }

    fn creature_mut(&mut self) -> Option<&mut CreatureData> {
        match &mut self.kind {
            CardKind::Creature(c) => Some(c),
            _ => None,
        }
    }

    /// Turn a basic into an evolution of `from`
    pub fn evolves_from(mut self, from: &str, stage: Stage) -> Self {
        if let Some(c) = self.creature_mut() {
            c.stage = stage;
            c.evolves_from = Some(CardName::new(from));
        }
        self
    }

    pub fn with_attack(mut self, attack: Attack) -> Self {
        if let Some(c) = self.creature_mut() {
            c.attacks.push(attack);
        }
        self
    }

    pub fn with_weakness(mut self, t: EnergyType) -> Self {
        if let Some(c) = self.creature_mut() {
            c.weakness = Some(t);
        }
        self
    }

    pub fn with_resistance(mut self, t: EnergyType) -> Self {
        if let Some(c) = self.creature_mut() {
            c.resistance = Some(t);
        }
        self
    }

    pub fn with_retreat_cost(mut self, cost: u8) -> Self {
        if let Some(c) = self.creature_mut() {
            c.retreat_cost = cost;
        }
        self
    }

    pub fn creature(&self) -> Option<&CreatureData> {
        match &self.kind {
            CardKind::Creature(c) => Some(c),
            _ => None,
        }
    }
}

/// Represents one physical copy of a card during a match
///
/// Copies share their definition; the `CardId` tells duplicates apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique ID for this card instance
    pub id: CardId,

    /// Shared catalog definition
    pub def: Arc<CardDefinition>,
}

impl Card {
    pub fn new(id: CardId, def: Arc<CardDefinition>) -> Self {
        Card { id, def }
    }

    pub fn number(&self) -> CardNumber {
        self.def.number
    }

    pub fn creature(&self) -> Option<&CreatureData> {
        self.def.creature()
    }

    pub fn is_creature(&self) -> bool {
        self.creature().is_some()
    }

    pub fn is_basic(&self) -> bool {
        matches!(self.creature(), Some(c) if c.stage == Stage::Basic)
    }

    pub fn energy_type(&self) -> Option<EnergyType> {
        match self.def.kind {
            CardKind::Energy(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_energy(&self) -> bool {
        self.energy_type().is_some()
    }

    pub fn is_trainer(&self) -> bool {
        matches!(self.def.kind, CardKind::Trainer)
    }

    /// Printed HP (0 for non-creatures)
    pub fn hp(&self) -> u32 {
        self.creature().map(|c| c.hp).unwrap_or(0)
    }

    /// Whether this card can be played on top of `base`
    pub fn evolves_from(&self, base: &Card) -> bool {
        matches!(
            self.creature().and_then(|c| c.evolves_from.as_ref()),
            Some(from) if from.normalized() == base.def.name.normalized()
        )
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.def.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_creation() {
        let def = Arc::new(CardDefinition::basic_creature(46, "Charmander", 50, EnergyType::Fire));
        let card = Card::new(CardId::new(1), def);

        assert_eq!(card.id, CardId::new(1));
        assert_eq!(card.name(), "Charmander");
        assert_eq!(card.number(), CardNumber::new(46));
        assert!(card.is_basic());
        assert_eq!(card.hp(), 50);
        assert!(!card.is_energy());
    }

    #[test]
    fn test_duplicate_copies_share_definition() {
        let def = Arc::new(CardDefinition::energy(98, EnergyType::Fire));
        let a = Card::new(CardId::new(1), Arc::clone(&def));
        let b = Card::new(CardId::new(2), Arc::clone(&def));

        assert_ne!(a.id, b.id);
        assert_eq!(a.number(), b.number());
        assert_eq!(a.energy_type(), Some(EnergyType::Fire));
    }

    #[test]
    fn test_evolution_chain() {
        let base = Card::new(
            CardId::new(1),
            Arc::new(CardDefinition::basic_creature(46, "Charmander", 50, EnergyType::Fire)),
        );
        let evo = Card::new(
            CardId::new(2),
            Arc::new(
                CardDefinition::basic_creature(24, "Charmeleon", 80, EnergyType::Fire)
                    .evolves_from("Charmander", Stage::Stage1),
            ),
        );

        assert!(evo.evolves_from(&base));
        assert!(!base.evolves_from(&evo));
        assert!(!evo.is_basic());
    }
}
