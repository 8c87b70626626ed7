//! Trainer cards: the effect table and generic execution

use crate::core::{normalize_name, CardId, CardName, GameEntity};
use crate::game::{DamageModifier, GameState, Position, Side};
use crate::{Rejection, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a trainer card does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", content = "amount", rename_all = "snake_case")]
pub enum TrainerEffect {
    /// Draw this many cards
    Draw(u8),
    /// Remove up to this much damage from the target
    Heal(u32),
    /// Add to this side's attack damage until the end of the turn
    DamageBoost(i32),
    /// Remove every special condition from the target
    ClearConditions,
}

/// Trainer effects keyed by normalized card name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrainerTable {
    effects: FxHashMap<String, TrainerEffect>,
}

impl TrainerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The trainers every match understands out of the box
    pub fn standard() -> Self {
        let mut table = TrainerTable::new();
        table.insert("Bill", TrainerEffect::Draw(2));
        table.insert("Potion", TrainerEffect::Heal(20));
        table.insert("Super Potion", TrainerEffect::Heal(40));
        table.insert("PlusPower", TrainerEffect::DamageBoost(10));
        table.insert("Full Heal", TrainerEffect::ClearConditions);
        table
    }

    pub fn insert(&mut self, name: &str, effect: TrainerEffect) {
        self.effects.insert(normalize_name(name), effect);
    }

    pub fn get(&self, name: &str) -> Option<TrainerEffect> {
        self.effects.get(&normalize_name(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Load a `{"Card Name": {"effect": "draw", "amount": 2}}` table
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: FxHashMap<String, TrainerEffect> = serde_json::from_str(json)?;
        let mut table = TrainerTable::new();
        for (name, effect) in raw {
            table.insert(&name, effect);
        }
        Ok(table)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl GameState {
    pub(crate) fn play_trainer(
        &mut self,
        side: Side,
        card: CardId,
        target: Option<Position>,
    ) -> Result<()> {
        let state = self.side(side);
        let trainer = state.hand_card(card).ok_or(Rejection::CardNotInHand)?;
        if !trainer.is_trainer() {
            return Err(Rejection::NotATrainer.into());
        }
        let trainer_name = CardName::new(trainer.name());
        let effect = self
            .trainers
            .get(trainer.name())
            .ok_or(Rejection::UnknownTrainer)?;
        let position = target.unwrap_or(Position::Active);

        // Validate before anything leaves the hand
        match effect {
            TrainerEffect::Heal(_) => {
                let creature = state.creature(position).ok_or(Rejection::NoTrainerTarget)?;
                if creature.damage == 0 {
                    return Err(Rejection::NoTrainerTarget.into());
                }
            }
            TrainerEffect::ClearConditions => {
                state.creature(position).ok_or(Rejection::NoTrainerTarget)?;
            }
            TrainerEffect::DamageBoost(_) => {
                if state.active.is_none() {
                    return Err(Rejection::NoTrainerTarget.into());
                }
            }
            TrainerEffect::Draw(_) => {}
        }

        let name = state.name.clone();
        let played = self
            .side_mut(side)
            .hand
            .remove(card)
            .ok_or(Rejection::CardNotInHand)?;
        self.side_mut(side).discard.add(played);
        self.events
            .action(Some(side), format!("{} played {}", name, trainer_name));

        let msg = match effect {
            TrainerEffect::Draw(n) => {
                let drawn = self.draw(side, n as usize);
                format!("{} drew {} card(s)", name, drawn)
            }
            TrainerEffect::Heal(amount) => {
                let creature = self
                    .side_mut(side)
                    .creature_mut(position)
                    .ok_or(Rejection::NoTrainerTarget)?;
                let healed = creature.heal(amount);
                format!("{} healed {} damage", creature.name(), healed)
            }
            TrainerEffect::DamageBoost(amount) => {
                self.modifiers.push(DamageModifier {
                    owner: side,
                    amount,
                    expires_after_turn: self.turn.turn_number,
                    source: trainer_name.clone(),
                });
                format!("{}'s attacks do {:+} damage this turn", name, amount)
            }
            TrainerEffect::ClearConditions => {
                let creature = self
                    .side_mut(side)
                    .creature_mut(position)
                    .ok_or(Rejection::NoTrainerTarget)?;
                creature.conditions.clear();
                format!("{} recovered from all special conditions", creature.name())
            }
        };
        self.events.info(Some(side), msg);
        Ok(())
    }
}
