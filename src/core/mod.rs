//! Core card model: ids, names, energy, attacks and card definitions

pub mod attack;
pub mod card;
pub mod energy;
pub mod entity;
pub mod types;

pub use attack::{Attack, AttackEffect, BenchTarget, DamageMode, Participant};
pub use card::{Card, CardDefinition, CardId, CardKind, CreatureData, Power, Stage};
pub use energy::{EnergyCost, EnergyType};
pub use entity::{EntityId, GameEntity, IdAllocator};
pub use types::{normalize_name, CardName, CardNumber, PlayerName};
