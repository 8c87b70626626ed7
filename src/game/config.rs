//! Rules configuration carried by every match

use crate::game::{CheckupOptions, EventClock};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Numeric rules of a match
///
/// Missing fields in a rules file fall back to the standard values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub hand_size: usize,
    pub prize_count: usize,
    /// Damage a confused attacker takes on tails
    pub confusion_damage: u32,
    pub weakness_multiplier: u32,
    pub resistance_reduction: u32,
    pub checkup: CheckupOptions,
    /// Redeals allowed while an opening hand has no basic creature
    pub mulligan_limit: u32,
    /// The side whose turn begins draws a card
    pub draw_at_turn_start: bool,
    /// Where the match log takes its timestamps from
    pub event_clock: EventClock,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            hand_size: 7,
            prize_count: 6,
            confusion_damage: 30,
            weakness_multiplier: 2,
            resistance_reduction: 30,
            checkup: CheckupOptions::default(),
            mulligan_limit: 10,
            draw_at_turn_start: true,
            event_clock: EventClock::System,
        }
    }
}

impl RulesConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str::<Self>(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
