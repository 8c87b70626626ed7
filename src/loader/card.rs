//! Card catalog loader (.json format)
//!
//! A catalog file holds a JSON array of cards (or a single card object).
//! Printed damage text such as "30+", "10×" or "50-" is normalized into an
//! amount plus a `DamageMode` here, so the engine never sees text.

use crate::core::{
    Attack, AttackEffect, CardDefinition, CardKind, CardName, CardNumber, CreatureData,
    DamageMode, EnergyCost, EnergyType, Power, Stage,
};
use crate::{Result, TcgError};
use nom::branch::alt;
use nom::character::complete::{char, digit1, space0};
use nom::combinator::{all_consuming, map, map_res, opt, value};
use nom::sequence::{delimited, pair};
use nom::IResult;
use serde::Deserialize;
use smallvec::SmallVec;
use std::fs;
use std::path::Path;

/// Printed damage: a plain number or its text form
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawDamage {
    Amount(u32),
    Text(String),
}

impl Default for RawDamage {
    fn default() -> Self {
        RawDamage::Amount(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawAttack {
    name: String,
    #[serde(default)]
    cost: String,
    #[serde(default)]
    damage: RawDamage,
    #[serde(default)]
    effects: Vec<AttackEffect>,
    #[serde(default)]
    once_while_in_play: bool,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawKind {
    Creature,
    Energy,
    Trainer,
}

#[derive(Debug, Clone, Deserialize)]
struct RawCard {
    number: u32,
    name: String,
    kind: RawKind,
    #[serde(default)]
    stage: Option<Stage>,
    #[serde(default)]
    evolves_from: Option<String>,
    #[serde(default)]
    hp: u32,
    #[serde(default, rename = "type")]
    element: Option<EnergyType>,
    #[serde(default)]
    weakness: Option<EnergyType>,
    #[serde(default)]
    resistance: Option<EnergyType>,
    #[serde(default)]
    retreat_cost: u8,
    #[serde(default)]
    attacks: Vec<RawAttack>,
    #[serde(default)]
    power: Option<Power>,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCatalog {
    Many(Vec<RawCard>),
    One(RawCard),
}

fn damage_suffix(input: &str) -> IResult<&str, DamageMode> {
    alt((
        value(DamageMode::Plus, char('+')),
        value(DamageMode::Times, alt((char('×'), char('x'), char('X')))),
        value(DamageMode::Minus, alt((char('-'), char('−')))),
    ))(input)
}

fn damage_text(input: &str) -> IResult<&str, (u32, DamageMode)> {
    delimited(
        space0,
        pair(
            map_res(digit1, str::parse::<u32>),
            map(opt(damage_suffix), |m| m.unwrap_or(DamageMode::Flat)),
        ),
        space0,
    )(input)
}

/// Parse printed damage text ("30", "30+", "10×" or "10x", "50-")
///
/// Empty text means the attack does no damage.
pub fn parse_damage(text: &str) -> Result<(u32, DamageMode)> {
    if text.trim().is_empty() {
        return Ok((0, DamageMode::Flat));
    }
    all_consuming(damage_text)(text)
        .map(|(_, parsed)| parsed)
        .map_err(|e| TcgError::ParseError(format!("damage '{}': {}", text, e)))
}

impl RawAttack {
    fn into_attack(self) -> Result<Attack> {
        let (damage, damage_mode) = match self.damage {
            RawDamage::Amount(n) => (n, DamageMode::Flat),
            RawDamage::Text(text) => parse_damage(&text)?,
        };
        Ok(Attack {
            name: self.name,
            cost: EnergyCost::from_string(&self.cost),
            damage,
            damage_mode,
            effects: SmallVec::from_vec(self.effects),
            once_while_in_play: self.once_while_in_play,
            text: self.text,
        })
    }
}

impl RawCard {
    fn into_definition(self) -> Result<CardDefinition> {
        let kind = match self.kind {
            RawKind::Creature => {
                let element = self.element.ok_or_else(|| {
                    TcgError::InvalidCardFormat(format!("creature '{}' has no type", self.name))
                })?;
                if self.hp == 0 {
                    return Err(TcgError::InvalidCardFormat(format!(
                        "creature '{}' has no HP",
                        self.name
                    )));
                }
                let stage = self.stage.unwrap_or(if self.evolves_from.is_some() {
                    Stage::Stage1
                } else {
                    Stage::Basic
                });
                if stage != Stage::Basic && self.evolves_from.is_none() {
                    return Err(TcgError::InvalidCardFormat(format!(
                        "evolution '{}' does not say what it evolves from",
                        self.name
                    )));
                }
                let attacks = self
                    .attacks
                    .into_iter()
                    .map(RawAttack::into_attack)
                    .collect::<Result<SmallVec<_>>>()?;
                CardKind::Creature(CreatureData {
                    stage,
                    evolves_from: self.evolves_from.map(CardName::new),
                    hp: self.hp,
                    element,
                    weakness: self.weakness,
                    resistance: self.resistance,
                    retreat_cost: self.retreat_cost,
                    attacks,
                    power: self.power,
                })
            }
            RawKind::Energy => CardKind::Energy(self.element.ok_or_else(|| {
                TcgError::InvalidCardFormat(format!("energy '{}' has no type", self.name))
            })?),
            RawKind::Trainer => CardKind::Trainer,
        };
        Ok(CardDefinition {
            number: CardNumber::new(self.number),
            name: CardName::new(self.name),
            kind,
            text: self.text,
        })
    }
}

/// Card loader for .json catalog files
pub struct CardLoader;

impl CardLoader {
    pub fn load_from_file(path: &Path) -> Result<Vec<CardDefinition>> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a catalog from JSON text
    pub fn parse(content: &str) -> Result<Vec<CardDefinition>> {
        let raw: RawCatalog = serde_json::from_str(content)?;
        let cards = match raw {
            RawCatalog::Many(cards) => cards,
            RawCatalog::One(card) => vec![card],
        };
        cards.into_iter().map(RawCard::into_definition).collect()
    }
}
