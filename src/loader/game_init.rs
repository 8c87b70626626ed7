//! Game initialization from decks
//!
//! Resolves deck lists against the card database and hands the resulting
//! definitions to `GameState::new_match`.

use crate::core::{normalize_name, CardDefinition, PlayerName};
use crate::game::{CoinSource, GameState, PerSide, RulesConfig, TrainerTable};
use crate::loader::{CardDatabase, DeckList};
use crate::{Result, TcgError};
use std::sync::Arc;

/// Game builder for initializing matches from deck lists
pub struct GameInitializer<'a> {
    card_db: &'a CardDatabase,
}

impl<'a> GameInitializer<'a> {
    pub fn new(card_db: &'a CardDatabase) -> Self {
        GameInitializer { card_db }
    }

    /// Expand a deck list into one definition per copy
    ///
    /// A number missing from the catalog is an error. A name that disagrees
    /// with the catalog only produces a warning; the number wins.
    pub fn resolve_deck(&self, deck: &DeckList) -> Result<Vec<Arc<CardDefinition>>> {
        let mut cards = Vec::with_capacity(deck.total_cards());
        for entry in &deck.entries {
            let def = self
                .card_db
                .get(entry.number)
                .ok_or(TcgError::CardNotFound(entry.number.as_u32()))?;
            if let Some(name) = &entry.name {
                if normalize_name(name) != def.name.normalized() {
                    eprintln!(
                        "Warning: deck lists {} as '{}' but the catalog has '{}'",
                        entry.number, name, def.name
                    );
                }
            }
            for _ in 0..entry.count {
                cards.push(Arc::clone(def));
            }
        }
        Ok(cards)
    }

    /// Set up a match: decks shuffled, hands dealt, prizes laid out
    pub fn init_match(
        &self,
        names: PerSide<PlayerName>,
        decks: PerSide<&DeckList>,
        rules: RulesConfig,
        trainers: Arc<TrainerTable>,
        coins: &mut dyn CoinSource,
    ) -> Result<GameState> {
        let [player, opponent] = decks.into_array();
        let resolved = PerSide::new(self.resolve_deck(player)?, self.resolve_deck(opponent)?);
        GameState::new_match(names, resolved, rules, trainers, coins)
    }
}
