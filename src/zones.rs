//! Card zones (Deck, Hand, Discard, Prizes)

use crate::core::{Card, CardId};
use crate::game::CoinSource;
use serde::{Deserialize, Serialize};

/// Zones a card can sit in outside of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Discard,
    Prizes,
}

/// An ordered pile of card instances
///
/// The top of the deck is the end of the vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardZone {
    /// Zone type
    pub zone_type: Zone,

    /// Cards in this zone (order matters for Deck and Prizes)
    pub cards: Vec<Card>,
}

impl CardZone {
    pub fn new(zone_type: Zone) -> Self {
        CardZone {
            zone_type,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn remove(&mut self, card_id: CardId) -> Option<Card> {
        // Keep order stable even for the hand: controllers iterate it and
        // replays depend on that order.
        let pos = self.cards.iter().position(|c| c.id == card_id)?;
        Some(self.cards.remove(pos))
    }

    /// Remove the card at a position (prize choice)
    pub fn take_at(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, card_id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.iter().any(|c| c.id == card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Draw from top (for Deck)
    pub fn draw_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Shuffle the zone with the match's coin source
    pub fn shuffle(&mut self, coins: &mut dyn CoinSource) {
        // Fisher-Yates driven by the injected source
        for i in (1..self.cards.len()).rev() {
            let j = coins.index(i + 1);
            self.cards.swap(i, j);
        }
    }

    /// Move every card out of the zone
    pub fn drain_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }
}
