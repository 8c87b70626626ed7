//! The two competitors and everything one side owns

use crate::core::{Card, PlayerName};
use crate::game::InPlay;
use crate::zones::{CardZone, Zone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Bench capacity per side
pub const BENCH_SIZE: usize = 5;

/// One of the two sides of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];

    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Opponent => write!(f, "Opponent"),
        }
    }
}

/// A pair of values keyed by side
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerSide<T>([T; 2]);

impl<T> PerSide<T> {
    pub fn new(player: T, opponent: T) -> Self {
        PerSide([player, opponent])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.0.iter())
    }

    /// Player value first
    pub fn into_array(self) -> [T; 2] {
        self.0
    }

    /// Exchange the two values
    pub fn swap(&mut self) {
        self.0.swap(0, 1);
    }

    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> PerSide<U> {
        let [p, o] = self.0;
        PerSide([f(Side::Player, p), f(Side::Opponent, o)])
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        &self.0[side.index()]
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        &mut self.0[side.index()]
    }
}

/// Where a creature sits in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Active,
    Bench(usize),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Active => write!(f, "active"),
            Position::Bench(i) => write!(f, "bench {}", i),
        }
    }
}

/// Everything one side owns, plus its per-turn latches and pending choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideState {
    pub name: PlayerName,
    pub deck: CardZone,
    pub hand: CardZone,
    pub discard: CardZone,
    pub prizes: CardZone,
    pub active: Option<InPlay>,
    pub bench: [Option<InPlay>; BENCH_SIZE],

    /// Energy attached this turn
    pub energy_attached: bool,
    /// Retreated this turn
    pub retreated: bool,
    /// Finished setup
    pub ready: bool,
    /// Prizes this side still has to take
    pub pending_prizes: u8,
    /// This side must promote a benched creature to active
    pub pending_promotion: bool,
}

impl SideState {
    pub fn new(name: PlayerName) -> Self {
        SideState {
            name,
            deck: CardZone::new(Zone::Deck),
            hand: CardZone::new(Zone::Hand),
            discard: CardZone::new(Zone::Discard),
            prizes: CardZone::new(Zone::Prizes),
            active: None,
            bench: Default::default(),
            energy_attached: false,
            retreated: false,
            ready: false,
            pending_prizes: 0,
            pending_promotion: false,
        }
    }

    pub fn zone(&self, zone: Zone) -> &CardZone {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Discard => &self.discard,
            Zone::Prizes => &self.prizes,
        }
    }

    pub fn zone_mut(&mut self, zone: Zone) -> &mut CardZone {
        match zone {
            Zone::Deck => &mut self.deck,
            Zone::Hand => &mut self.hand,
            Zone::Discard => &mut self.discard,
            Zone::Prizes => &mut self.prizes,
        }
    }

    pub fn creature(&self, position: Position) -> Option<&InPlay> {
        match position {
            Position::Active => self.active.as_ref(),
            Position::Bench(i) => self.bench.get(i).and_then(|s| s.as_ref()),
        }
    }

    pub fn creature_mut(&mut self, position: Position) -> Option<&mut InPlay> {
        match position {
            Position::Active => self.active.as_mut(),
            Position::Bench(i) => self.bench.get_mut(i).and_then(|s| s.as_mut()),
        }
    }

    /// Take a creature out of its slot
    pub fn take_creature(&mut self, position: Position) -> Option<InPlay> {
        match position {
            Position::Active => self.active.take(),
            Position::Bench(i) => self.bench.get_mut(i).and_then(|s| s.take()),
        }
    }

    /// Every occupied position, active first
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.active
            .iter()
            .map(|_| Position::Active)
            .chain(
                self.bench
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.is_some())
                    .map(|(i, _)| Position::Bench(i)),
            )
    }

    /// Every creature in play, active first
    pub fn in_play(&self) -> impl Iterator<Item = &InPlay> {
        self.active.iter().chain(self.bench.iter().flatten())
    }

    pub fn benched(&self) -> impl Iterator<Item = (usize, &InPlay)> {
        self.bench
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|c| (i, c)))
    }

    pub fn bench_count(&self) -> usize {
        self.bench.iter().filter(|s| s.is_some()).count()
    }

    pub fn has_bench(&self) -> bool {
        self.bench_count() > 0
    }

    pub fn first_empty_bench_slot(&self) -> Option<usize> {
        self.bench.iter().position(|s| s.is_none())
    }

    /// Find a card in hand
    pub fn hand_card(&self, card: crate::core::CardId) -> Option<&Card> {
        self.hand.get(card)
    }

    pub fn has_pending_choice(&self) -> bool {
        self.pending_prizes > 0 || self.pending_promotion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_side_indexing() {
        let mut pair = PerSide::new(1, 2);
        assert_eq!(pair[Side::Player], 1);
        assert_eq!(pair[Side::Opponent], 2);
        pair[Side::Opponent] = 5;
        pair.swap();
        assert_eq!(pair[Side::Player], 5);
        assert_eq!(pair[Side::Opponent], 1);
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Opponent);
        assert_eq!(Side::Opponent.opponent(), Side::Player);
    }

    #[test]
    fn test_empty_side() {
        let side = SideState::new(PlayerName::new("Alice"));
        assert_eq!(side.bench_count(), 0);
        assert_eq!(side.first_empty_bench_slot(), Some(0));
        assert!(side.creature(Position::Bench(9)).is_none());
        assert_eq!(side.positions().count(), 0);
    }
}
