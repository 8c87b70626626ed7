//! Main game state structure

use crate::core::{Card, CardDefinition, CardId, IdAllocator, PlayerName};
use crate::game::{
    CoinSource, DamageModifier, EventLog, GameAction, GamePhase, MatchResult, PerSide, RulesConfig,
    Side, SideState, TrainerTable, TurnStructure, WinReason,
};
use crate::zones::Zone;
use crate::{Rejection, Result, TcgError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Complete snapshot of a match
///
/// Operations never mutate a snapshot a caller holds: `apply` works on a
/// clone and hands it back, so a rejected action leaves the input untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub sides: PerSide<SideState>,

    /// Turn structure
    pub turn: TurnStructure,

    /// Active timed damage modifiers
    pub modifiers: Vec<DamageModifier>,

    /// Set once the match is decided
    pub result: Option<MatchResult>,

    /// Append-only match log
    pub events: EventLog,

    /// Rules this match is played under
    pub rules: RulesConfig,

    /// Effect descriptions for trainer cards, by name
    pub trainers: Arc<TrainerTable>,

    /// Card instance ID generator
    ids: IdAllocator,
}

impl GameState {
    /// Create an empty match in the Setup phase
    pub fn new(
        player: impl Into<PlayerName>,
        opponent: impl Into<PlayerName>,
        rules: RulesConfig,
        trainers: Arc<TrainerTable>,
    ) -> Self {
        GameState {
            sides: PerSide::new(
                SideState::new(player.into()),
                SideState::new(opponent.into()),
            ),
            turn: TurnStructure::new(Side::Player),
            modifiers: Vec::new(),
            result: None,
            events: EventLog::with_clock(rules.event_clock),
            rules,
            trainers,
            ids: IdAllocator::new(),
        }
    }

    /// Deal a fresh match from two deck lists
    ///
    /// Shuffles each deck, deals an opening hand (redealing while it has no
    /// basic creature, up to the mulligan limit), lays out prizes and flips
    /// for the starting side.
    pub fn new_match(
        names: PerSide<PlayerName>,
        decks: PerSide<Vec<Arc<CardDefinition>>>,
        rules: RulesConfig,
        trainers: Arc<TrainerTable>,
        coins: &mut dyn CoinSource,
    ) -> Result<Self> {
        let needed = rules.hand_size + rules.prize_count;
        for (side, deck) in decks.iter() {
            if deck.len() < needed {
                return Err(TcgError::InvalidDeckFormat(format!(
                    "{} deck has {} cards, needs at least {}",
                    side,
                    deck.len(),
                    needed
                )));
            }
        }

        let [player, opponent] = names.into_array();
        let mut game = GameState::new(player, opponent, rules, trainers);

        for (side, deck) in decks.iter() {
            for def in deck {
                game.add_card(side, Arc::clone(def), Zone::Deck);
            }
        }

        let starting = match coins.flip() {
            crate::game::Coin::Heads => Side::Player,
            crate::game::Coin::Tails => Side::Opponent,
        };
        game.turn = TurnStructure::new(starting);
        game.events.info(
            Some(starting),
            format!("{} goes first", game.side(starting).name),
        );

        for side in Side::BOTH {
            game.deal_opening_hand(side, coins);
            let prize_count = game.rules.prize_count;
            for _ in 0..prize_count {
                match game.side_mut(side).deck.draw_top() {
                    Some(card) => game.side_mut(side).prizes.add(card),
                    None => break,
                }
            }
        }

        Ok(game)
    }

    fn deal_opening_hand(&mut self, side: Side, coins: &mut dyn CoinSource) {
        let hand_size = self.rules.hand_size;
        let mut redeals = 0;
        loop {
            self.side_mut(side).deck.shuffle(coins);
            self.draw(side, hand_size);
            let has_basic = self.side(side).hand.iter().any(|c| c.is_basic());
            if has_basic || redeals >= self.rules.mulligan_limit {
                break;
            }
            redeals += 1;
            let name = self.side(side).name.clone();
            self.events
                .info(Some(side), format!("{} has no basic creature and redeals", name));
            let hand = self.side_mut(side).hand.drain_all();
            for card in hand {
                self.side_mut(side).deck.add(card);
            }
        }
    }

    /// Create a card instance for `side` and put it in a zone
    pub fn add_card(&mut self, side: Side, def: Arc<CardDefinition>, zone: Zone) -> CardId {
        let id = self.ids.next_id();
        self.side_mut(side).zone_mut(zone).add(Card::new(id, def));
        id
    }

    pub fn side(&self, side: Side) -> &SideState {
        &self.sides[side]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        &mut self.sides[side]
    }

    pub fn phase(&self) -> GamePhase {
        self.turn.phase
    }

    pub fn is_over(&self) -> bool {
        self.turn.phase == GamePhase::GameOver
    }

    pub fn winner(&self) -> Option<Side> {
        self.result.map(|r| r.winner)
    }

    /// Draw up to `count` cards; returns how many were drawn
    pub fn draw(&mut self, side: Side, count: usize) -> usize {
        let mut drawn = 0;
        for _ in 0..count {
            match self.side_mut(side).deck.draw_top() {
                Some(card) => {
                    self.side_mut(side).hand.add(card);
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }

    /// Apply an action for `side` and return the resulting snapshot
    ///
    /// On rejection the error carries the reason and `self` is unchanged.
    pub fn apply(
        &self,
        side: Side,
        action: &GameAction,
        coins: &mut dyn CoinSource,
    ) -> Result<GameState> {
        let mut next = self.clone();
        next.dispatch(side, action, coins)?;
        Ok(next)
    }

    /// Apply an action, returning an unchanged copy if it is illegal
    pub fn apply_or_keep(
        &self,
        side: Side,
        action: &GameAction,
        coins: &mut dyn CoinSource,
    ) -> GameState {
        self.apply(side, action, coins)
            .unwrap_or_else(|_| self.clone())
    }

    /// The same match seen with the two sides exchanged
    pub fn mirrored(&self) -> GameState {
        let mut m = self.clone();
        m.sides.swap();
        m.turn.starting_side = m.turn.starting_side.opponent();
        m.turn.current_side = m.turn.current_side.opponent();
        for modifier in &mut m.modifiers {
            modifier.owner = modifier.owner.opponent();
        }
        if let Some(result) = &mut m.result {
            result.winner = result.winner.opponent();
        }
        m.events.mirror_sides();
        m
    }

    /// Record the end of the match
    pub(crate) fn declare_winner(&mut self, winner: Side, reason: WinReason) {
        if self.result.is_some() {
            return;
        }
        self.result = Some(MatchResult { winner, reason });
        self.turn.phase = GamePhase::GameOver;
        self.turn.turn_end_pending = false;
        let msg = format!("{} wins: {}", self.side(winner).name, reason);
        self.events.system(Some(winner), msg);
    }

    /// Reject unless it is `side`'s turn in the Playing phase
    pub(crate) fn require_turn(&self, side: Side) -> Result<()> {
        if self.turn.phase != GamePhase::Playing {
            return Err(Rejection::WrongPhase.into());
        }
        if self.turn.current_side != side {
            return Err(Rejection::NotYourTurn.into());
        }
        Ok(())
    }
}
