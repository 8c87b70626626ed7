//! Placement, energy, evolution, retreat and the pending-choice actions

use crate::core::{CardId, GameEntity};
use crate::game::{CoinSource, GamePhase, GameState, InPlay, Position, Side, BENCH_SIZE};
use crate::{Rejection, Result};

impl GameState {
    /// Take a basic creature out of hand, or reject without touching the hand
    fn take_basic(&mut self, side: Side, card: CardId) -> Result<InPlay> {
        let in_hand = self
            .side(side)
            .hand_card(card)
            .ok_or(Rejection::CardNotInHand)?;
        if !in_hand.is_basic() {
            return Err(Rejection::NotABasic.into());
        }
        let card = self
            .side_mut(side)
            .hand
            .remove(card)
            .ok_or(Rejection::CardNotInHand)?;
        Ok(InPlay::new(card, self.turn.placement_turn()))
    }

    pub(crate) fn place_active(&mut self, side: Side, card: CardId) -> Result<()> {
        if self.side(side).active.is_some() {
            return Err(Rejection::SlotOccupied.into());
        }
        let creature = self.take_basic(side, card)?;
        let msg = format!(
            "{} placed {} as the active creature",
            self.side(side).name,
            creature.name()
        );
        self.side_mut(side).active = Some(creature);
        self.events.action(Some(side), msg);
        Ok(())
    }

    pub(crate) fn place_bench(&mut self, side: Side, card: CardId, slot: Option<usize>) -> Result<()> {
        let slot = match slot {
            Some(i) if i >= BENCH_SIZE => return Err(Rejection::InvalidSlot.into()),
            Some(i) if self.side(side).bench[i].is_some() => {
                return Err(Rejection::SlotOccupied.into())
            }
            Some(i) => i,
            None => self
                .side(side)
                .first_empty_bench_slot()
                .ok_or(Rejection::BenchFull)?,
        };
        let creature = self.take_basic(side, card)?;
        let msg = format!(
            "{} placed {} on the bench",
            self.side(side).name,
            creature.name()
        );
        self.side_mut(side).bench[slot] = Some(creature);
        self.events.action(Some(side), msg);
        Ok(())
    }

    pub(crate) fn attach_energy(&mut self, side: Side, card: CardId, target: Position) -> Result<()> {
        let state = self.side(side);
        if state.energy_attached {
            return Err(Rejection::EnergyAlreadyAttached.into());
        }
        let energy = state.hand_card(card).ok_or(Rejection::CardNotInHand)?;
        if !energy.is_energy() {
            return Err(Rejection::NotAnEnergy.into());
        }
        if matches!(target, Position::Bench(i) if i >= BENCH_SIZE) {
            return Err(Rejection::InvalidSlot.into());
        }
        if state.creature(target).is_none() {
            return Err(Rejection::EmptySlot.into());
        }

        let name = state.name.clone();
        let energy = self
            .side_mut(side)
            .hand
            .remove(card)
            .ok_or(Rejection::CardNotInHand)?;
        let energy_name = energy.name().to_string();
        let creature = self
            .side_mut(side)
            .creature_mut(target)
            .ok_or(Rejection::EmptySlot)?;
        creature.energy.push(energy);
        let msg = format!("{} attached {} to {}", name, energy_name, creature.name());
        self.side_mut(side).energy_attached = true;
        self.events.action(Some(side), msg);
        Ok(())
    }

    pub(crate) fn evolve(&mut self, side: Side, card: CardId, target: Position) -> Result<()> {
        self.check_evolve(side, card, target)?;
        let turn = self.turn.placement_turn();
        let name = self.side(side).name.clone();
        let evo = self
            .side_mut(side)
            .hand
            .remove(card)
            .ok_or(Rejection::CardNotInHand)?;
        let creature = self
            .side_mut(side)
            .creature_mut(target)
            .ok_or(Rejection::EmptySlot)?;
        let from = creature.name().to_string();
        creature.evolve_into(evo, turn);
        let msg = format!("{} evolved {} into {}", name, from, creature.name());
        self.events.action(Some(side), msg);
        Ok(())
    }

    /// Swap the active creature with a benched one
    ///
    /// `energy` must name exactly as many cards attached to the active
    /// creature as the discounted retreat cost.
    pub(crate) fn retreat(&mut self, side: Side, bench_slot: usize, energy: &[CardId]) -> Result<()> {
        self.check_retreat(side)?;
        if bench_slot >= BENCH_SIZE {
            return Err(Rejection::InvalidSlot.into());
        }
        if self.side(side).bench[bench_slot].is_none() {
            return Err(Rejection::EmptySlot.into());
        }

        let cost = self.retreat_cost(side) as usize;
        let active = self.side(side).active.as_ref().ok_or(Rejection::NoActive)?;
        let distinct = energy
            .iter()
            .enumerate()
            .all(|(i, id)| !energy[..i].contains(id));
        let attached = energy
            .iter()
            .all(|id| active.energy.iter().any(|c| c.id == *id));
        if energy.len() != cost || !distinct || !attached {
            return Err(Rejection::InvalidRetreatPayment.into());
        }

        let state = self.side_mut(side);
        let mut old_active = state.active.take().ok_or(Rejection::NoActive)?;
        let paid = old_active.detach_by_id(energy);
        for card in paid {
            state.discard.add(card);
        }
        old_active.reset_volatile();
        let new_active = state.bench[bench_slot].take();
        let msg = format!(
            "{} retreated {} and sent out {}",
            state.name,
            old_active.name(),
            new_active.as_ref().map(|c| c.name()).unwrap_or("nothing")
        );
        state.bench[bench_slot] = Some(old_active);
        state.active = new_active;
        state.retreated = true;
        self.events.action(Some(side), msg);
        Ok(())
    }

    /// Fill the empty active spot after a knockout
    pub(crate) fn promote(&mut self, side: Side, bench_slot: usize, coins: &mut dyn CoinSource) -> Result<()> {
        if self.turn.phase != GamePhase::Playing {
            return Err(Rejection::WrongPhase.into());
        }
        if !self.side(side).pending_promotion {
            return Err(Rejection::NothingPending.into());
        }
        if bench_slot >= BENCH_SIZE {
            return Err(Rejection::InvalidSlot.into());
        }
        let state = self.side_mut(side);
        let creature = state.bench[bench_slot].take().ok_or(Rejection::EmptySlot)?;
        let msg = format!("{} promoted {} to active", state.name, creature.name());
        state.active = Some(creature);
        state.pending_promotion = false;
        self.events.action(Some(side), msg);
        self.finish_deferred_turn(coins);
        Ok(())
    }

    /// Take one owed prize card into hand
    pub(crate) fn take_prize(&mut self, side: Side, index: usize, coins: &mut dyn CoinSource) -> Result<()> {
        if self.turn.phase != GamePhase::Playing {
            return Err(Rejection::WrongPhase.into());
        }
        if self.side(side).pending_prizes == 0 {
            return Err(Rejection::NothingPending.into());
        }
        let state = self.side_mut(side);
        let prize = state.prizes.take_at(index).ok_or(Rejection::InvalidPrizeIndex)?;
        state.hand.add(prize);
        state.pending_prizes -= 1;
        let remaining = state.prizes.len();
        if remaining == 0 {
            state.pending_prizes = 0;
        }
        let msg = format!(
            "{} took a prize card ({} left)",
            state.name, remaining
        );
        self.events.action(Some(side), msg);

        if remaining == 0 {
            self.declare_winner(side, crate::game::WinReason::Prizes);
            return Ok(());
        }
        self.finish_deferred_turn(coins);
        Ok(())
    }

    /// Mark a side ready during setup; start play once both are
    pub(crate) fn declare_ready(&mut self, side: Side, coins: &mut dyn CoinSource) -> Result<()> {
        if self.side(side).active.is_none() {
            return Err(Rejection::NotReady.into());
        }
        self.side_mut(side).ready = true;
        let msg = format!("{} is ready", self.side(side).name);
        self.events.info(Some(side), msg);

        if Side::BOTH.iter().all(|s| self.side(*s).ready) {
            self.start_play(coins);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardDefinition, EnergyType, Stage};
    use crate::game::{GameAction, RulesConfig, ScriptedCoins, TrainerTable};
    use crate::zones::Zone;
    use std::sync::Arc;

    fn empty_game() -> GameState {
        GameState::new("Alice", "Bob", RulesConfig::default(), Arc::new(TrainerTable::standard()))
    }

    fn charmander() -> Arc<CardDefinition> {
        Arc::new(CardDefinition::basic_creature(46, "Charmander", 50, EnergyType::Fire).with_retreat_cost(1))
    }

    #[test]
    fn test_place_requires_basic_in_hand() {
        let mut game = empty_game();
        let mut coins = ScriptedCoins::default();
        let evo = Arc::new(
            CardDefinition::basic_creature(24, "Charmeleon", 80, EnergyType::Fire)
                .evolves_from("Charmander", Stage::Stage1),
        );
        let evo_id = game.add_card(Side::Player, evo, Zone::Hand);
        let err = game
            .apply(Side::Player, &GameAction::PlaceActive { card: evo_id }, &mut coins)
            .unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::NotABasic));

        let err = game
            .apply(Side::Player, &GameAction::PlaceActive { card: CardId::new(99) }, &mut coins)
            .unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::CardNotInHand));
    }

    #[test]
    fn test_bench_fills_first_empty_slot_and_rejects_when_full() {
        let mut game = empty_game();
        let mut coins = ScriptedCoins::default();
        for _ in 0..6 {
            game.add_card(Side::Player, charmander(), Zone::Hand);
        }
        let ids: Vec<CardId> = game.side(Side::Player).hand.iter().map(|c| c.id).collect();
        for id in &ids[..5] {
            game = game
                .apply(Side::Player, &GameAction::PlaceBench { card: *id, slot: None }, &mut coins)
                .unwrap();
        }
        assert_eq!(game.side(Side::Player).bench_count(), 5);
        let err = game
            .apply(Side::Player, &GameAction::PlaceBench { card: ids[5], slot: None }, &mut coins)
            .unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::BenchFull));
    }

    #[test]
    fn test_ready_requires_active() {
        let game = empty_game();
        let err = game
            .apply(Side::Player, &GameAction::EndTurn, &mut ScriptedCoins::default())
            .unwrap_err();
        assert_eq!(err.rejection(), Some(Rejection::NotReady));
    }

    #[test]
    fn test_setup_placement_is_turn_one() {
        let mut game = empty_game();
        let id = game.add_card(Side::Player, charmander(), Zone::Hand);
        let game = game
            .apply(Side::Player, &GameAction::PlaceActive { card: id }, &mut ScriptedCoins::default())
            .unwrap();
        assert_eq!(game.side(Side::Player).active.as_ref().unwrap().entered_turn, 1);
    }
}
