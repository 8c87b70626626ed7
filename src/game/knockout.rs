//! Knockouts, prize eligibility and promotion

use crate::game::{GameState, Position, Side, WinReason};
use smallvec::SmallVec;

impl GameState {
    /// Knock out every creature whose damage has reached its HP
    ///
    /// Sides are processed in `order`; within a side the bench goes first so
    /// the promotion check sees only survivors. Stops as soon as the match ends.
    pub(crate) fn resolve_knockouts(&mut self, order: [Side; 2]) {
        for owner in order {
            let state = self.side(owner);
            let mut knocked: SmallVec<[Position; 6]> = state
                .benched()
                .filter(|(_, c)| c.is_knocked_out())
                .map(|(i, _)| Position::Bench(i))
                .collect();
            if state.active.as_ref().map_or(false, |c| c.is_knocked_out()) {
                knocked.push(Position::Active);
            }
            for position in knocked {
                if self.is_over() {
                    return;
                }
                self.knock_out(owner, position);
            }
        }
    }

    fn knock_out(&mut self, owner: Side, position: Position) {
        let taker = owner.opponent();
        let state = self.side_mut(owner);
        let Some(creature) = state.take_creature(position) else {
            return;
        };
        let msg = format!("{}'s {} was knocked out", state.name, creature.name());
        for card in creature.into_cards() {
            state.discard.add(card);
        }
        self.events.system(Some(owner), msg);

        if self.side(taker).prizes.is_empty() {
            self.declare_winner(taker, WinReason::Prizes);
            return;
        }
        let taker_state = self.side_mut(taker);
        let available = taker_state.prizes.len().min(u8::MAX as usize) as u8;
        taker_state.pending_prizes = (taker_state.pending_prizes + 1).min(available);
        let msg = format!("{} may take a prize card", taker_state.name);
        self.events.info(Some(taker), msg);

        if position == Position::Active {
            if self.side(owner).has_bench() {
                let state = self.side_mut(owner);
                state.pending_promotion = true;
                let msg = format!("{} must choose a new active creature", state.name);
                self.events.info(Some(owner), msg);
            } else {
                self.declare_winner(taker, WinReason::NoBench);
            }
        }
    }
}
