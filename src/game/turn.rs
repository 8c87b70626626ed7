//! Turn start, checkup and turn handoff

use crate::game::modifiers;
use crate::game::{resolve_checkup, Condition, CoinSource, GamePhase, GameState, Position, WinReason};
use smallvec::SmallVec;

impl GameState {
    /// Both sides are ready: turn 1 begins for the starting side
    pub(crate) fn start_play(&mut self, _coins: &mut dyn CoinSource) {
        self.turn.phase = GamePhase::Playing;
        self.turn.turn_number = 1;
        self.turn.current_side = self.turn.starting_side;
        self.begin_turn();
    }

    fn begin_turn(&mut self) {
        let side = self.turn.current_side;
        let msg = format!("Turn {}: {}'s turn", self.turn.turn_number, self.side(side).name);
        self.events.system(Some(side), msg);

        if !self.rules.draw_at_turn_start {
            return;
        }
        if self.side(side).deck.is_empty() {
            let msg = format!("{} has no cards left to draw", self.side(side).name);
            self.events.system(Some(side), msg);
            self.declare_winner(side.opponent(), WinReason::DeckOut);
            return;
        }
        self.draw(side, 1);
        let msg = format!("{} drew a card", self.side(side).name);
        self.events.info(Some(side), msg);
    }

    /// End-of-turn processing and handoff to the other side
    pub(crate) fn end_turn(&mut self, coins: &mut dyn CoinSource) {
        self.turn.turn_end_pending = false;

        self.run_checkup(coins);
        if self.is_over() {
            return;
        }

        modifiers::expire(&mut self.modifiers, self.turn.turn_number);
        for side in crate::game::Side::BOTH {
            let state = self.side_mut(side);
            state.energy_attached = false;
            state.retreated = false;
        }

        self.turn.advance();
        let turn = self.turn.turn_number;
        for side in crate::game::Side::BOTH {
            let state = self.side_mut(side);
            for slot in std::iter::once(&mut state.active).chain(state.bench.iter_mut()) {
                if let Some(creature) = slot {
                    if creature.protection.map_or(false, |p| !p.is_active(turn)) {
                        creature.protection = None;
                    }
                }
            }
        }

        self.begin_turn();
    }

    /// Run a turn end that was waiting on a prize or promotion choice
    pub(crate) fn finish_deferred_turn(&mut self, coins: &mut dyn CoinSource) {
        if self.turn.turn_end_pending && !self.is_over() && self.pending_choice().is_none() {
            self.end_turn(coins);
        }
    }

    /// Checkup for every creature in play, current side first
    fn run_checkup(&mut self, coins: &mut dyn CoinSource) {
        let current = self.turn.current_side;
        let options = self.rules.checkup;
        for side in [current, current.opponent()] {
            let positions: SmallVec<[Position; 6]> = self.side(side).positions().collect();
            for position in positions {
                let owner = self.side(side).name.clone();
                let Some(creature) = self.side_mut(side).creature_mut(position) else {
                    continue;
                };
                if creature.conditions.is_empty() {
                    continue;
                }
                let poisoned = creature.conditions.contains(Condition::Poisoned);
                let burned = creature.conditions.contains(Condition::Burned);
                let outcome = resolve_checkup(creature.conditions, &options, coins);
                creature.conditions = outcome.conditions;
                creature.add_damage(outcome.damage);
                let name = creature.name().to_string();

                if poisoned {
                    let msg = format!(
                        "{}'s {} took {} poison damage",
                        owner, name, options.poison_damage
                    );
                    self.events.system(Some(side), msg);
                }
                if burned {
                    let msg = format!("{}'s {} took {} burn damage", owner, name, options.burn_damage);
                    self.events.system(Some(side), msg);
                }
                for cured in outcome.cured {
                    let msg = format!("{}'s {} is no longer {}", owner, name, cured);
                    self.events.system(Some(side), msg);
                }
            }
        }
        self.resolve_knockouts([current, current.opponent()]);
    }
}
