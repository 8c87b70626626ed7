//! Greedy turn planner
//!
//! The planner never touches the live match. It walks a fixed priority list
//! against a private copy of the snapshot, applying each candidate action to
//! that copy so later steps see earlier ones (a creature placed in step 1 can
//! receive energy in step 3). Actions the copy rejects are simply left out of
//! the plan.
//!
//! Damage estimates use `GameState::estimate_damage`, which ignores coin-flip
//! effects, so the planner is a one-ply greedy policy and not a search.

use crate::core::{CardId, GameEntity};
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::{
    GameAction, GamePhase, GameState, InPlay, Position, ScriptedCoins, Side, SideState,
    TrainerEffect,
};

/// Private simulation the planner records its plan against
struct Simulation {
    state: GameState,
    side: Side,
    coins: ScriptedCoins,
    plan: Vec<GameAction>,
}

impl Simulation {
    fn new(state: &GameState, side: Side) -> Self {
        Simulation {
            state: state.clone(),
            side,
            coins: ScriptedCoins::default(),
            plan: Vec::new(),
        }
    }

    fn me(&self) -> &SideState {
        self.state.side(self.side)
    }

    /// Apply `action` to the copy; keep it in the plan only if it was accepted
    fn try_apply(&mut self, action: GameAction) -> bool {
        match self.state.apply(self.side, &action, &mut self.coins) {
            Ok(next) => {
                self.state = next;
                self.plan.push(action);
                true
            }
            Err(_) => false,
        }
    }
}

/// How many more energy the creature needs for its cheapest attack
///
/// A creature with no attacks needs nothing.
fn energy_need(creature: &InPlay) -> u8 {
    let attached = creature.attached_types();
    creature
        .attacks()
        .iter()
        .map(|a| a.cost.shortfall(&attached))
        .min()
        .unwrap_or(0)
}

/// Bench slot holding the creature with the most remaining HP (first on ties)
pub fn best_promotion(state: &SideState) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (slot, creature) in state.benched() {
        let hp = creature.remaining_hp();
        if best.map_or(true, |(_, best_hp)| hp > best_hp) {
            best = Some((slot, hp));
        }
    }
    best.map(|(slot, _)| slot)
}

/// Build the ordered plan for `side` from a snapshot
///
/// Empty when the match is over, when a choice is pending, when it is not
/// `side`'s turn, or when `side` already declared itself ready during setup.
pub fn plan_turn(state: &GameState, side: Side) -> Vec<GameAction> {
    if state.is_over() || state.pending_choice().is_some() {
        return Vec::new();
    }
    let mut sim = Simulation::new(state, side);
    match state.phase() {
        GamePhase::Setup => {
            if state.side(side).ready {
                return Vec::new();
            }
            place_active(&mut sim);
            fill_bench(&mut sim);
            sim.try_apply(GameAction::EndTurn);
        }
        GamePhase::Playing => {
            if state.turn.current_side != side {
                return Vec::new();
            }
            place_active(&mut sim);
            fill_bench(&mut sim);
            attach_energy(&mut sim);
            evolve_all(&mut sim);
            play_trainers(&mut sim);
            if !attack(&mut sim) {
                sim.plan.push(GameAction::EndTurn);
            }
        }
        GamePhase::GameOver => {}
    }
    sim.plan
}

/// Step 1: the highest-HP basic in hand becomes the active creature
fn place_active(sim: &mut Simulation) {
    if sim.me().active.is_some() {
        return;
    }
    let mut best: Option<(CardId, u32)> = None;
    for card in sim.me().hand.iter().filter(|c| c.is_basic()) {
        if best.map_or(true, |(_, hp)| card.hp() > hp) {
            best = Some((card.id(), card.hp()));
        }
    }
    if let Some((card, _)) = best {
        sim.try_apply(GameAction::PlaceActive { card });
    }
}

/// Step 2: fill empty bench slots in order with basics in hand order
fn fill_bench(sim: &mut Simulation) {
    while let Some(slot) = sim.me().first_empty_bench_slot() {
        let Some(card) = sim.me().hand.iter().find(|c| c.is_basic()).map(|c| c.id()) else {
            break;
        };
        if !sim.try_apply(GameAction::PlaceBench {
            card,
            slot: Some(slot),
        }) {
            break;
        }
    }
}

/// Step 3: one energy to whoever needs it most
fn attach_energy(sim: &mut Simulation) {
    if !sim.state.can_attach_energy(sim.side) {
        return;
    }
    let me = sim.me();
    let target = match me.active.as_ref() {
        Some(active) if energy_need(active) > 0 => Some(Position::Active),
        _ => me
            .benched()
            .find(|(_, c)| energy_need(c) > 0)
            .map(|(i, _)| Position::Bench(i))
            .or_else(|| me.active.as_ref().map(|_| Position::Active)),
    };
    let Some(target) = target else {
        return;
    };
    let Some(creature) = me.creature(target) else {
        return;
    };

    // The energy card that closes the most of the gap, first on ties
    let mut best: Option<(CardId, u8)> = None;
    for card in me.hand.iter() {
        let Some(energy) = card.energy_type() else {
            continue;
        };
        let mut attached = creature.attached_types();
        attached.push(energy);
        let need = creature
            .attacks()
            .iter()
            .map(|a| a.cost.shortfall(&attached))
            .min()
            .unwrap_or(0);
        if best.map_or(true, |(_, best_need)| need < best_need) {
            best = Some((card.id(), need));
        }
    }
    if let Some((card, _)) = best {
        sim.try_apply(GameAction::AttachEnergy { card, target });
    }
}

/// Step 4: every evolution in hand, onto the active when it can take it
fn evolve_all(sim: &mut Simulation) {
    let evolutions: Vec<CardId> = sim
        .me()
        .hand
        .iter()
        .filter(|c| c.is_creature() && !c.is_basic())
        .map(|c| c.id())
        .collect();
    for card in evolutions {
        let target = sim
            .me()
            .positions()
            .find(|p| sim.state.can_evolve(sim.side, card, *p));
        if let Some(target) = target {
            sim.try_apply(GameAction::Evolve { card, target });
        }
    }
}

/// Step 5: trainers whose effect is worth it right now
fn play_trainers(sim: &mut Simulation) {
    let trainers: Vec<CardId> = sim
        .me()
        .hand
        .iter()
        .filter(|c| c.is_trainer())
        .map(|c| c.id())
        .collect();
    for card in trainers {
        let Some(name) = sim.me().hand_card(card).map(|c| c.name().to_string()) else {
            continue;
        };
        let Some(effect) = sim.state.trainers.get(&name) else {
            continue;
        };
        let me = sim.me();
        let target = match effect {
            TrainerEffect::Draw(_) => Some(None),
            TrainerEffect::Heal(amount) => me
                .positions()
                .find(|p| me.creature(*p).map_or(false, |c| c.damage > 0 && c.damage >= amount))
                .map(Some),
            TrainerEffect::DamageBoost(_) => me.active.as_ref().map(|_| None),
            TrainerEffect::ClearConditions => me
                .active
                .as_ref()
                .filter(|a| !a.conditions.is_empty())
                .map(|_| Some(Position::Active)),
        };
        if let Some(target) = target {
            sim.try_apply(GameAction::PlayTrainer { card, target });
        }
    }
}

/// Step 6: a knockout if one is on the table, else the biggest hit
fn attack(sim: &mut Simulation) -> bool {
    let side = sim.side;
    if !sim.state.can_attack(side) {
        return false;
    }
    let affordable = sim.state.affordable_attacks(side);
    if affordable.is_empty() {
        return false;
    }
    let defender_hp = sim
        .state
        .side(side.opponent())
        .active
        .as_ref()
        .map(|d| d.remaining_hp())
        .unwrap_or(0);

    let estimates: Vec<(usize, u32)> = affordable
        .iter()
        .map(|i| (*i, sim.state.estimate_damage(side, *i)))
        .collect();
    let knockout = estimates
        .iter()
        .find(|(_, dmg)| *dmg > 0 && *dmg >= defender_hp)
        .map(|(i, _)| *i);
    let index = knockout.unwrap_or_else(|| {
        let mut best = estimates[0];
        for candidate in &estimates[1..] {
            if candidate.1 > best.1 {
                best = *candidate;
            }
        }
        best.0
    });

    // The attack itself is not simulated: its outcome depends on real flips
    sim.plan.push(GameAction::Attack { index });
    true
}

/// Controller backed by the greedy planner
pub struct HeuristicPlanner {
    side: Side,
    name: String,
}

impl HeuristicPlanner {
    pub fn new(side: Side) -> Self {
        HeuristicPlanner {
            side,
            name: format!("heuristic-{}", side),
        }
    }

    pub fn plan(&self, state: &GameState) -> Vec<GameAction> {
        plan_turn(state, self.side)
    }
}

impl PlayerController for HeuristicPlanner {
    fn side(&self) -> Side {
        self.side
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn plan_turn(&mut self, view: &GameStateView) -> Vec<GameAction> {
        self.plan(view.state())
    }

    fn choose_promotion(&mut self, view: &GameStateView, candidates: &[usize]) -> usize {
        let best = best_promotion(view.me());
        match best {
            Some(slot) if candidates.contains(&slot) => slot,
            _ => candidates.first().copied().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attack, CardDefinition, EnergyType};
    use crate::game::{RulesConfig, TrainerTable};
    use crate::zones::Zone;
    use std::sync::Arc;

    fn creature(number: u32, name: &str, hp: u32, cost: &str, damage: u32) -> Arc<CardDefinition> {
        Arc::new(
            CardDefinition::basic_creature(number, name, hp, EnergyType::Fire)
                .with_attack(Attack::new("Hit", cost, damage)),
        )
    }

    fn setup_game() -> GameState {
        GameState::new(
            "Alice",
            "Bob",
            RulesConfig::default(),
            Arc::new(TrainerTable::standard()),
        )
    }

    #[test]
    fn test_setup_plan_places_biggest_basic_and_readies() {
        let mut game = setup_game();
        let small = game.add_card(Side::Player, creature(1, "Small", 40, "R", 10), Zone::Hand);
        let big = game.add_card(Side::Player, creature(2, "Big", 90, "R", 10), Zone::Hand);
        let energy = Arc::new(CardDefinition::energy(3, EnergyType::Fire));
        game.add_card(Side::Player, energy, Zone::Hand);

        let plan = plan_turn(&game, Side::Player);
        assert_eq!(
            plan,
            vec![
                GameAction::PlaceActive { card: big },
                GameAction::PlaceBench {
                    card: small,
                    slot: Some(0)
                },
                GameAction::EndTurn,
            ]
        );
    }

    #[test]
    fn test_no_plan_once_ready() {
        let mut game = setup_game();
        game.side_mut(Side::Player).ready = true;
        assert!(plan_turn(&game, Side::Player).is_empty());
    }

    #[test]
    fn test_best_promotion_prefers_remaining_hp() {
        let mut game = setup_game();
        let a = game.add_card(Side::Opponent, creature(1, "A", 60, "R", 10), Zone::Hand);
        let b = game.add_card(Side::Opponent, creature(2, "B", 60, "R", 10), Zone::Hand);
        let mut coins = ScriptedCoins::default();
        let mut game = game
            .apply(Side::Opponent, &GameAction::PlaceBench { card: a, slot: None }, &mut coins)
            .unwrap()
            .apply(Side::Opponent, &GameAction::PlaceBench { card: b, slot: None }, &mut coins)
            .unwrap();
        if let Some(c) = game.side_mut(Side::Opponent).bench[0].as_mut() {
            c.add_damage(20);
        }
        assert_eq!(best_promotion(game.side(Side::Opponent)), Some(1));
    }
}
