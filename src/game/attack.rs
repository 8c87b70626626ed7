//! Attack resolution
//!
//! Pipeline, in order: legality, confusion flip, discard-cost gating, damage
//! roll, weakness/resistance, protection, secondary effects, knockouts, and
//! finally the turn end (deferred while a prize or promotion is pending).

use crate::core::{Attack, AttackEffect, BenchTarget, Participant};
use crate::game::damage::apply_weakness_resistance;
use crate::game::{Coin, CoinSource, Condition, GameState, Position, Protection, Side};
use crate::{Rejection, Result};

fn participant_side(attacker: Side, who: Participant) -> Side {
    match who {
        Participant::Attacker => attacker,
        Participant::Defender => attacker.opponent(),
    }
}

impl GameState {
    pub(crate) fn resolve_attack(
        &mut self,
        side: Side,
        index: usize,
        coins: &mut dyn CoinSource,
    ) -> Result<()> {
        self.check_attack_legal(side, index)?;

        let defending = side.opponent();
        let owner = self.side(side).name.clone();
        let active = self.side(side).active.as_ref().ok_or(Rejection::NoActive)?;
        let attack: Attack = active
            .attack(index)
            .cloned()
            .ok_or(Rejection::InvalidAttackIndex)?;
        let attacker_name = active.name().to_string();
        let confused = active.conditions.contains(Condition::Confused);
        self.events.action(
            Some(side),
            format!("{}'s {} used {}", owner, attacker_name, attack.name),
        );

        if confused {
            let coin = coins.flip();
            if coin == Coin::Tails {
                let amount = self.rules.confusion_damage;
                if let Some(active) = self.side_mut(side).active.as_mut() {
                    active.add_damage(amount);
                }
                self.events.system(
                    Some(side),
                    format!(
                        "{} is confused and flipped tails: the attack fails and it takes {} damage",
                        attacker_name, amount
                    ),
                );
                self.resolve_knockouts([side, defending]);
                self.conclude_attack(coins);
                return Ok(());
            }
            self.events.info(
                Some(side),
                format!("{} flipped heads and attacks through its confusion", attacker_name),
            );
        }

        self.check_discard_costs(side, index)?;

        if attack.once_while_in_play {
            if let Some(active) = self.side_mut(side).active.as_mut() {
                active.used_attacks.push(index);
            }
        }

        let roll = self.roll_damage(side, &attack, coins);
        if roll.failed {
            self.events
                .info(Some(side), format!("{} flipped tails: {} did nothing", owner, attack.name));
            self.conclude_attack(coins);
            return Ok(());
        }

        let turn = self.turn.turn_number;
        let attacker_type = self
            .side(side)
            .active
            .as_ref()
            .map(|a| a.element())
            .ok_or(Rejection::NoActive)?;
        let defender = self
            .side(defending)
            .active
            .as_ref()
            .ok_or(Rejection::NoDefender)?;
        let defender_name = defender.name().to_string();
        let mut damage = apply_weakness_resistance(roll.amount, attacker_type, defender, &self.rules);

        let protection = defender.protection.filter(|p| p.is_active(turn));
        let effects_blocked = protection.map_or(false, |p| p.kind.blocks_effects());
        if let Some(p) = protection {
            if p.kind.blocks_damage() && (damage > 0 || effects_blocked) {
                self.events.info(
                    Some(defending),
                    format!("{} is protected from the attack", defender_name),
                );
                damage = 0;
            }
        }

        if damage > 0 {
            if let Some(defender) = self.side_mut(defending).active.as_mut() {
                defender.add_damage(damage);
            }
            let msg = format!("{} took {} damage", defender_name, damage);
            self.events.action(Some(defending), msg);
        }

        for effect in &attack.effects {
            if effects_blocked && !effect.is_cost() {
                continue;
            }
            self.apply_attack_effect(side, effect, coins)?;
        }

        self.resolve_knockouts([defending, side]);
        self.conclude_attack(coins);
        Ok(())
    }

    /// Attacking ends the turn, unless a choice has to be made first
    fn conclude_attack(&mut self, coins: &mut dyn CoinSource) {
        if self.is_over() {
            return;
        }
        if self.pending_choice().is_some() {
            self.turn.turn_end_pending = true;
        } else {
            self.end_turn(coins);
        }
    }

    fn apply_attack_effect(
        &mut self,
        side: Side,
        effect: &AttackEffect,
        coins: &mut dyn CoinSource,
    ) -> Result<()> {
        let defending = side.opponent();
        let turn = self.turn.turn_number;
        match effect {
            // Folded into the damage roll
            AttackEffect::ExtraEnergyBonus { .. }
            | AttackEffect::DamageCounterScaling { .. }
            | AttackEffect::CoinFlipMultiplier { .. }
            | AttackEffect::CoinFlipBonus { .. }
            | AttackEffect::CoinFlipOrFail => {}

            AttackEffect::SelfDamage { amount } => {
                if let Some(active) = self.side_mut(side).active.as_mut() {
                    active.add_damage(*amount);
                    let msg = format!("{} hurt itself for {} damage", active.name(), amount);
                    self.events.info(Some(side), msg);
                }
            }

            AttackEffect::BenchDamage { target, amount } => {
                let sides = match target {
                    BenchTarget::Own => vec![side],
                    BenchTarget::Opponent => vec![defending],
                    BenchTarget::Both => vec![side, defending],
                };
                for bench_side in sides {
                    let mut hit = Vec::new();
                    for slot in self.side_mut(bench_side).bench.iter_mut().flatten() {
                        if slot.protection.map_or(false, |p| p.blocks_damage(turn)) {
                            continue;
                        }
                        slot.add_damage(*amount);
                        hit.push(format!("benched {} took {} damage", slot.name(), amount));
                    }
                    for msg in hit {
                        self.events.info(Some(bench_side), msg);
                    }
                }
            }

            AttackEffect::InflictCondition {
                target,
                condition,
                coin_gated,
            } => {
                let target_side = participant_side(side, *target);
                if self.side(target_side).active.is_none() {
                    return Ok(());
                }
                if *coin_gated && coins.flip() == Coin::Tails {
                    self.events
                        .info(Some(side), format!("flipped tails: no {} effect", condition));
                    return Ok(());
                }
                self.apply_condition(target_side, Position::Active, *condition)?;
            }

            AttackEffect::DiscardEnergy {
                from,
                energy,
                count,
                ..
            } => {
                let from_side = participant_side(side, *from);
                let state = self.side_mut(from_side);
                let removed = match state.active.as_mut() {
                    Some(active) => active.detach_energy(*energy, *count as usize),
                    None => Vec::new(),
                };
                let n = removed.len();
                for card in removed {
                    state.discard.add(card);
                }
                if n > 0 {
                    let msg = format!("{} discarded {} energy", state.name, n);
                    self.events.info(Some(from_side), msg);
                }
            }

            AttackEffect::Draw { count } => {
                let drawn = self.draw(side, *count as usize);
                let msg = format!("{} drew {} card(s)", self.side(side).name, drawn);
                self.events.info(Some(side), msg);
            }

            AttackEffect::ForceSwitch => {
                let state = self.side_mut(defending);
                let switchable = state
                    .active
                    .as_ref()
                    .map_or(false, |a| !a.is_knocked_out());
                let slot = state.benched().map(|(i, _)| i).next();
                if let (true, Some(slot)) = (switchable, slot) {
                    let incoming = state.bench[slot].take();
                    let mut outgoing = state.active.take();
                    if let Some(out) = outgoing.as_mut() {
                        out.reset_volatile();
                    }
                    let msg = format!(
                        "{} was forced to switch in {}",
                        state.name,
                        incoming.as_ref().map(|c| c.name()).unwrap_or("nothing")
                    );
                    state.bench[slot] = outgoing;
                    state.active = incoming;
                    self.events.info(Some(defending), msg);
                }
            }

            AttackEffect::Protect {
                protection,
                coin_gated,
            } => {
                if *coin_gated && coins.flip() == Coin::Tails {
                    self.events.info(Some(side), "flipped tails: no protection");
                    return Ok(());
                }
                if let Some(active) = self.side_mut(side).active.as_mut() {
                    active.protection = Some(Protection::grant(*protection, turn + 1));
                    let msg = format!("{} is protected during the next turn", active.name());
                    self.events.info(Some(side), msg);
                }
            }

            AttackEffect::HealSelf { amount } => {
                if let Some(active) = self.side_mut(side).active.as_mut() {
                    let healed = active.heal(*amount);
                    let msg = format!("{} healed {} damage", active.name(), healed);
                    self.events.info(Some(side), msg);
                }
            }

            AttackEffect::ConvertWeakness { to } => {
                if let Some(defender) = self.side_mut(defending).active.as_mut() {
                    defender.weakness_override = Some(*to);
                    let msg = format!("{}'s weakness is now {}", defender.name(), to);
                    self.events.info(Some(defending), msg);
                }
            }

            AttackEffect::DevolveDefender => {
                let state = self.side_mut(defending);
                let devolved = state.active.as_mut().and_then(|d| d.devolve());
                if let Some(card) = devolved {
                    let msg = format!("{} returned {} to hand", state.name, card.def.name);
                    state.hand.add(card);
                    self.events.info(Some(defending), msg);
                }
            }
        }
        Ok(())
    }
}
