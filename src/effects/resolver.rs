//! Effect application - playing a card against resolved targets.
//!
//! `EffectEngine::apply_card` is the only place card mods touch combatant
//! stats. A play runs in five steps with no interleaving:
//!
//! 1. Validate: the card is in the actor's `HAND`, energy covers the cost,
//!    every target exists. Nothing is mutated if any check fails.
//! 2. Deduct the cost.
//! 3. Apply every mod to every target, in target order then mod order.
//!    `duration == 0` changes the stat now; `duration > 0` stacks a status.
//! 4. Recompute `alive` for each target.
//! 5. Route the card out of `HAND` per the `RoutingPolicy`.

use crate::cards::StatId;
use crate::core::{
    CardInstanceId, CombatError, CombatState, Combatant, CombatantId, PlayRouting, RoutingPolicy,
};
use crate::piles::PileKind;

use super::effect::{AppliedMod, EffectOutcome, LifeChange, StatusStack};
use super::targeting::TargetList;

/// Applies card plays to combat state.
pub struct EffectEngine;

impl EffectEngine {
    /// Play `card` from `actor`'s hand against `targets`.
    ///
    /// The target list is a snapshot: a combatant killed by an earlier mod
    /// still receives the rest of the play.
    pub fn apply_card(
        state: &mut CombatState,
        actor: CombatantId,
        card: CardInstanceId,
        targets: &[CombatantId],
        routing: &RoutingPolicy,
    ) -> Result<EffectOutcome, CombatError> {
        // Step 1: validate everything up front
        let owner = state.combatant(actor)?;
        let template = owner
            .piles()
            .get(card, PileKind::Hand)
            .ok_or(CombatError::InvalidPileOperation {
                card,
                pile: PileKind::Hand,
            })?
            .card
            .clone();

        if i64::from(template.cost) > owner.energy {
            return Err(CombatError::InsufficientResources {
                combatant: actor,
                required: template.cost,
                available: owner.energy,
            });
        }
        for &target in targets {
            state.combatant(target)?;
        }

        // Step 2: pay, and lift the card out of hand
        let owner = state.combatant_mut(actor)?;
        owner.energy -= i64::from(template.cost);
        let instance = owner.piles_mut().take(card, PileKind::Hand)?;

        // Step 3: mods
        let mut applied = Vec::with_capacity(targets.len() * template.mods.len());
        for &target in targets {
            let combatant = state.combatant_mut(target)?;
            for stat_mod in &template.mods {
                if stat_mod.is_status() {
                    apply_status(combatant, &stat_mod.stat, stat_mod.magnitude, stat_mod.duration);
                } else {
                    combatant.modify_stat(&stat_mod.stat, stat_mod.magnitude);
                }
                tracing::debug!(
                    %target,
                    stat = %stat_mod.stat,
                    magnitude = stat_mod.magnitude,
                    duration = stat_mod.duration,
                    "applied mod"
                );
                applied.push(AppliedMod {
                    target,
                    stat: stat_mod.stat.clone(),
                    magnitude: stat_mod.magnitude,
                    duration: stat_mod.duration,
                });
            }
        }

        // Step 4: life state
        let mut life_changes = Vec::new();
        for &target in targets {
            if life_changes.iter().any(|c: &LifeChange| c.combatant == target) {
                continue;
            }
            let combatant = state.combatant_mut(target)?;
            if combatant.refresh_alive() {
                life_changes.push(LifeChange {
                    combatant: target,
                    alive: combatant.alive,
                });
            }
        }

        // Step 5: route
        let route = routing.route(&template);
        let duplicate = match route {
            PlayRouting::Discard => {
                state.combatant_mut(actor)?.piles_mut().add(instance, PileKind::Discard);
                None
            }
            PlayRouting::Void => {
                state.combatant_mut(actor)?.piles_mut().add(instance, PileKind::Void);
                None
            }
            PlayRouting::Duplicate => {
                let copy_id = state.alloc_card_id();
                let copy = instance.duplicate(copy_id);
                let piles = state.combatant_mut(actor)?.piles_mut();
                piles.add(instance, PileKind::Discard);
                piles.add(copy, PileKind::Discard);
                Some(copy_id)
            }
        };

        tracing::debug!(%actor, %card, name = %template.name, ?route, "card resolved");

        Ok(EffectOutcome {
            actor,
            card,
            card_name: template.name,
            energy_spent: template.cost,
            targets: TargetList::from_slice(targets),
            applied,
            life_changes,
            routing: route,
            duplicate,
        })
    }

    /// Count down every status stack on `combatant` by one turn.
    ///
    /// Returns the stats whose stacks expired, sorted.
    pub fn decay_status(combatant: &mut Combatant) -> Vec<StatId> {
        let mut expired: Vec<StatId> = combatant
            .status
            .iter_mut()
            .filter_map(|(stat, stack)| stack.tick().then(|| stat.clone()))
            .collect();
        expired.sort();

        for stat in &expired {
            combatant.status.remove(stat);
        }
        expired
    }
}

fn apply_status(combatant: &mut Combatant, stat: &str, magnitude: i64, duration: u32) {
    match combatant.status.get_mut(stat) {
        Some(stack) => stack.stack(magnitude, duration),
        None => {
            combatant
                .status
                .insert(stat.to_string(), StatusStack::new(magnitude, duration));
        }
    }
}
