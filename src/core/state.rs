//! Combat state: the aggregate root of an encounter.
//!
//! `CombatState` holds both groups, the phase, the turn counter, the acting
//! combatant, the action history, and the RNG. It is created at encounter
//! start from group rosters and starting decks, mutated only through the
//! `TurnScheduler` and `EffectEngine`, and dropped once the encounter ends.
//!
//! Piles and history use `im` persistent vectors, so `clone()` is cheap and
//! serves as an immutable snapshot for observers.

use im::Vector;

use super::action::{Action, ActionRecord};
use super::config::{CombatConfig, GroupSpec};
use super::entity::{CardInstanceId, CombatantId, GroupId};
use super::error::CombatError;
use super::group::{Combatant, Group};
use super::phase::{CombatResult, Phase};
use super::rng::GameRng;
use crate::cards::CardInstance;
use crate::piles::PileManager;

/// Complete state of one encounter.
#[derive(Clone, Debug)]
pub struct CombatState {
    /// First group; acts first.
    pub group_a: Group,

    /// Second group.
    pub group_b: Group,

    /// Current phase.
    pub phase: Phase,

    /// Turn number (starts at 1).
    pub turn_number: u32,

    /// Combatant whose turn it is, `None` before setup and after the end.
    pub actor: Option<CombatantId>,

    /// Action sequence within the current turn.
    pub action_sequence: u32,

    /// Every accepted play and pass.
    pub history: Vector<ActionRecord>,

    /// Deterministic RNG for shuffles.
    pub rng: GameRng,

    next_card_id: u32,
}

impl CombatState {
    /// Build an encounter in `SETUP` from two group rosters.
    ///
    /// Each starting card becomes its own `CardInstance` in its owner's
    /// `DRAW` pile, in deck order. Setup shuffles them.
    ///
    /// Fails with `RosterTooLarge` if a group has more members than a
    /// `CombatantId` slot can address.
    pub fn new(
        config: &CombatConfig,
        group_a: GroupSpec,
        group_b: GroupSpec,
    ) -> Result<Self, CombatError> {
        let mut state = Self {
            group_a: Group::new(GroupId::A, group_a.control),
            group_b: Group::new(GroupId::B, group_b.control),
            phase: Phase::Setup,
            turn_number: 1,
            actor: None,
            action_sequence: 0,
            history: Vector::new(),
            rng: GameRng::new(config.seed).for_context("shuffle"),
            next_card_id: 0,
        };

        for (group, spec) in [(GroupId::A, group_a), (GroupId::B, group_b)] {
            let size = spec.members.len();
            for (slot, member) in spec.members.into_iter().enumerate() {
                let slot =
                    u16::try_from(slot).map_err(|_| CombatError::RosterTooLarge { group, size })?;
                let id = CombatantId::new(group, slot);
                let deck: Vec<_> = member
                    .deck
                    .into_iter()
                    .map(|card| CardInstance::new(state.alloc_card_id(), card))
                    .collect();

                let health = member.health.unwrap_or(config.starting_health);
                let mut combatant = Combatant::new(id, member.name, health, PileManager::from_deck(deck));
                combatant.max_health = member.max_health.unwrap_or(health);
                combatant.hand_size = member.hand_size.unwrap_or(config.hand_size);
                combatant.energy_per_turn = member.energy_per_turn.unwrap_or(config.energy_per_turn);

                state.group_mut(group).members.push(combatant);
            }
        }

        Ok(state)
    }

    // === Entity Management ===

    /// Allocate a new card instance ID.
    pub fn alloc_card_id(&mut self) -> CardInstanceId {
        let id = CardInstanceId(self.next_card_id);
        self.next_card_id += 1;
        id
    }

    // === Groups and Combatants ===

    /// Get a group.
    #[must_use]
    pub fn group(&self, id: GroupId) -> &Group {
        match id {
            GroupId::A => &self.group_a,
            GroupId::B => &self.group_b,
        }
    }

    /// Get a mutable group.
    pub fn group_mut(&mut self, id: GroupId) -> &mut Group {
        match id {
            GroupId::A => &mut self.group_a,
            GroupId::B => &mut self.group_b,
        }
    }

    /// Look up a combatant.
    pub fn combatant(&self, id: CombatantId) -> Result<&Combatant, CombatError> {
        self.group(id.group)
            .get(id.slot)
            .ok_or(CombatError::UnknownCombatant(id))
    }

    /// Look up a mutable combatant.
    pub fn combatant_mut(&mut self, id: CombatantId) -> Result<&mut Combatant, CombatError> {
        self.group_mut(id.group)
            .get_mut(id.slot)
            .ok_or(CombatError::UnknownCombatant(id))
    }

    /// Borrow a combatant together with the shuffle RNG.
    pub fn with_combatant_rng<R>(
        &mut self,
        id: CombatantId,
        f: impl FnOnce(&mut Combatant, &mut GameRng) -> R,
    ) -> Result<R, CombatError> {
        let Self {
            group_a,
            group_b,
            rng,
            ..
        } = self;
        let group = match id.group {
            GroupId::A => group_a,
            GroupId::B => group_b,
        };
        let combatant = group.get_mut(id.slot).ok_or(CombatError::UnknownCombatant(id))?;
        Ok(f(combatant, rng))
    }

    /// All combatants in turn order: group A, then group B.
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        self.group_a.members.iter().chain(self.group_b.members.iter())
    }

    // === Turn Order ===

    /// Next living combatant after `after` in round-robin turn order.
    ///
    /// With `after == None`, returns the first living combatant. `after`
    /// itself is chosen again only if nobody else is alive.
    #[must_use]
    pub fn next_actor(&self, after: Option<CombatantId>) -> Option<CombatantId> {
        let order: Vec<_> = self.combatants().map(|c| (c.id, c.alive)).collect();
        if order.is_empty() {
            return None;
        }

        let start = after
            .and_then(|id| order.iter().position(|(c, _)| *c == id))
            .map_or(0, |i| i + 1);

        (0..order.len())
            .map(|offset| order[(start + offset) % order.len()])
            .find(|(_, alive)| *alive)
            .map(|(id, _)| id)
    }

    // === Terminal Conditions ===

    /// Check whether either group has been wiped out.
    ///
    /// Group A falling takes precedence: if both groups are dead the
    /// encounter is a defeat.
    #[must_use]
    pub fn check_terminal(&self) -> Option<CombatResult> {
        if self.group_a.is_defeated() {
            Some(CombatResult::Defeat)
        } else if self.group_b.is_defeated() {
            Some(CombatResult::Victory)
        } else {
            None
        }
    }

    /// Check if the encounter is over.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    // === Action History ===

    /// Record an action by the current actor.
    pub fn record_action(&mut self, actor: CombatantId, action: Action) {
        let sequence = self.action_sequence;
        self.action_sequence += 1;
        self.history
            .push_back(ActionRecord::new(actor, action, self.turn_number, sequence));
    }

    /// Advance the turn counter.
    pub fn advance_turn(&mut self) {
        self.turn_number += 1;
        self.action_sequence = 0;
    }
}
