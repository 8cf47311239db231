//! Combatants and the groups they fight in.
//!
//! ## Combatant
//!
//! A combatant owns its stats, its status stacks, and its four piles. It
//! belongs to exactly one `Group`; "enemies" always means the other group.
//!
//! ## Group
//!
//! An ordered list of combatants. Order matters: it drives turn order and
//! `FRONT_ENEMY` targeting.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::entity::{CombatantId, GroupId};
use crate::cards::StatId;
use crate::effects::StatusStack;
use crate::piles::{PileKind, PileManager};

/// Stat key addressing `Combatant::health`.
pub const HEALTH: &str = "health";

/// Stat key addressing `Combatant::energy`.
pub const ENERGY: &str = "energy";

/// Who supplies a group's play requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    /// Requests arrive through `TurnScheduler::play_card` / `pass`.
    Player,
    /// The scheduler asks the group's `ActorPolicy`.
    Ai,
}

/// One participant in the encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub alive: bool,
    pub health: i64,
    pub max_health: i64,
    pub energy: i64,

    /// Energy restored at the start of each of this combatant's turns.
    pub energy_per_turn: u32,

    /// Cards drawn up to at the start of each turn.
    pub hand_size: usize,

    /// Other stats, keyed by stat ID.
    pub stats: FxHashMap<StatId, i64>,

    /// Duration-limited modifiers, keyed by stat ID.
    pub status: FxHashMap<StatId, StatusStack>,

    piles: PileManager,
}

impl Combatant {
    /// Create a combatant with full health and the given piles.
    #[must_use]
    pub fn new(id: CombatantId, name: impl Into<String>, health: i64, piles: PileManager) -> Self {
        Self {
            id,
            name: name.into(),
            alive: health > 0,
            health,
            max_health: health,
            energy: 0,
            energy_per_turn: 0,
            hand_size: 0,
            stats: FxHashMap::default(),
            status: FxHashMap::default(),
            piles,
        }
    }

    /// Read-only view of this combatant's piles.
    #[must_use]
    pub fn piles(&self) -> &PileManager {
        &self.piles
    }

    /// Mutable access to this combatant's piles.
    pub fn piles_mut(&mut self) -> &mut PileManager {
        &mut self.piles
    }

    /// Base value of a stat, without status stacks.
    #[must_use]
    pub fn stat(&self, stat: &str) -> i64 {
        match stat {
            HEALTH => self.health,
            ENERGY => self.energy,
            _ => self.stats.get(stat).copied().unwrap_or(0),
        }
    }

    /// Stat value including any status stack on it.
    #[must_use]
    pub fn effective_stat(&self, stat: &str) -> i64 {
        self.stat(stat)
            .saturating_add(self.status.get(stat).map_or(0, |s| s.magnitude))
    }

    /// Apply a permanent change to a stat.
    ///
    /// Health gains stop at `max_health`; losses are uncapped.
    pub fn modify_stat(&mut self, stat: &str, delta: i64) {
        match stat {
            HEALTH => {
                let raised = self.health.saturating_add(delta);
                self.health = if delta > 0 {
                    raised.min(self.max_health.max(self.health))
                } else {
                    raised
                };
            }
            ENERGY => self.energy = self.energy.saturating_add(delta),
            _ => {
                let value = self.stats.entry(stat.to_string()).or_insert(0);
                *value = value.saturating_add(delta);
            }
        }
    }

    /// Recompute `alive` from health. Returns true if it changed.
    pub fn refresh_alive(&mut self) -> bool {
        let alive = self.health > 0;
        let changed = alive != self.alive;
        self.alive = alive;
        changed
    }

    /// Check whether any card in hand is affordable.
    #[must_use]
    pub fn has_playable(&self) -> bool {
        self.piles
            .pile(PileKind::Hand)
            .iter()
            .any(|c| i64::from(c.cost()) <= self.energy)
    }
}

/// An ordered side of the encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub control: Control,
    pub members: Vec<Combatant>,
}

impl Group {
    /// Create an empty group.
    #[must_use]
    pub fn new(id: GroupId, control: Control) -> Self {
        Self {
            id,
            control,
            members: Vec::new(),
        }
    }

    /// Living members, in group order.
    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.members.iter().filter(|c| c.alive)
    }

    /// True when no member is alive.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.living().next().is_none()
    }

    /// Get a member by slot.
    #[must_use]
    pub fn get(&self, slot: u16) -> Option<&Combatant> {
        self.members.get(slot as usize)
    }

    /// Get a mutable member by slot.
    pub fn get_mut(&mut self, slot: u16) -> Option<&mut Combatant> {
        self.members.get_mut(slot as usize)
    }
}
