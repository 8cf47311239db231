//! Combat configuration types.
//!
//! Encounters configure the engine at construction by providing:
//! - `CombatConfig`: Seed, turn replenish defaults, played-card routing
//! - `CombatantSpec`: One combatant's starting stats and deck
//! - `GroupSpec`: A group's members and who controls them
//!
//! Per-combatant values left unset in a `CombatantSpec` fall back to the
//! `CombatConfig` defaults.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::group::Control;
use crate::cards::{Card, CardType};

/// Where a played card goes after its effects resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayRouting {
    /// Back into circulation via `DISCARD`.
    Discard,
    /// Removed from circulation via `VOID`.
    Void,
    /// Original to `DISCARD` plus a fresh copy to `DISCARD`.
    Duplicate,
}

/// Played-card routing rules.
///
/// Card types with an explicit entry use it. Everything else follows the
/// card's flags: `is_token` sends it to `VOID` (and wins over `is_bloat`),
/// `is_bloat` duplicates it, and plain cards are discarded.
///
/// ```
/// use card_combat::cards::{Card, CardType, TargetKind};
/// use card_combat::core::{PlayRouting, RoutingPolicy};
///
/// let policy = RoutingPolicy::default().with_rule(CardType::Curse, PlayRouting::Void);
///
/// let curse = Card::new("Doubt", CardType::Curse, TargetKind::SelfOnly).bloat();
/// assert_eq!(policy.route(&curse), PlayRouting::Void);
///
/// let both = Card::new("Echo", CardType::Func, TargetKind::SelfOnly).token().bloat();
/// assert_eq!(policy.route(&both), PlayRouting::Void);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingPolicy {
    by_type: FxHashMap<CardType, PlayRouting>,
}

impl RoutingPolicy {
    /// Route every card of `card_type` the same way (builder pattern).
    #[must_use]
    pub fn with_rule(mut self, card_type: CardType, routing: PlayRouting) -> Self {
        self.by_type.insert(card_type, routing);
        self
    }

    /// Decide where a played card goes.
    #[must_use]
    pub fn route(&self, card: &Card) -> PlayRouting {
        if let Some(&routing) = self.by_type.get(&card.card_type) {
            return routing;
        }
        if card.is_token {
            PlayRouting::Void
        } else if card.is_bloat {
            PlayRouting::Duplicate
        } else {
            PlayRouting::Discard
        }
    }
}

/// Encounter-wide configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatConfig {
    /// Seed for every shuffle in the encounter.
    pub seed: u64,

    /// Default hand-replenish count.
    pub hand_size: usize,

    /// Default energy restored at the start of each turn.
    pub energy_per_turn: u32,

    /// Default starting (and maximum) health.
    pub starting_health: i64,

    /// Played-card routing.
    pub routing: RoutingPolicy,
}

impl CombatConfig {
    pub const DEFAULT_HAND_SIZE: usize = 5;
    pub const DEFAULT_ENERGY_PER_TURN: u32 = 3;
    pub const DEFAULT_STARTING_HEALTH: i64 = 20;

    /// Create a configuration with default values and the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            hand_size: Self::DEFAULT_HAND_SIZE,
            energy_per_turn: Self::DEFAULT_ENERGY_PER_TURN,
            starting_health: Self::DEFAULT_STARTING_HEALTH,
            routing: RoutingPolicy::default(),
        }
    }

    /// Set the default hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set the default energy per turn.
    #[must_use]
    pub fn with_energy_per_turn(mut self, energy: u32) -> Self {
        self.energy_per_turn = energy;
        self
    }

    /// Set the default starting health.
    #[must_use]
    pub fn with_starting_health(mut self, health: i64) -> Self {
        self.starting_health = health;
        self
    }

    /// Set the routing policy.
    #[must_use]
    pub fn with_routing(mut self, routing: RoutingPolicy) -> Self {
        self.routing = routing;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Starting description of one combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatantSpec {
    pub name: String,
    pub health: Option<i64>,
    pub max_health: Option<i64>,
    pub hand_size: Option<usize>,
    pub energy_per_turn: Option<u32>,
    pub deck: Vec<Card>,
}

impl CombatantSpec {
    /// Create a spec using encounter defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: None,
            max_health: None,
            hand_size: None,
            energy_per_turn: None,
            deck: Vec::new(),
        }
    }

    /// Set starting health. Also the maximum unless `with_max_health` is used.
    #[must_use]
    pub fn with_health(mut self, health: i64) -> Self {
        self.health = Some(health);
        self
    }

    /// Set maximum health.
    #[must_use]
    pub fn with_max_health(mut self, max_health: i64) -> Self {
        self.max_health = Some(max_health);
        self
    }

    /// Set the hand-replenish count.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = Some(hand_size);
        self
    }

    /// Set energy restored each turn.
    #[must_use]
    pub fn with_energy_per_turn(mut self, energy: u32) -> Self {
        self.energy_per_turn = Some(energy);
        self
    }

    /// Set the starting deck.
    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = Card>) -> Self {
        self.deck = deck.into_iter().collect();
        self
    }
}

/// Starting description of a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSpec {
    pub control: Control,
    pub members: Vec<CombatantSpec>,
}

impl GroupSpec {
    /// A group driven by player input.
    pub fn player(members: impl IntoIterator<Item = CombatantSpec>) -> Self {
        Self {
            control: Control::Player,
            members: members.into_iter().collect(),
        }
    }

    /// A group driven by an `ActorPolicy`.
    pub fn ai(members: impl IntoIterator<Item = CombatantSpec>) -> Self {
        Self {
            control: Control::Ai,
            members: members.into_iter().collect(),
        }
    }
}
