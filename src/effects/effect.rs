//! Status stacks and play outcomes.
//!
//! A `StatusStack` is a duration-limited modifier sitting on one stat of a
//! combatant. An `EffectOutcome` reports everything a single card play did,
//! for observers that animate or log it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::StatId;
use crate::core::{CardInstanceId, CombatantId, PlayRouting};

/// A duration-limited modifier on one stat.
///
/// Stacking is additive in magnitude; the remaining duration becomes the
/// longer of the two.
///
/// ```
/// use card_combat::effects::StatusStack;
///
/// let mut stack = StatusStack::new(2, 2);
/// stack.stack(1, 1);
/// assert_eq!(stack, StatusStack::new(3, 2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusStack {
    pub magnitude: i64,
    pub remaining: u32,
}

impl StatusStack {
    /// Create a stack.
    #[must_use]
    pub const fn new(magnitude: i64, remaining: u32) -> Self {
        Self {
            magnitude,
            remaining,
        }
    }

    /// Fold another application of the same stat into this stack.
    pub fn stack(&mut self, magnitude: i64, duration: u32) {
        self.magnitude = self.magnitude.saturating_add(magnitude);
        self.remaining = self.remaining.max(duration);
    }

    /// Count down one turn. Returns true once the stack has expired.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

/// One modifier as it landed on one target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMod {
    pub target: CombatantId,
    pub stat: StatId,
    pub magnitude: i64,
    /// Zero for immediate changes.
    pub duration: u32,
}

/// A combatant whose `alive` flag flipped during a play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LifeChange {
    pub combatant: CombatantId,
    pub alive: bool,
}

/// Everything one card play did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectOutcome {
    pub actor: CombatantId,
    pub card: CardInstanceId,
    pub card_name: String,
    pub energy_spent: u32,

    /// Targets in resolution order.
    pub targets: SmallVec<[CombatantId; 4]>,

    /// Modifiers in application order.
    pub applied: Vec<AppliedMod>,

    pub life_changes: Vec<LifeChange>,

    /// Where the played card went.
    pub routing: PlayRouting,

    /// The copy created by a bloat play.
    pub duplicate: Option<CardInstanceId>,
}

impl EffectOutcome {
    /// Combatants killed by this play.
    pub fn deaths(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.life_changes
            .iter()
            .filter(|change| !change.alive)
            .map(|change| change.combatant)
    }
}
