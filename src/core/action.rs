//! Action history: what each actor did, in order.
//!
//! Every accepted play and every pass is recorded with its turn and a
//! sequence number within that turn, for replay and debugging.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::{CardInstanceId, CombatantId};

/// What an actor did.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Played a card against the resolved targets.
    Play {
        card: CardInstanceId,
        name: String,
        targets: SmallVec<[CombatantId; 4]>,
    },
    /// Ended the action phase voluntarily.
    Pass,
}

impl Action {
    /// Check if this is a pass.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The combatant who acted.
    pub actor: CombatantId,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Sequence number within the turn.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(actor: CombatantId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            actor,
            action,
            turn,
            sequence,
        }
    }
}
