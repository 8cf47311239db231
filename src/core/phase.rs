//! Combat phases and terminal results.

use serde::{Deserialize, Serialize};

/// Phase of the turn state machine.
///
/// ```text
/// SETUP -> DRAW -> ACTION -> RESOLUTION -> TURN_END -> DRAW ...
///                                       \-> VICTORY | DEFEAT
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    Draw,
    Action,
    Resolution,
    TurnEnd,
    Victory,
    Defeat,
}

impl Phase {
    /// `VICTORY` and `DEFEAT` accept no further mutation.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }

    /// The terminal result this phase represents, if any.
    #[must_use]
    pub const fn result(self) -> Option<CombatResult> {
        match self {
            Phase::Victory => Some(CombatResult::Victory),
            Phase::Defeat => Some(CombatResult::Defeat),
            _ => None,
        }
    }
}

/// Outcome of a finished combat, from group A's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatResult {
    /// Every combatant in group B is dead.
    Victory,
    /// Every combatant in group A is dead.
    Defeat,
}

impl CombatResult {
    /// The terminal phase for this result.
    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            CombatResult::Victory => Phase::Victory,
            CombatResult::Defeat => Phase::Defeat,
        }
    }
}
