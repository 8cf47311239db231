//! Change notifications for presentation layers.
//!
//! The scheduler emits a `CombatEvent` after every state change it makes.
//! Observers receive events in order and read the current state through
//! `TurnScheduler::state`; they never mutate it.

use serde::{Deserialize, Serialize};

use crate::cards::StatId;
use crate::core::{CardInstanceId, CombatResult, CombatantId, Phase};
use crate::effects::EffectOutcome;

/// Something that happened during combat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    TurnStarted {
        turn: u32,
        actor: CombatantId,
    },
    CardsDrawn {
        combatant: CombatantId,
        cards: Vec<CardInstanceId>,
    },
    /// `DISCARD` was shuffled back into `DRAW`.
    Reshuffled {
        combatant: CombatantId,
    },
    CardPlayed(EffectOutcome),
    Passed {
        combatant: CombatantId,
    },
    HandDiscarded {
        combatant: CombatantId,
        count: usize,
    },
    StatusExpired {
        combatant: CombatantId,
        stat: StatId,
    },
    CombatEnded {
        result: CombatResult,
    },
    /// A full round of turns passed with no play and no player input.
    /// Advancing stopped in `DRAW`; `resume` runs another round.
    Stalled {
        turns: usize,
    },
    /// Advancing stopped on an error, usually a rejected AI request.
    /// The actor stays in `ACTION` until `resume`.
    Halted {
        actor: Option<CombatantId>,
        reason: String,
    },
}

/// Receives combat events.
///
/// Any `FnMut(&CombatEvent)` closure is an observer.
pub trait CombatObserver {
    fn notify(&mut self, event: &CombatEvent);
}

impl<F> CombatObserver for F
where
    F: FnMut(&CombatEvent),
{
    fn notify(&mut self, event: &CombatEvent) {
        self(event);
    }
}
