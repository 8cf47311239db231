//! Error types for combat requests.
//!
//! Every failed request leaves the combat untouched: validation happens
//! before mutation, so a caller can correct the precondition and re-issue.
//! `ErrorSeverity` tells the caller whether re-issuing makes sense.

use thiserror::Error;

use super::entity::{CardInstanceId, CombatantId, GroupId};
use super::phase::Phase;
use crate::piles::PileKind;

/// Severity level of an error, used to pick a recovery strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Retry with a different request (another card, a chosen target).
    Recoverable,

    /// The request is not valid right now and should not be re-sent as is.
    Validation,

    /// Caller and engine disagree about state; indicates a bug upstream.
    Internal,

    /// Card data is corrupted. Aborts the play attempt only.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Errors surfaced by the combat engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("{combatant} needs {required} energy but has {available}")]
    InsufficientResources {
        combatant: CombatantId,
        required: u32,
        available: i64,
    },

    #[error("{card} is not in the {pile} pile")]
    InvalidPileOperation { card: CardInstanceId, pile: PileKind },

    #[error("unknown target kind `{0}`")]
    InvalidTargetKind(String),

    #[error("{card} needs a chosen enemy target")]
    MissingTargetSelection { card: CardInstanceId },

    #[error("{target} is not a legal target")]
    InvalidTargetSelection { target: CombatantId },

    #[error("combat has already ended")]
    CombatAlreadyEnded,

    #[error("expected phase {expected:?}, combat is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("{combatant} is not the acting combatant")]
    NotActingCombatant { combatant: CombatantId },

    #[error("no combatant {0}")]
    UnknownCombatant(CombatantId),

    #[error("{combatant} chose {card}, which is not a legal play")]
    IllegalPlay {
        combatant: CombatantId,
        card: CardInstanceId,
    },

    #[error("group {group} has {size} members, more than a group can seat")]
    RosterTooLarge { group: GroupId, size: usize },
}

impl CombatError {
    /// Classify this error for recovery.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientResources { .. }
            | Self::MissingTargetSelection { .. }
            | Self::InvalidTargetSelection { .. }
            | Self::IllegalPlay { .. } => ErrorSeverity::Recoverable,
            Self::InvalidPileOperation { .. } | Self::UnknownCombatant(_) => ErrorSeverity::Internal,
            Self::InvalidTargetKind(_) => ErrorSeverity::Fatal,
            Self::CombatAlreadyEnded
            | Self::WrongPhase { .. }
            | Self::NotActingCombatant { .. }
            | Self::RosterTooLarge { .. } => ErrorSeverity::Validation,
        }
    }
}
