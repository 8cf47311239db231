//! Core engine types: identifiers, combatants, state, actions, RNG,
//! configuration, phases, and errors.
//!
//! This module contains the building blocks every other component operates
//! on. `CombatState` is the aggregate root.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod group;
pub mod phase;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use config::{CombatConfig, CombatantSpec, GroupSpec, PlayRouting, RoutingPolicy};
pub use entity::{CardInstanceId, CombatantId, GroupId};
pub use error::{CombatError, ErrorSeverity};
pub use group::{Combatant, Control, Group, ENERGY, HEALTH};
pub use phase::{CombatResult, Phase};
pub use rng::GameRng;
pub use state::CombatState;
