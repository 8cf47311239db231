//! # card-combat
//!
//! A deterministic, turn-based combat engine for card battles between two
//! groups of combatants.
//!
//! ## Design Principles
//!
//! 1. **Single Owner**: `TurnScheduler` owns the `CombatState`; every
//!    mutation goes through one of its calls, one at a time.
//!
//! 2. **Atomic Plays**: A card play either applies completely or fails
//!    without touching state.
//!
//! 3. **Deterministic**: One seed drives every shuffle. Same seed and same
//!    requests give the same combat.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Piles and history use `im` vectors, so
//!   cloning `CombatState` is a cheap snapshot for presentation layers.
//!
//! - **Data-Driven Cards**: Cards are plain data loaded through
//!   `CardCatalog`; the engine interprets only their target kind, cost,
//!   mods and routing flags.
//!
//! ## Modules
//!
//! - `core`: IDs, combatants, state, actions, RNG, configuration, errors
//! - `cards`: Card templates, instances, and the catalog
//! - `piles`: Per-combatant draw/hand/discard/void piles
//! - `effects`: Target resolution and effect application
//! - `rules`: Turn scheduler, actor policies, and change events

pub mod cards;
pub mod core;
pub mod effects;
pub mod piles;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, CardInstanceId, CombatConfig, CombatError, CombatResult, CombatState,
    Combatant, CombatantId, CombatantSpec, Control, ErrorSeverity, GameRng, Group, GroupId,
    GroupSpec, Phase, PlayRouting, RoutingPolicy,
};

pub use crate::cards::{Card, CardCatalog, CardInstance, CardType, CatalogError, StatMod, TargetKind};

pub use crate::piles::{PileKind, PileManager};

pub use crate::effects::{EffectEngine, EffectOutcome, StatusStack, TargetResolver};

pub use crate::rules::{
    ActorPolicy, CombatEvent, CombatObserver, Decision, FirstPlayable, LegalPlay, PlayRequest,
    RandomPolicy, TurnScheduler,
};
