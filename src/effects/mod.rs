//! Targeting and effect application.
//!
//! - `TargetResolver`: expands a `TargetKind` into concrete combatants
//! - `EffectEngine`: pays for a card, applies its mods, and routes it
//! - `StatusStack`: duration-limited stat modifier
//! - `EffectOutcome`: what a single play did, for observers

mod effect;
mod resolver;
mod targeting;

pub use effect::{AppliedMod, EffectOutcome, LifeChange, StatusStack};
pub use resolver::EffectEngine;
pub use targeting::{TargetList, TargetResolver};
