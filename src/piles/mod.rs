//! Pile system for card locations.
//!
//! Every combatant owns four ordered piles: `DRAW`, `HAND`, `DISCARD` and
//! `VOID`. A card instance is in exactly one of them at a time. `VOID` is
//! terminal: cards routed there never re-enter circulation.
//!
//! ## Key Types
//!
//! - `PileKind`: Which of the four piles
//! - `PileManager`: One combatant's piles, with draw/move/discard/shuffle
//! - `DrawReport`: What a draw moved and whether it reshuffled

pub mod manager;

pub use manager::{DrawReport, PileKind, PileManager};
