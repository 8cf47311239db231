//! Turn scheduling and actor control.
//!
//! `TurnScheduler` is the top-level state machine. It owns the
//! `CombatState`, consults an `ActorPolicy` for AI-controlled groups, and
//! reports every change to subscribed `CombatObserver`s.

pub mod events;
pub mod policy;
pub mod scheduler;

pub use events::{CombatEvent, CombatObserver};
pub use policy::{ActorPolicy, Decision, FirstPlayable, LegalPlay, PlayRequest, RandomPolicy};
pub use scheduler::TurnScheduler;
