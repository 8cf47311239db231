//! Card instances - the physical cards moving between piles.
//!
//! A `CardInstance` pairs a unique `CardInstanceId` with its own copy of
//! the template. Two instances never share mutable identity, so moving one
//! between piles can never affect another.

use serde::{Deserialize, Serialize};

use super::definition::Card;
use crate::core::entity::CardInstanceId;

/// A card in a combatant's piles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique ID for this instance.
    pub id: CardInstanceId,

    /// Owned copy of the template.
    pub card: Card,
}

impl CardInstance {
    /// Create a card instance from a template copy.
    #[must_use]
    pub fn new(id: CardInstanceId, card: Card) -> Self {
        Self { id, card }
    }

    /// Template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.card.name
    }

    /// Energy cost.
    #[must_use]
    pub fn cost(&self) -> u32 {
        self.card.cost
    }

    /// Copy this card under a new ID.
    #[must_use]
    pub fn duplicate(&self, id: CardInstanceId) -> Self {
        Self {
            id,
            card: self.card.clone(),
        }
    }
}
