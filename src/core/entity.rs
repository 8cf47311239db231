//! Identifiers for combatants and card instances.
//!
//! ## Layout
//!
//! - `GroupId`: one of the two sides of an encounter (`A` or `B`)
//! - `CombatantId`: a group plus a slot index within that group
//! - `CardInstanceId`: unique per physical card in a combat, allocated
//!   by `CombatState` as cards are created
//!
//! ```
//! use card_combat::core::{CombatantId, GroupId};
//!
//! let hero = CombatantId::new(GroupId::A, 0);
//! assert_eq!(hero.group, GroupId::A);
//! assert_eq!(hero.group.opponent(), GroupId::B);
//! assert_eq!(format!("{}", hero), "A0");
//! ```

use serde::{Deserialize, Serialize};

/// One side of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupId {
    /// The first group. Acts first; losing it means `DEFEAT`.
    A,
    /// The second group. Losing it means `VICTORY`.
    B,
}

impl GroupId {
    /// The opposing group.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            GroupId::A => GroupId::B,
            GroupId::B => GroupId::A,
        }
    }

    /// Both groups in turn order.
    pub fn all() -> impl Iterator<Item = GroupId> {
        [GroupId::A, GroupId::B].into_iter()
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupId::A => write!(f, "A"),
            GroupId::B => write!(f, "B"),
        }
    }
}

/// Identifier for a combatant: its group and slot within the group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId {
    pub group: GroupId,
    pub slot: u16,
}

impl CombatantId {
    /// Create a combatant ID.
    #[must_use]
    pub const fn new(group: GroupId, slot: u16) -> Self {
        Self { group, slot }
    }

    /// Slot as an index into the group's member list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.slot as usize
    }

    /// Check whether `other` is on the opposing side.
    #[must_use]
    pub fn is_enemy_of(self, other: CombatantId) -> bool {
        self.group != other.group
    }
}

impl std::fmt::Display for CombatantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.group, self.slot)
    }
}

/// Unique identifier for a card instance within one combat.
///
/// Two copies of the same template are distinct instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardInstanceId(pub u32);

impl CardInstanceId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card#{}", self.0)
    }
}
