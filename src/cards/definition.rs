//! Card templates - immutable card data.
//!
//! `Card` holds the properties of a card as supplied by the card source.
//! Piles never share a template: each `CardInstance` owns its own copy.
//!
//! ## Example
//!
//! ```
//! use card_combat::cards::{Card, CardType, StatMod, TargetKind};
//!
//! let strike = Card::new("Strike", CardType::Func, TargetKind::TargetEnemy)
//!     .with_cost(1)
//!     .with_value(6)
//!     .with_mod(StatMod::immediate("health", -6));
//!
//! assert_eq!(strike.cost, 1);
//! assert!(strike.target.needs_selection());
//! ```

use serde::{Deserialize, Serialize};

/// Stat identifier. `"health"` and `"energy"` address the combatant's core
/// fields; anything else lives in its free-form stat table.
pub type StatId = String;

/// Card type. The engine only reads it to pick a `PlayRouting`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Func,
    Token,
    Attack,
    Defend,
    Curse,
    #[serde(other)]
    Other,
}

/// How a card's play request expands into concrete targets.
///
/// `Invalid` carries a target tag from card data that names no known kind.
/// It survives loading so that playing the card fails with
/// `InvalidTargetKind` instead of guessing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetKind {
    #[default]
    SelfOnly,
    FrontEnemy,
    TargetEnemy,
    AllEnemies,
    AllAllies,
    All,
    Invalid(String),
}

impl TargetKind {
    /// Parse a target tag (`SELF`, `FRONT_ENEMY`, ...). Case-insensitive.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "SELF" => TargetKind::SelfOnly,
            "FRONT_ENEMY" => TargetKind::FrontEnemy,
            "TARGET_ENEMY" => TargetKind::TargetEnemy,
            "ALL_ENEMIES" => TargetKind::AllEnemies,
            "ALL_ALLIES" => TargetKind::AllAllies,
            "ALL" => TargetKind::All,
            _ => TargetKind::Invalid(tag.to_string()),
        }
    }

    /// Canonical tag for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            TargetKind::SelfOnly => "SELF",
            TargetKind::FrontEnemy => "FRONT_ENEMY",
            TargetKind::TargetEnemy => "TARGET_ENEMY",
            TargetKind::AllEnemies => "ALL_ENEMIES",
            TargetKind::AllAllies => "ALL_ALLIES",
            TargetKind::All => "ALL",
            TargetKind::Invalid(tag) => tag,
        }
    }

    /// Only `TARGET_ENEMY` needs an externally chosen target.
    #[must_use]
    pub fn needs_selection(&self) -> bool {
        matches!(self, TargetKind::TargetEnemy)
    }
}

impl From<String> for TargetKind {
    fn from(tag: String) -> Self {
        TargetKind::parse(&tag)
    }
}

impl From<TargetKind> for String {
    fn from(kind: TargetKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One numeric modifier carried by a card.
///
/// `duration == 0` changes the stat immediately and permanently.
/// `duration > 0` becomes a status stack on the target.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatMod {
    pub stat: StatId,
    pub magnitude: i64,
    #[serde(default)]
    pub duration: u32,
}

impl StatMod {
    /// An immediate, permanent change.
    pub fn immediate(stat: impl Into<StatId>, magnitude: i64) -> Self {
        Self {
            stat: stat.into(),
            magnitude,
            duration: 0,
        }
    }

    /// A status stack lasting `duration` turns.
    pub fn status(stat: impl Into<StatId>, magnitude: i64, duration: u32) -> Self {
        Self {
            stat: stat.into(),
            magnitude,
            duration,
        }
    }

    /// Check if this mod becomes a status stack.
    #[must_use]
    pub fn is_status(&self) -> bool {
        self.duration > 0
    }
}

/// Card template.
///
/// Deserializing goes through the lenient card-row loader in
/// `cards::catalog`, so malformed rows get defaults rather than errors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "super::catalog::CardRow")]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: String,

    #[serde(rename = "type")]
    pub card_type: CardType,

    pub target: TargetKind,

    pub cost: u32,

    pub mods: Vec<StatMod>,

    pub value: i64,

    /// Single use: goes to `VOID` after play.
    pub is_token: bool,

    /// Self-multiplying: a copy joins `DISCARD` after play.
    pub is_bloat: bool,
}

impl Card {
    /// Create a free card with no mods.
    #[must_use]
    pub fn new(name: impl Into<String>, card_type: CardType, target: TargetKind) -> Self {
        Self {
            name: name.into(),
            card_type,
            target,
            cost: 0,
            mods: Vec::new(),
            value: 0,
            is_token: false,
            is_bloat: false,
        }
    }

    /// Set the energy cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    /// Set the card value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }

    /// Add a stat modifier (builder pattern).
    #[must_use]
    pub fn with_mod(mut self, stat_mod: StatMod) -> Self {
        self.mods.push(stat_mod);
        self
    }

    /// Mark as a single-use token (builder pattern).
    #[must_use]
    pub fn token(mut self) -> Self {
        self.is_token = true;
        self
    }

    /// Mark as a bloat card (builder pattern).
    #[must_use]
    pub fn bloat(mut self) -> Self {
        self.is_bloat = true;
        self
    }
}
