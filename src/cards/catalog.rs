//! Card catalog: the read-only set of card templates for an encounter.
//!
//! Card data comes from an external tabular source as JSON rows. Loading is
//! lenient so that combat never sees a half-formed card:
//!
//! - missing or malformed `cost` becomes 0
//! - missing or non-string `target` becomes `SELF`
//! - a `target` string naming no known kind is kept as `TargetKind::Invalid`
//! - a mod without `magnitude` takes the card's `value`
//!
//! ```
//! use card_combat::cards::{CardCatalog, TargetKind};
//!
//! let catalog = CardCatalog::from_json(r#"[
//!     {"name": "Strike", "type": "func", "target": "TARGET_ENEMY", "cost": 1,
//!      "value": 6, "mods": [{"stat": "health", "magnitude": -6}]},
//!     {"name": "Focus", "cost": "two"}
//! ]"#).unwrap();
//!
//! assert_eq!(catalog.get("Strike").unwrap().target, TargetKind::TargetEnemy);
//! assert_eq!(catalog.get("Focus").unwrap().cost, 0);
//! assert_eq!(catalog.get("Focus").unwrap().target, TargetKind::SelfOnly);
//! ```

use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::definition::{Card, CardType, StatMod, StatId, TargetKind};

/// Errors from loading or querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed card data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("card `{0}` is defined twice")]
    DuplicateCard(String),

    #[error("no card named `{0}`")]
    UnknownCard(String),
}

/// Raw modifier as it appears in card data.
#[derive(Deserialize)]
struct ModRow {
    stat: StatId,
    #[serde(default)]
    magnitude: Option<i64>,
    #[serde(default)]
    duration: Option<u32>,
}

/// Raw card row as supplied by the card source.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRow {
    name: String,
    #[serde(rename = "type", default)]
    card_type: Option<Value>,
    #[serde(default)]
    target: Option<Value>,
    #[serde(default)]
    cost: Option<Value>,
    #[serde(default)]
    mods: Option<Vec<ModRow>>,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    is_token: Option<bool>,
    #[serde(default)]
    is_bloat: Option<bool>,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        let card_type = row
            .card_type
            .and_then(|v| serde_json::from_value::<CardType>(v).ok())
            .unwrap_or(CardType::Other);

        let target = match row.target {
            Some(Value::String(tag)) => TargetKind::parse(&tag),
            _ => TargetKind::SelfOnly,
        };

        let cost = row
            .cost
            .and_then(|v| v.as_u64())
            .and_then(|c| u32::try_from(c).ok())
            .unwrap_or(0);

        let value = row.value.and_then(|v| v.as_i64()).unwrap_or(0);

        let mods = row
            .mods
            .unwrap_or_default()
            .into_iter()
            .map(|m| StatMod {
                stat: m.stat,
                magnitude: m.magnitude.unwrap_or(value),
                duration: m.duration.unwrap_or(0),
            })
            .collect();

        Card {
            name: row.name,
            card_type,
            target,
            cost,
            mods,
            value,
            is_token: row.is_token.unwrap_or(false),
            is_bloat: row.is_bloat.unwrap_or(false),
        }
    }
}

/// Registry of card templates, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<String, Card>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON array of card rows.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for card in cards {
            catalog.register(card)?;
        }
        tracing::debug!(cards = catalog.len(), "loaded card catalog");
        Ok(catalog)
    }

    /// Register a card template.
    pub fn register(&mut self, card: Card) -> Result<(), CatalogError> {
        if self.cards.contains_key(&card.name) {
            return Err(CatalogError::DuplicateCard(card.name));
        }
        self.cards.insert(card.name.clone(), card);
        Ok(())
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Card> {
        self.cards.get(name)
    }

    /// Copy a template out of the catalog.
    pub fn instantiate(&self, name: &str) -> Result<Card, CatalogError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownCard(name.to_string()))
    }

    /// Build a starting deck from template names, in order.
    pub fn build_deck<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Card>, CatalogError> {
        names.iter().map(|n| self.instantiate(n.as_ref())).collect()
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all templates.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }
}
