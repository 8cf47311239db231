//! Card system: templates, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `Card`: Immutable template (name, type, target kind, cost, mods, flags)
//! - `TargetKind`: Targeting rule expanded by the `TargetResolver`
//! - `StatMod`: One numeric modifier a card applies
//! - `CardInstance`: A uniquely identified copy of a template in a pile
//! - `CardCatalog`: Template lookup, loaded from external card data

pub mod catalog;
pub mod definition;
pub mod instance;

pub use catalog::{CardCatalog, CatalogError};
pub use definition::{Card, CardType, StatId, StatMod, TargetKind};
pub use instance::CardInstance;
