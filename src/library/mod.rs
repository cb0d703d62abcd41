//! Resource library: tips, tutorials and technique videos.
//!
//! The catalog answers one question for the library screen: which resources
//! match the selected category tab and the current search text.
//!
//! ```text
//! ResourceCatalog ──filter(category, query)──▶ Matches (lazy, in catalog order)
//!        ▲
//!        └── seed set | catalog.json | DataStore::fetch_resources
//! ```

pub mod catalog;
pub mod resource;

pub use catalog::{CategorySelector, CategoryTab, LibraryQuery, Matches, ResourceCatalog};
pub use resource::{Category, Resource, ResourceError, ResourceId, ResourceKind, ResourceLength};
