//! Item catalog
//!
//! Lists the direct children of a storage directory, classifies and
//! decorates them, and applies search and kind filters.

pub mod kind;
pub mod listing;
pub mod results;

pub use kind::{ItemKind, KindFilter};
pub use listing::{list, list_directory, list_directory_at};
pub use results::{CatalogQuery, Item, Listing, ListingDiagnostic};
