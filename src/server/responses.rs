//! Response types
//!
//! JSON shapes returned to the front end.

use serde::Serialize;

use crate::catalog::Item;
use crate::pagination::Page;

/// One page of a folder listing, with the filter state echoed back
#[derive(Debug, Clone, Serialize)]
pub struct ListingResponse {
    /// Folder path relative to the storage root, `""` for the root
    pub current: String,
    pub items: Vec<Item>,
    pub pagination: Page,
    pub search_query: String,
    pub file_type_filter: String,
}
