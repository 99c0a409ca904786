//! Catalog types
//!
//! Query and result structures of a directory listing.

use serde::Serialize;
use std::time::SystemTime;

use crate::catalog::kind::{ItemKind, KindFilter};

/// One entry of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    pub is_dir: bool,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Human-readable size, files only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub is_new: bool,
    #[serde(skip)]
    pub modified: SystemTime,
}

/// What to list and how to filter it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    /// Directory relative to the storage root
    pub path: String,
    /// Case-insensitive substring the name must contain
    pub search: Option<String>,
    pub kind: KindFilter,
}

impl CatalogQuery {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Blank search terms are ignored
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_kind(mut self, kind: KindFilter) -> Self {
        self.kind = kind;
        self
    }
}

/// Why a listing came back empty instead of failing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingDiagnostic {
    PermissionDenied,
    ReadFailed(String),
}

/// Result of a directory listing
///
/// Enumeration problems never fail the listing; they leave `items` empty and
/// are reported through `diagnostic`.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub items: Vec<Item>,
    pub diagnostic: Option<ListingDiagnostic>,
}

impl Listing {
    pub fn degraded(diagnostic: ListingDiagnostic) -> Self {
        Self {
            items: Vec::new(),
            diagnostic: Some(diagnostic),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.diagnostic.is_some()
    }
}
