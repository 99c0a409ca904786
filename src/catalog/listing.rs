//! Directory listing
//!
//! Builds the filtered, sorted item list for one directory. Listing is
//! best-effort: enumeration errors are logged and produce an empty result.

use log::{debug, error, info};
use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::catalog::kind::{ItemKind, KindFilter};
use crate::catalog::results::{CatalogQuery, Item, Listing, ListingDiagnostic};
use crate::error::StorageResult;
use crate::storage::PathSandbox;
use crate::utils::format_size;

/// Items modified less than this long ago are flagged as new
pub const NEW_ITEM_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Size label used when a file's metadata cannot be read
pub const UNKNOWN_SIZE: &str = "Unknown";

/// Resolves `query.path` through the sandbox and lists it.
///
/// Only a sandbox violation is an error; everything else degrades to an
/// empty [`Listing`].
pub fn list(sandbox: &PathSandbox, query: &CatalogQuery) -> StorageResult<Listing> {
    let dir = sandbox.resolve(&query.path)?;
    Ok(list_directory(&dir, query.search.as_deref(), query.kind))
}

/// Lists `dir` as of now
pub fn list_directory(dir: &Path, search: Option<&str>, kind: KindFilter) -> Listing {
    list_directory_at(dir, search, kind, SystemTime::now())
}

/// Lists `dir` as if the catalog were built at `now`
pub fn list_directory_at(
    dir: &Path,
    search: Option<&str>,
    kind: KindFilter,
    now: SystemTime,
) -> Listing {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => return degraded(dir, e),
    };

    let needle = search.map(str::to_lowercase);
    let mut items = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => return degraded(dir, e),
        };

        let name = entry.file_name().to_string_lossy().into_owned();

        if let Some(needle) = &needle {
            if !name.to_lowercase().contains(needle.as_str()) {
                continue;
            }
        }

        // Follows symlinks, so a link to a directory lists as a folder
        let metadata = fs::metadata(entry.path()).ok();
        let is_dir = metadata.as_ref().is_some_and(|m| m.is_dir());
        let item_kind = ItemKind::classify(&name, is_dir);

        if !kind.matches(item_kind) {
            continue;
        }

        let modified = metadata
            .as_ref()
            .and_then(|m| m.modified().ok())
            .unwrap_or(UNIX_EPOCH);

        let size = if is_dir {
            None
        } else {
            Some(
                metadata
                    .as_ref()
                    .map(|m| format_size(m.len()))
                    .unwrap_or_else(|| UNKNOWN_SIZE.to_string()),
            )
        };

        items.push(Item {
            name,
            is_dir,
            kind: item_kind,
            size,
            is_new: is_recent(modified, now),
            modified,
        });
    }

    items.sort_by(compare_items);

    debug!("Listed {} - {} items", dir.display(), items.len());

    Listing {
        items,
        diagnostic: None,
    }
}

/// Newest first, then case-insensitive name
fn compare_items(a: &Item, b: &Item) -> Ordering {
    b.modified
        .cmp(&a.modified)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Modification times in the future count as new
fn is_recent(modified: SystemTime, now: SystemTime) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age < NEW_ITEM_WINDOW,
        Err(_) => true,
    }
}

fn degraded(dir: &Path, e: std::io::Error) -> Listing {
    if e.kind() == ErrorKind::PermissionDenied {
        info!("Permission denied listing {}", dir.display());
        Listing::degraded(ListingDiagnostic::PermissionDenied)
    } else {
        error!("Error listing directory {}: {}", dir.display(), e);
        Listing::degraded(ListingDiagnostic::ReadFailed(e.to_string()))
    }
}
