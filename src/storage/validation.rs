//! Path validation
//!
//! Handles sandboxing of user-supplied paths and upload filename sanitization.

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

use crate::error::{StorageError, StorageResult};

/// Resolves user-supplied relative paths against a fixed storage root.
///
/// Resolution is purely lexical: the joined path is normalized the way
/// `abspath` would and must then be the root itself or lie beneath it,
/// compared component by component. Nothing touches the filesystem.
#[derive(Debug, Clone)]
pub struct PathSandbox {
    root: PathBuf,
}

impl PathSandbox {
    /// Creates a sandbox for `root`, which should already be absolute.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: normalize_path(root.as_ref()),
        }
    }

    /// The normalized storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `user_path` under the root, or `AccessDenied` if it escapes.
    pub fn resolve(&self, user_path: &str) -> StorageResult<PathBuf> {
        let candidate = normalize_path(&self.root.join(user_path));

        if candidate.starts_with(&self.root) {
            Ok(candidate)
        } else {
            Err(StorageError::AccessDenied(user_path.to_string()))
        }
    }

    /// Whether `path` is the storage root itself
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.root
    }
}

/// Lexically normalizes a path: drops `.` and folds `..` into its parent.
///
/// `..` at the filesystem root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    normalized
}

/// Reduces an uploaded filename to a safe basename.
///
/// Compatibility characters are decomposed first (NFKD) so accented letters
/// keep their base letter. Path separators and whitespace become underscores,
/// anything outside `[A-Za-z0-9._-]` is dropped, and leading/trailing dots and underscores
/// are trimmed. Returns `None` when nothing usable is left.
pub fn sanitize_filename(filename: &str) -> Option<String> {
    let spaced: String = filename
        .nfkd()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = filtered.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sandbox() -> PathSandbox {
        PathSandbox::new("/data/up")
    }

    #[test]
    fn test_resolve_nested_paths() {
        let sandbox = sandbox();
        assert_eq!(sandbox.resolve("").unwrap(), PathBuf::from("/data/up"));
        assert_eq!(
            sandbox.resolve("photos/2024").unwrap(),
            PathBuf::from("/data/up/photos/2024")
        );
        assert_eq!(
            sandbox.resolve("photos/./a/../b.png").unwrap(),
            PathBuf::from("/data/up/photos/b.png")
        );
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let sandbox = sandbox();
        for path in ["..", "../../etc", "photos/../../etc/passwd", "a/b/../../../x"] {
            assert!(
                matches!(sandbox.resolve(path), Err(StorageError::AccessDenied(_))),
                "'{path}' should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve_rejects_absolute_paths_outside_root() {
        let sandbox = sandbox();
        assert!(matches!(
            sandbox.resolve("/etc/passwd"),
            Err(StorageError::AccessDenied(_))
        ));
        assert!(sandbox.resolve("/data/up/inside").is_ok());
    }

    #[test]
    fn test_resolve_rejects_sibling_sharing_prefix() {
        let sandbox = sandbox();
        assert!(matches!(
            sandbox.resolve("../upload2"),
            Err(StorageError::AccessDenied(_))
        ));
        assert!(matches!(
            sandbox.resolve("../up_backup/file.txt"),
            Err(StorageError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_resolve_dotdot_that_stays_inside() {
        let sandbox = sandbox();
        assert_eq!(
            sandbox.resolve("a/../../up/b").unwrap(),
            PathBuf::from("/data/up/b")
        );
        assert!(sandbox.is_root(&sandbox.resolve("a/..").unwrap()));
    }

    #[test]
    fn test_normalize_never_climbs_above_filesystem_root() {
        assert_eq!(normalize_path(Path::new("/../../x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("photo.png").as_deref(), Some("photo.png"));
        assert_eq!(
            sanitize_filename("My cool movie.mov").as_deref(),
            Some("My_cool_movie.mov")
        );
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("etc_passwd")
        );
        assert_eq!(
            sanitize_filename("C:\\Users\\me\\report.pdf").as_deref(),
            Some("C_Users_me_report.pdf")
        );
        assert_eq!(sanitize_filename(".bashrc").as_deref(), Some("bashrc"));
        assert_eq!(
            sanitize_filename("naïve-file.txt").as_deref(),
            Some("naive-file.txt")
        );
        assert_eq!(sanitize_filename("café.png").as_deref(), Some("cafe.png"));
        assert_eq!(sanitize_filename("ｆｉｌｅ.txt").as_deref(), Some("file.txt"));
    }

    #[test]
    fn test_sanitize_filename_rejects_empty_results() {
        for name in ["", "   ", "..", "../..", "___", "日本語"] {
            assert!(sanitize_filename(name).is_none(), "'{name}' should be rejected");
        }
    }
}
