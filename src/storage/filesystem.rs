//! File system operations
//!
//! Small helpers shared by the storage operations.

use std::io::Result;
use std::path::{Path, PathBuf};

/// Create a directory and any missing parents
pub async fn create_directory(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await
}

/// Splits `name` into stem and extension (dot included) at the last dot.
///
/// A leading dot is part of the stem, so `.profile` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// `photo.png` with counter 2 becomes `photo_2.png`
pub fn suffixed_name(name: &str, counter: u64) -> String {
    let (stem, ext) = split_extension(name);
    format!("{stem}_{counter}{ext}")
}

/// Finds the first free name in `dir`: `name`, then `name_1`, `name_2`, ...
///
/// Not atomic: another writer can claim the returned name before it is used.
pub async fn find_available_path(dir: &Path, name: &str) -> Result<(PathBuf, String)> {
    let mut candidate = name.to_string();
    let mut counter = 0u64;

    loop {
        let path = dir.join(&candidate);
        if !tokio::fs::try_exists(&path).await? {
            return Ok((path, candidate));
        }
        counter += 1;
        candidate = suffixed_name(name, counter);
    }
}

/// Hidden sibling an upload is written to before being renamed into place
pub fn partial_upload_path(final_path: &Path, file_name: &str) -> PathBuf {
    final_path.with_file_name(format!(".{file_name}.part"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("photo.png"), ("photo", ".png"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".profile"), (".profile", ""));
    }

    #[test]
    fn test_suffixed_name() {
        assert_eq!(suffixed_name("photo.png", 1), "photo_1.png");
        assert_eq!(suffixed_name("notes", 3), "notes_3");
        assert_eq!(suffixed_name("archive.tar.gz", 2), "archive.tar_2.gz");
    }

    #[tokio::test]
    async fn test_find_available_path_skips_taken_names() {
        let dir = TempDir::new().unwrap();
        let (_, name) = find_available_path(dir.path(), "photo.png").await.unwrap();
        assert_eq!(name, "photo.png");

        std::fs::write(dir.path().join("photo.png"), b"a").unwrap();
        std::fs::write(dir.path().join("photo_1.png"), b"b").unwrap();

        let (path, name) = find_available_path(dir.path(), "photo.png").await.unwrap();
        assert_eq!(name, "photo_2.png");
        assert_eq!(path, dir.path().join("photo_2.png"));
    }

    #[test]
    fn test_partial_upload_path() {
        let path = partial_upload_path(Path::new("/root/a/photo.png"), "photo.png");
        assert_eq!(path, PathBuf::from("/root/a/.photo.png.part"));
    }
}
