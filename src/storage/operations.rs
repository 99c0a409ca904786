//! Storage operations
//!
//! Handles the filesystem side of uploads, deletions and file retrieval.
//! Every user-supplied path goes through [`PathSandbox::resolve`] before any I/O.

use log::{error, info};
use std::fs;
use std::io;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::error::{StorageError, StorageResult};
use crate::storage::filesystem::{create_directory, find_available_path, partial_upload_path};
use crate::storage::results::{DeleteResult, RetrieveResult, StoreResult};
use crate::storage::validation::{PathSandbox, sanitize_filename};

/// Stores an uploaded byte stream as `original_filename` inside `folder`.
///
/// The name is sanitized and, if taken, suffixed with `_1`, `_2`, ... before
/// the extension. `folder` is created when missing. Data is written to a
/// hidden `.part` sibling and renamed into place once complete.
///
/// The free-name search and the final rename are not atomic with respect to
/// each other, so two concurrent uploads of the same name may pick the same
/// target and the later rename wins.
pub async fn store_upload<R>(
    sandbox: &PathSandbox,
    folder: &str,
    original_filename: &str,
    reader: &mut R,
) -> StorageResult<StoreResult>
where
    R: AsyncRead + Unpin + ?Sized,
{
    if original_filename.is_empty() {
        return Err(StorageError::InvalidInput("No file selected"));
    }

    let filename =
        sanitize_filename(original_filename).ok_or(StorageError::InvalidInput("Invalid filename"))?;

    let target_dir = sandbox.resolve(folder)?;

    create_directory(&target_dir).await.map_err(|e| {
        error!("Failed to create upload folder {}: {}", target_dir.display(), e);
        StorageError::UploadFailed(e)
    })?;

    let (file_path, stored_name) = find_available_path(&target_dir, &filename)
        .await
        .map_err(|e| {
            error!("Failed to probe upload target in {}: {}", target_dir.display(), e);
            StorageError::UploadFailed(e)
        })?;

    let temp_path = partial_upload_path(&file_path, &stored_name);

    let bytes_written = match write_upload(reader, &temp_path, &file_path).await {
        Ok(n) => n,
        Err(e) => {
            error!(
                "Failed to store upload {} -> {}: {}",
                original_filename,
                file_path.display(),
                e
            );
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::UploadFailed(e));
        }
    };

    info!(
        "Stored upload {} as {} ({} bytes)",
        original_filename,
        file_path.display(),
        bytes_written
    );

    Ok(StoreResult {
        file_path,
        stored_name,
        bytes_written,
    })
}

async fn write_upload<R>(reader: &mut R, temp_path: &Path, final_path: &Path) -> io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut temp_file = tokio::fs::File::create(temp_path).await?;
    let written = tokio::io::copy(reader, &mut temp_file).await?;
    temp_file.flush().await?;
    drop(temp_file);

    tokio::fs::rename(temp_path, final_path).await?;
    Ok(written)
}

/// Deletes a file, or a directory and everything beneath it.
///
/// The storage root itself can never be deleted.
pub fn delete_path(sandbox: &PathSandbox, user_path: &str) -> StorageResult<DeleteResult> {
    if user_path.is_empty() {
        return Err(StorageError::InvalidInput("Path required"));
    }

    let path = sandbox.resolve(user_path)?;

    if sandbox.is_root(&path) {
        return Err(StorageError::AccessDenied(user_path.to_string()));
    }

    if !path.exists() {
        return Err(StorageError::NotFound(user_path.to_string()));
    }

    let was_directory = path.is_dir();
    let removed = if was_directory {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    };

    if let Err(e) = removed {
        error!("Failed to delete {} (real: {}): {}", user_path, path.display(), e);
        return Err(StorageError::DeleteFailed(e));
    }

    info!(
        "Deleted {} {} (real: {})",
        if was_directory { "folder" } else { "file" },
        user_path,
        path.display()
    );

    Ok(DeleteResult {
        path,
        was_directory,
    })
}

/// Resolves a stored file for streaming back to the caller.
///
/// Directories are reported as `NotFound`; only regular files are served.
pub fn prepare_file_retrieval(
    sandbox: &PathSandbox,
    user_path: &str,
) -> StorageResult<RetrieveResult> {
    let file_path = sandbox.resolve(user_path)?;

    if !file_path.is_file() {
        return Err(StorageError::NotFound(user_path.to_string()));
    }

    let directory = file_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sandbox.root().to_path_buf());
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(RetrieveResult {
        file_path,
        directory,
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathSandbox) {
        let dir = TempDir::new().unwrap();
        let sandbox = PathSandbox::new(dir.path());
        (dir, sandbox)
    }

    #[tokio::test]
    async fn test_store_upload_writes_file() {
        let (dir, sandbox) = setup();
        let mut data: &[u8] = b"hello";

        let result = store_upload(&sandbox, "docs", "notes.txt", &mut data)
            .await
            .unwrap();

        assert_eq!(result.stored_name, "notes.txt");
        assert_eq!(result.bytes_written, 5);
        assert_eq!(
            std::fs::read(dir.path().join("docs").join("notes.txt")).unwrap(),
            b"hello"
        );
        assert!(!dir.path().join("docs").join(".notes.txt.part").exists());
    }

    #[tokio::test]
    async fn test_store_upload_collision_suffixes() {
        let (dir, sandbox) = setup();

        for (expected, body) in [
            ("photo.png", b"one"),
            ("photo_1.png", b"two"),
            ("photo_2.png", b"thr"),
        ] {
            let mut data: &[u8] = body;
            let result = store_upload(&sandbox, "", "photo.png", &mut data)
                .await
                .unwrap();
            assert_eq!(result.stored_name, expected);
        }

        assert_eq!(std::fs::read(dir.path().join("photo.png")).unwrap(), b"one");
        assert_eq!(std::fs::read(dir.path().join("photo_2.png")).unwrap(), b"thr");
    }

    #[tokio::test]
    async fn test_store_upload_sanitizes_name() {
        let (dir, sandbox) = setup();
        let mut data: &[u8] = b"x";

        let result = store_upload(&sandbox, "", "../../evil name.sh", &mut data)
            .await
            .unwrap();

        assert_eq!(result.stored_name, "evil_name.sh");
        assert!(dir.path().join("evil_name.sh").is_file());
    }

    #[tokio::test]
    async fn test_store_upload_rejects_empty_filename_without_io() {
        let (dir, sandbox) = setup();
        let mut data: &[u8] = b"";

        let err = store_upload(&sandbox, "new-folder", "", &mut data)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::InvalidInput("No file selected")));
        assert!(!dir.path().join("new-folder").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_store_upload_rejects_unsanitizable_name() {
        let (_dir, sandbox) = setup();
        let mut data: &[u8] = b"x";

        let err = store_upload(&sandbox, "", "../..", &mut data)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::InvalidInput("Invalid filename")));
    }

    #[tokio::test]
    async fn test_store_upload_rejects_escaping_folder() {
        let (_dir, sandbox) = setup();
        let mut data: &[u8] = b"x";

        let err = store_upload(&sandbox, "../outside", "a.txt", &mut data)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::AccessDenied(_)));
    }

    #[test]
    fn test_delete_file_and_folder() {
        let (dir, sandbox) = setup();
        let nested = dir.path().join("album").join("2024");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("a.jpg"), b"a").unwrap();
        std::fs::write(dir.path().join("album").join("b.jpg"), b"b").unwrap();
        std::fs::write(dir.path().join("single.txt"), b"s").unwrap();

        let result = delete_path(&sandbox, "single.txt").unwrap();
        assert!(!result.was_directory);
        assert!(!dir.path().join("single.txt").exists());

        let result = delete_path(&sandbox, "album").unwrap();
        assert!(result.was_directory);
        assert!(!dir.path().join("album").exists());
    }

    #[test]
    fn test_delete_errors() {
        let (dir, sandbox) = setup();

        assert!(matches!(
            delete_path(&sandbox, ""),
            Err(StorageError::InvalidInput("Path required"))
        ));
        assert!(matches!(
            delete_path(&sandbox, "missing.txt"),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            delete_path(&sandbox, "../etc"),
            Err(StorageError::AccessDenied(_))
        ));
        assert!(matches!(
            delete_path(&sandbox, "."),
            Err(StorageError::AccessDenied(_))
        ));
        assert!(dir.path().exists());
    }

    #[test]
    fn test_prepare_file_retrieval() {
        let (dir, sandbox) = setup();
        std::fs::create_dir_all(dir.path().join("music")).unwrap();
        std::fs::write(dir.path().join("music").join("song.mp3"), b"la").unwrap();

        let result = prepare_file_retrieval(&sandbox, "music/song.mp3").unwrap();
        assert_eq!(result.file_name, "song.mp3");
        assert_eq!(result.directory, sandbox.root().join("music"));
        assert_eq!(result.file_path, sandbox.root().join("music").join("song.mp3"));

        assert!(matches!(
            prepare_file_retrieval(&sandbox, "music/missing.mp3"),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            prepare_file_retrieval(&sandbox, "music"),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            prepare_file_retrieval(&sandbox, "../../etc/passwd"),
            Err(StorageError::AccessDenied(_))
        ));
    }
}
