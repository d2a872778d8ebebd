//! Upload Resolver — decides the effective profile image of a submission.
//!
//! An accepted upload is stored under the configured directory and wins over
//! the URL field. Rejected uploads (no name, extension outside the allow-list,
//! over the size cap) are not errors: the URL, or `""`, is used instead.
//!
//! Names are claimed with an exclusive create, so two requests uploading
//! `photo.jpg` at once end up with `photo.jpg` and `photo_1.jpg` rather than
//! one overwriting the other.

pub mod sanitize;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::config::UploadConfig;
use crate::form::UploadedFile;
use crate::upload::sanitize::{extension, sanitize_filename, split_extension};

/// Upper bound on `_N` suffixes tried before giving up on a name.
pub const MAX_RENAME_ATTEMPTS: usize = 10_000;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create upload directory {}: {source}", .path.display())]
    Prepare {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write upload {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no free file name for '{name}' after {attempts} attempts")]
    NamesExhausted { name: String, attempts: usize },
}

/// Why an upload was not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    EmptyName,
    DisallowedExtension(Option<String>),
    TooLarge { size: usize, max: usize },
    UnusableName,
}

/// A file written to the upload directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub file_name: String,
    pub path: PathBuf,
    /// Public path the file is served under.
    pub reference: String,
}

#[derive(Debug, Clone)]
pub struct UploadResolver {
    config: UploadConfig,
}

impl UploadResolver {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Creates the upload directory if needed. Called once at startup.
    pub async fn prepare(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|source| StorageError::Prepare {
                path: self.config.dir.clone(),
                source,
            })
    }

    /// Checks `file` against the allow-list and size cap and returns the
    /// sanitized name it would be stored under.
    pub fn accept(&self, file: &UploadedFile) -> Result<String, Rejection> {
        if file.file_name.trim().is_empty() {
            return Err(Rejection::EmptyName);
        }
        match extension(&file.file_name) {
            Some(ext) if self.config.allows_extension(&ext) => {}
            other => return Err(Rejection::DisallowedExtension(other)),
        }
        if file.bytes.len() > self.config.max_bytes {
            return Err(Rejection::TooLarge {
                size: file.bytes.len(),
                max: self.config.max_bytes,
            });
        }
        sanitize_filename(&file.file_name)
            .filter(|name| extension(name).is_some_and(|ext| self.config.allows_extension(&ext)))
            .ok_or(Rejection::UnusableName)
    }

    /// Effective image reference: stored upload, else trimmed `url_fallback`, else `""`.
    pub async fn resolve_image(
        &self,
        upload: Option<&UploadedFile>,
        url_fallback: &str,
    ) -> Result<String, StorageError> {
        if let Some(file) = upload {
            match self.accept(file) {
                Ok(name) => return Ok(self.store(&name, &file.bytes).await?.reference),
                Err(rejection) => {
                    debug!("Upload '{}' not stored: {rejection:?}", file.file_name);
                }
            }
        }
        Ok(url_fallback.trim().to_string())
    }

    /// Writes `bytes` under `name`, or `stem_1.ext`, `stem_2.ext`, ... when taken.
    pub async fn store(&self, name: &str, bytes: &[u8]) -> Result<StoredUpload, StorageError> {
        let (stem, ext) = split_extension(name);

        for attempt in 0..MAX_RENAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                name.to_string()
            } else {
                format!("{stem}_{attempt}{ext}")
            };
            let path = self.config.dir.join(&candidate);

            let file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(StorageError::Write { path, source }),
            };

            write_or_discard(file, &path, bytes).await?;

            info!("Stored upload as {}", path.display());
            return Ok(StoredUpload {
                reference: format!("{}/{}", self.config.public_prefix, candidate),
                file_name: candidate,
                path,
            });
        }

        Err(StorageError::NamesExhausted {
            name: name.to_string(),
            attempts: MAX_RENAME_ATTEMPTS,
        })
    }
}

/// Writes `bytes` through `writer`; on failure the file at `path` is removed
/// so no reference to a half-written upload is ever handed out.
async fn write_or_discard<W>(mut writer: W, path: &Path, bytes: &[u8]) -> Result<(), StorageError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await?;
        writer.shutdown().await
    }
    .await;

    if let Err(source) = written {
        drop(writer);
        discard_partial(path).await;
        return Err(StorageError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

async fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!("Could not remove partial upload {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::sync::Arc;
    use std::task::{Context, Poll};

    use super::*;
    use crate::form::test_support::upload;

    fn resolver(dir: &Path) -> UploadResolver {
        UploadResolver::new(UploadConfig::new(dir, "/static/uploads"))
    }

    /// A writer that accepts a few bytes, then fails like a full disk.
    struct FailingDisk {
        accepted: usize,
    }

    impl AsyncWrite for FailingDisk {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            if self.accepted >= 4 {
                return Poll::Ready(Err(std::io::Error::new(ErrorKind::Other, "disk full")));
            }
            let n = buf.len().min(4 - self.accepted);
            self.accepted += n;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_upload_wins_over_url() {
        let dir = tempfile::tempdir().unwrap();
        let file = upload("profile_img_file", "me.png", b"\x89PNG");

        let reference = resolver(dir.path())
            .resolve_image(Some(&file), "https://cdn.example.com/me.png")
            .await
            .unwrap();

        assert_eq!(reference, "/static/uploads/me.png");
        assert_eq!(std::fs::read(dir.path().join("me.png")).unwrap(), b"\x89PNG");
    }

    #[tokio::test]
    async fn test_collision_appends_suffix_and_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"original").unwrap();

        let file = upload("profile_img_file", "photo.jpg", b"new");
        let reference = resolver(dir.path()).resolve_image(Some(&file), "").await.unwrap();

        assert_eq!(reference, "/static/uploads/photo_1.jpg");
        assert_eq!(std::fs::read(dir.path().join("photo.jpg")).unwrap(), b"original");
        assert_eq!(std::fs::read(dir.path().join("photo_1.jpg")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_collision_skips_taken_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["photo.jpg", "photo_1.jpg", "photo_2.jpg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let stored = resolver(dir.path()).store("photo.jpg", b"y").await.unwrap();
        assert_eq!(stored.file_name, "photo_3.jpg");
    }

    #[tokio::test]
    async fn test_disallowed_extension_falls_back_to_url_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let file = upload("profile_img_file", "setup.exe", b"MZ");

        let reference = resolver(dir.path())
            .resolve_image(Some(&file), " https://cdn.example.com/me.png ")
            .await
            .unwrap();

        assert_eq!(reference, "https://cdn.example.com/me.png");
        assert!(files_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_nothing_usable_resolves_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let r = resolver(dir.path());

        assert_eq!(r.resolve_image(None, "   ").await.unwrap(), "");
        let nameless = upload("profile_img_file", "", b"data");
        assert_eq!(r.resolve_image(Some(&nameless), "").await.unwrap(), "");
        assert!(files_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = UploadConfig::new(dir.path(), "/static/uploads");
        config.max_bytes = 3;
        let r = UploadResolver::new(config);

        let file = upload("profile_img_file", "big.png", b"1234");
        assert_eq!(
            r.accept(&file),
            Err(Rejection::TooLarge { size: 4, max: 3 })
        );
        assert_eq!(r.resolve_image(Some(&file), "").await.unwrap(), "");
    }

    #[test]
    fn test_accept_checks_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let r = resolver(dir.path());

        assert_eq!(r.accept(&upload("f", "Me.JPG", b"x")).as_deref(), Ok("Me.JPG"));
        assert_eq!(
            r.accept(&upload("f", "noext", b"x")),
            Err(Rejection::DisallowedExtension(None))
        );
        assert_eq!(
            r.accept(&upload("f", "../.png", b"x")),
            Err(Rejection::UnusableName)
        );
    }

    #[tokio::test]
    async fn test_concurrent_uploads_never_share_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let r = Arc::new(resolver(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let r = Arc::clone(&r);
                tokio::spawn(async move { r.store("photo.jpg", b"x").await.unwrap().file_name })
            })
            .collect();

        let mut names = Vec::new();
        for handle in handles {
            names.push(handle.await.unwrap());
        }
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 8);
        assert_eq!(files_in(dir.path()).len(), 8);
    }

    #[tokio::test]
    async fn test_missing_directory_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let r = resolver(&dir.path().join("does-not-exist"));

        let file = upload("profile_img_file", "me.png", b"x");
        let err = r.resolve_image(Some(&file), "https://fallback").await.unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[tokio::test]
    async fn test_prepare_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("static").join("uploads");
        resolver(&nested).prepare().await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"half").unwrap();

        let err = write_or_discard(FailingDisk { accepted: 0 }, &path, b"0123456789")
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Write { path: ref p, .. } if p == &path));
        assert!(files_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_successful_write_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        let file = fs::File::create(&path).await.unwrap();

        write_or_discard(file, &path, b"jpeg").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");
    }
}
