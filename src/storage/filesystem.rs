// src/storage/filesystem.rs
// DOCUMENTATION: Local filesystem storage backend
// PURPOSE: Write uploads below a root directory without overwriting existing files

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::{Storage, Visibility};
use crate::config::MediaSettings;
use crate::errors::BoroughsError;
use crate::models::encode_path;

/// How many alternative names to try before giving up on a save
const MAX_NAME_ATTEMPTS: usize = 100;

/// Length of the random suffix added to colliding names
const SUFFIX_LEN: usize = 7;

pub struct FileSystemStorage {
    root: PathBuf,
    /// URL prefix (with trailing slash) for public backends
    base_url: Option<String>,
    visibility: Visibility,
}

impl FileSystemStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: Option<String>, visibility: Visibility) -> Self {
        Self {
            root: root.into(),
            base_url,
            visibility,
        }
    }

    /// Files served under MEDIA_URL from MEDIA_ROOT
    pub fn public(media: &MediaSettings) -> Self {
        Self::new(
            media.media_root.clone(),
            Some(media.media_url.clone()),
            Visibility::Public,
        )
    }

    /// Files kept under PRIVATE_MEDIA_ROOT, never served
    pub fn private(media: &MediaSettings) -> Self {
        Self::new(media.private_media_root.clone(), None, Visibility::Private)
    }

    /// Map a stored name onto the filesystem, refusing anything that escapes the root
    fn resolve(&self, name: &str) -> Result<PathBuf, BoroughsError> {
        let mut path = self.root.clone();
        let mut depth = 0;
        for comp in Path::new(name).components() {
            match comp {
                Component::Normal(segment) => {
                    path.push(segment);
                    depth += 1;
                }
                Component::CurDir => {}
                _ => {
                    return Err(BoroughsError::InvalidInput(format!(
                        "Invalid storage path '{}'",
                        name
                    )))
                }
            }
        }
        if depth == 0 {
            return Err(BoroughsError::InvalidInput("Empty storage path".into()));
        }
        Ok(path)
    }
}

/// Make a filename safe to store: spaces become underscores and everything
/// except letters, digits, `-`, `_` and `.` is dropped
pub fn valid_filename(name: &str) -> Result<String, BoroughsError> {
    let cleaned: String = name
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        return Err(BoroughsError::InvalidInput(format!(
            "Could not derive a file name from '{}'",
            name
        )));
    }
    Ok(cleaned)
}

/// Name to try after `filename` collided: `stem_abc1234.ext`
fn alternative_name(filename: &str) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect();

    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", filename, suffix),
    }
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> BoroughsError {
    log::error!("Failed to {} {}: {}", action, path.display(), err);
    BoroughsError::StorageError(format!("Failed to {} file: {}", action, err))
}

#[async_trait]
impl Storage for FileSystemStorage {
    fn visibility(&self) -> Visibility {
        self.visibility
    }

    async fn save(&self, dir: &str, filename: &str, data: &[u8]) -> Result<String, BoroughsError> {
        let dir = dir
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(valid_filename)
            .collect::<Result<Vec<_>, _>>()?
            .join("/");
        let mut candidate = valid_filename(filename)?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = if dir.is_empty() {
                candidate.clone()
            } else {
                format!("{}/{}", dir, candidate)
            };
            let path = self.resolve(&name)?;

            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| io_error("create directory for", &path, e))?;
            }

            // create_new makes the existence check and the create one step
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(data)
                        .await
                        .map_err(|e| io_error("write", &path, e))?;
                    file.flush().await.map_err(|e| io_error("flush", &path, e))?;
                    log::debug!(
                        "Stored {} bytes as {} ({:?} storage)",
                        data.len(),
                        name,
                        self.visibility
                    );
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    candidate = alternative_name(&valid_filename(filename)?);
                }
                Err(e) => return Err(io_error("create", &path, e)),
            }
        }

        Err(BoroughsError::StorageError(format!(
            "No free name found for '{}'",
            filename
        )))
    }

    async fn exists(&self, name: &str) -> Result<bool, BoroughsError> {
        let path = self.resolve(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error("inspect", &path, e)),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), BoroughsError> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::debug!("Deleted {} ({:?} storage)", name, self.visibility);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("delete", &path, e)),
        }
    }

    fn url(&self, name: &str) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|base| format!("{}{}", base, encode_path(name.trim_start_matches('/'))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_storage(root: &Path) -> FileSystemStorage {
        FileSystemStorage::new(root, Some("/media/".to_string()), Visibility::Public)
    }

    #[test]
    fn test_valid_filename() {
        assert_eq!(valid_filename(" bay view.png ").unwrap(), "bay_view.png");
        assert_eq!(valid_filename("a<b>c?.jpg").unwrap(), "abc.jpg");
        assert_eq!(valid_filename("köln.png").unwrap(), "köln.png");
        assert!(valid_filename("..").is_err());
        assert!(valid_filename("///").is_err());
    }

    #[test]
    fn test_alternative_name_keeps_extension() {
        let alt = alternative_name("sunset.png");
        assert!(alt.starts_with("sunset_"));
        assert!(alt.ends_with(".png"));
        assert_eq!(alt.len(), "sunset_.png".len() + SUFFIX_LEN);
    }

    #[test]
    fn test_resolve_prevents_traversal() {
        let storage = public_storage(Path::new("/srv/media"));
        assert!(storage.resolve("../etc/passwd").is_err());
        assert!(storage.resolve("/etc/passwd").is_err());
        assert!(storage.resolve("").is_err());
        assert_eq!(
            storage.resolve("photos/a.png").unwrap(),
            PathBuf::from("/srv/media/photos/a.png")
        );
    }

    #[tokio::test]
    async fn test_save_and_exists() {
        let dir = tempfile::tempdir().unwrap();
        let storage = public_storage(dir.path());

        let name = storage.save("photos", "bay view.png", b"data").await.unwrap();
        assert_eq!(name, "photos/bay_view.png");
        assert!(storage.exists(&name).await.unwrap());

        let on_disk = std::fs::read(dir.path().join("photos").join("bay_view.png")).unwrap();
        assert_eq!(on_disk, b"data");
    }

    #[tokio::test]
    async fn test_save_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = public_storage(dir.path());

        let first = storage.save("photos", "a.png", b"first").await.unwrap();
        let second = storage.save("photos", "a.png", b"second").await.unwrap();

        assert_ne!(first, second);
        assert!(second.starts_with("photos/a_"));
        assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"first");
        assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_nested_dir_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let storage = public_storage(dir.path());

        let name = storage
            .save("main_images/outer sunset", "x.png", b"x")
            .await
            .unwrap();
        assert_eq!(name, "main_images/outer_sunset/x.png");
        assert!(storage.save("main_images/..", "x.png", b"x").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = public_storage(dir.path());

        let name = storage.save("", "a.png", b"x").await.unwrap();
        assert_eq!(name, "a.png");
        storage.delete(&name).await.unwrap();
        assert!(!storage.exists(&name).await.unwrap());
        storage.delete(&name).await.unwrap();
    }

    #[tokio::test]
    async fn test_private_storage_has_no_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSystemStorage::new(dir.path(), None, Visibility::Private);

        let name = storage.save("ids", "scan.png", b"x").await.unwrap();
        assert!(storage.exists(&name).await.unwrap());
        assert!(storage.url(&name).is_none());
    }

    #[test]
    fn test_public_url_is_encoded() {
        let storage = public_storage(Path::new("/srv/media"));
        assert_eq!(
            storage.url("photos/köln.png").as_deref(),
            Some("/media/photos/k%C3%B6ln.png")
        );
    }
}
