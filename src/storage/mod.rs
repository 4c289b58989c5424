// src/storage/mod.rs
// DOCUMENTATION: Pluggable storage backends for uploaded files
// PURPOSE: Persist file content and hand back a reference (stored name / URL)

pub mod filesystem;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::config::MediaSettings;
use crate::errors::BoroughsError;

pub use filesystem::FileSystemStorage;

/// Who may fetch a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Reachable under the media URL
    Public,
    /// Kept out of any served directory
    Private,
}

/// A place uploaded files can be written to
#[async_trait]
pub trait Storage: Send + Sync {
    fn visibility(&self) -> Visibility;

    /// Store `data` as `filename` inside `dir` and return the stored name.
    /// Existing files are never overwritten; the stored name may differ from
    /// the requested one.
    async fn save(&self, dir: &str, filename: &str, data: &[u8]) -> Result<String, BoroughsError>;

    async fn exists(&self, name: &str) -> Result<bool, BoroughsError>;

    async fn delete(&self, name: &str) -> Result<(), BoroughsError>;

    /// Public URL for a stored name, if the backend exposes one
    fn url(&self, name: &str) -> Option<String>;
}

/// The configured backends, selected by visibility
#[derive(Clone)]
pub struct StorageBackends {
    public: Arc<dyn Storage>,
    private: Arc<dyn Storage>,
}

impl StorageBackends {
    pub fn from_settings(media: &MediaSettings) -> Self {
        Self {
            public: Arc::new(FileSystemStorage::public(media)),
            private: Arc::new(FileSystemStorage::private(media)),
        }
    }

    pub fn get(&self, visibility: Visibility) -> &Arc<dyn Storage> {
        match visibility {
            Visibility::Public => &self.public,
            Visibility::Private => &self.private,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_backends_by_visibility() {
        let media = MediaSettings {
            media_root: PathBuf::from("/tmp/boroughs-media"),
            private_media_root: PathBuf::from("/tmp/boroughs-private"),
            ..MediaSettings::default()
        };
        let backends = StorageBackends::from_settings(&media);

        assert_eq!(backends.get(Visibility::Public).visibility(), Visibility::Public);
        assert_eq!(backends.get(Visibility::Private).visibility(), Visibility::Private);
        assert_eq!(
            backends.public.url("photos/a.png").as_deref(),
            Some("/media/photos/a.png")
        );
        assert!(backends.private.url("photos/a.png").is_none());
    }
}
