use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MediaStoreError {
    #[error("object not found")]
    NotFound,
    #[error("invalid owner id")]
    InvalidOwner,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaStoreError {
    fn from_io(e: std::io::Error) -> Self {
        if e.kind() == ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e)
        }
    }
}

/// Profile pictures on disk, one object per user, keyed by user id.
pub struct MediaStore {
    base_path: PathBuf,
}

impl MediaStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            base_path: data_dir.join("avatars"),
        }
    }

    fn avatar_path(&self, user_id: &str) -> PathBuf {
        self.base_path.join(user_id)
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path.join("tmp").join(Uuid::new_v4().to_string())
    }

    pub async fn exists(&self, user_id: &str) -> Result<bool, MediaStoreError> {
        validate_owner(user_id)?;
        Ok(self.avatar_path(user_id).exists())
    }

    pub async fn get(&self, user_id: &str) -> Result<Vec<u8>, MediaStoreError> {
        validate_owner(user_id)?;
        let path = self.avatar_path(user_id);
        fs::read(&path).await.map_err(MediaStoreError::from_io)
    }

    /// Writes through a temp file and renames into place, so readers never
    /// observe a partial avatar.
    pub async fn put(&self, user_id: &str, data: &[u8]) -> Result<(), MediaStoreError> {
        validate_owner(user_id)?;

        let temp_path = self.temp_path();
        if let Some(parent) = temp_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut temp_file = File::create(&temp_path).await?;
        temp_file.write_all(data).await?;
        temp_file.sync_all().await?;

        let final_path = self.avatar_path(user_id);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::rename(&temp_path, &final_path).await?;

        Ok(())
    }

    pub async fn delete(&self, user_id: &str) -> Result<bool, MediaStoreError> {
        validate_owner(user_id)?;
        let path = self.avatar_path(user_id);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MediaStoreError::Io(e)),
        }
    }
}

// Owner ids are uuids; anything else (path separators in particular) is
// rejected before touching the filesystem.
fn validate_owner(user_id: &str) -> Result<(), MediaStoreError> {
    if user_id.is_empty() || user_id.len() > 64 {
        return Err(MediaStoreError::InvalidOwner);
    }

    if !user_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(MediaStoreError::InvalidOwner);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let storage = MediaStore::new(temp_dir.path());

        let user_id = Uuid::new_v4().to_string();
        let data = b"fake image bytes".to_vec();

        storage.put(&user_id, &data).await.unwrap();

        assert!(storage.exists(&user_id).await.unwrap());
        assert_eq!(storage.get(&user_id).await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let storage = MediaStore::new(temp_dir.path());

        let user_id = Uuid::new_v4().to_string();
        storage.put(&user_id, b"first").await.unwrap();
        storage.put(&user_id, b"second").await.unwrap();

        assert_eq!(storage.get(&user_id).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let storage = MediaStore::new(temp_dir.path());

        let user_id = Uuid::new_v4().to_string();
        assert!(!storage.exists(&user_id).await.unwrap());
        assert!(matches!(
            storage.get(&user_id).await,
            Err(MediaStoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = MediaStore::new(temp_dir.path());

        let user_id = Uuid::new_v4().to_string();
        storage.put(&user_id, b"bytes").await.unwrap();

        assert!(storage.delete(&user_id).await.unwrap());
        assert!(!storage.exists(&user_id).await.unwrap());
        assert!(!storage.delete(&user_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_owner_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let storage = MediaStore::new(temp_dir.path());

        assert!(matches!(
            storage.get("../escape").await,
            Err(MediaStoreError::InvalidOwner)
        ));
        assert!(matches!(
            storage.put("", b"x").await,
            Err(MediaStoreError::InvalidOwner)
        ));
    }
}
