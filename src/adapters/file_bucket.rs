use crate::domain::ports::{Bucket, BucketOpener};
use crate::utils::error::{GuestbookError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// A bucket backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileBucket {
    name: String,
    base_path: PathBuf,
}

impl FileBucket {
    /// Opens an existing directory as a bucket.
    pub async fn open(dir: &str) -> Result<Self> {
        let base_path = PathBuf::from(dir);
        match tokio::fs::metadata(&base_path).await {
            Ok(meta) if meta.is_dir() => Ok(Self {
                name: dir.to_string(),
                base_path,
            }),
            Ok(_) => Err(GuestbookError::InvalidConfigValueError {
                field: "bucket".to_string(),
                value: dir.to_string(),
                reason: "path is not a directory".to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(GuestbookError::BucketNotFoundError {
                bucket: dir.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let invalid = |reason: &str| GuestbookError::InvalidKeyError {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if key.is_empty() {
            return Err(invalid("key cannot be empty"));
        }

        let relative = Path::new(key);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir => return Err(invalid("key cannot contain '..'")),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("key must be relative"))
                }
            }
        }

        Ok(self.base_path.join(relative))
    }

    fn map_not_found(&self, key: &str, err: std::io::Error) -> GuestbookError {
        if err.kind() == ErrorKind::NotFound {
            GuestbookError::ObjectNotFoundError {
                bucket: self.name.clone(),
                key: key.to_string(),
            }
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl Bucket for FileBucket {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self, key: &str) -> Result<Vec<u8>> {
        let full_path = self.object_path(key)?;
        tokio::fs::read(full_path)
            .await
            .map_err(|e| self.map_not_found(key, e))
    }

    // Content type has no place to live on a plain filesystem.
    async fn write_all(&self, key: &str, data: &[u8], _content_type: Option<&str>) -> Result<()> {
        let full_path = self.object_path(key)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        tracing::debug!(bucket = %self.name, key, bytes = data.len(), "Wrote object");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let full_path = self.object_path(key)?;
        Ok(tokio::fs::try_exists(full_path).await?)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let full_path = self.object_path(key)?;
        tokio::fs::remove_file(full_path)
            .await
            .map_err(|e| self.map_not_found(key, e))
    }
}

/// Opens directories as buckets.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileBucketOpener;

impl BucketOpener for FileBucketOpener {
    type Bucket = FileBucket;

    async fn open_bucket(&self, name: &str) -> Result<FileBucket> {
        FileBucket::open(name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = TempDir::new().unwrap();
        let bucket = FileBucket::open(dir.path().to_str().unwrap()).await.unwrap();

        for key in ["", "../outside.txt", "a/../../b", "/etc/passwd"] {
            assert!(
                matches!(bucket.object_path(key), Err(GuestbookError::InvalidKeyError { .. })),
                "key {:?} should be rejected",
                key
            );
        }
        assert!(bucket.object_path("images/./cat.png").is_ok());
    }

    #[tokio::test]
    async fn test_open_file_is_not_a_bucket() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();

        let result = FileBucket::open(file.to_str().unwrap()).await;
        assert!(matches!(
            result,
            Err(GuestbookError::InvalidConfigValueError { .. })
        ));
    }

    #[tokio::test]
    async fn test_opener_opens_directories_by_name() {
        let dir = TempDir::new().unwrap();
        let name = dir.path().to_str().unwrap();

        let bucket = FileBucketOpener.open_bucket(name).await.unwrap();
        assert_eq!(bucket.name(), name);
        bucket.write_all("notes/hello.txt", b"hi", None).await.unwrap();
        assert_eq!(bucket.read_all("notes/hello.txt").await.unwrap(), b"hi");

        let missing = dir.path().join("nope");
        assert!(matches!(
            FileBucketOpener.open_bucket(missing.to_str().unwrap()).await,
            Err(GuestbookError::BucketNotFoundError { .. })
        ));
    }
}
