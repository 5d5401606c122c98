//! Key-value store backed by one JSON file per key inside a directory.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};

use crate::dao::{
    kv_store::KeyValueStore,
    storage::{StorageError, StorageResult},
};

const FILE_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = "tmp";

/// Convenient result alias returning [`FileStoreError`] failures.
pub type FileStoreResult<T> = Result<T, FileStoreError>;

/// Failures that can occur while reading or writing the store directory.
#[derive(Debug, Error)]
pub enum FileStoreError {
    /// Keys become file names, so only a restricted alphabet is accepted.
    #[error("invalid store key `{key}`")]
    InvalidKey { key: String },
    /// The store directory could not be created.
    #[error("failed to create store directory `{path}`")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading an existing file failed.
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Writing or syncing the temporary file failed.
    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Moving the temporary file over the target failed.
    #[error("failed to replace `{path}`")]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove `{path}`")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<FileStoreError> for StorageError {
    fn from(err: FileStoreError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}

/// [`KeyValueStore`] writing each key to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: Arc<Path>,
}

impl FileKvStore {
    /// Build a store rooted at `dir`. The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir: PathBuf = dir.into();
        Self {
            dir: Arc::from(dir),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> FileStoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(FileStoreError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }

    async fn read(path: PathBuf) -> FileStoreResult<Option<String>> {
        match fs::read(&path).await {
            // Non UTF-8 content is handed over as-is so the caller can treat it as corrupt.
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStoreError::Read { path, source }),
        }
    }

    async fn write(dir: Arc<Path>, path: PathBuf, value: String) -> FileStoreResult<()> {
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| FileStoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;

        let temp_path = path.with_extension(format!("{FILE_EXTENSION}.{TEMP_SUFFIX}"));
        let write_temp = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(value.as_bytes()).await?;
            file.sync_all().await
        };
        if let Err(source) = write_temp.await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(FileStoreError::Write {
                path: temp_path,
                source,
            });
        }

        fs::rename(&temp_path, &path)
            .await
            .map_err(|source| FileStoreError::Rename { path, source })
    }

    async fn delete(path: PathBuf) -> FileStoreResult<()> {
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileStoreError::Remove { path, source }),
        }
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<String>>> {
        let path = self.path_for(key);
        Box::pin(async move { Self::read(path?).await.map_err(Into::into) })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path_for(key);
        let dir = self.dir.clone();
        Box::pin(async move { Self::write(dir, path?, value).await.map_err(Into::into) })
    }

    fn remove(&self, key: &str) -> BoxFuture<'static, StorageResult<()>> {
        let path = self.path_for(key);
        Box::pin(async move { Self::delete(path?).await.map_err(Into::into) })
    }
}
