use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

const FALLBACK_FILE_NAME: &str = "resume.pdf";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: '{}'", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == ErrorKind::NotFound {
            StorageError::NotFound(path.to_path_buf())
        } else {
            StorageError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Upload directory holding one PDF per résumé, named `{id}_{original name}`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    base_path: PathBuf,
}

impl UploadStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::io(&self.base_path, e))
    }

    pub fn path_for(&self, id: Uuid, original_name: &str) -> PathBuf {
        self.base_path
            .join(format!("{id}_{}", safe_file_name(original_name)))
    }

    pub async fn save(
        &self,
        id: Uuid,
        original_name: &str,
        data: &[u8],
    ) -> Result<PathBuf, StorageError> {
        self.ensure_directory_exists().await?;

        let path = self.path_for(id, original_name);
        fs::write(&path, data)
            .await
            .map_err(|e| StorageError::io(&path, e))?;

        Ok(path)
    }

    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        fs::read(path).await.map_err(|e| StorageError::io(path, e))
    }

    /// Returns `Ok(false)` when the file was already gone.
    pub async fn remove(&self, path: &Path) -> Result<bool, StorageError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}

/// Keeps only the last path component of a client-supplied name, without
/// control characters (the name ends up in a response header on download).
pub fn safe_file_name(original_name: &str) -> String {
    let cleaned: String = original_name.chars().filter(|c| !c.is_control()).collect();
    let name = cleaned
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .trim();

    match name {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        other => other.to_string(),
    }
}
