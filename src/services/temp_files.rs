use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub(crate) enum TempFileError {
    #[error("Invalid file name '{0}'")]
    InvalidName(String),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to clean up {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Flat directory of uploaded answer sheets. Files are keyed by their
/// base name; saving the same name twice overwrites.
#[derive(Debug, Clone)]
pub(crate) struct TempFileStore {
    dir: PathBuf,
}

impl TempFileStore {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, TempFileError> {
        let base_name = Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| TempFileError::InvalidName(file_name.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| TempFileError::Write { path: self.dir.clone(), source })?;

        let path = self.dir.join(base_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| TempFileError::Write { path: path.clone(), source })?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Saved uploaded file");
        Ok(path)
    }

    /// Removes every regular file in the directory and returns how many
    /// were deleted. A missing directory counts as already clean.
    pub(crate) async fn cleanup_all(&self) -> Result<usize, TempFileError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => return Err(TempFileError::Cleanup { path: self.dir.clone(), source }),
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(source) => {
                    return Err(TempFileError::Cleanup { path: self.dir.clone(), source })
                }
            };

            let path = entry.path();
            let is_file = entry
                .file_type()
                .await
                .map_err(|source| TempFileError::Cleanup { path: path.clone(), source })?
                .is_file();
            if !is_file {
                continue;
            }

            tokio::fs::remove_file(&path)
                .await
                .map_err(|source| TempFileError::Cleanup { path: path.clone(), source })?;
            removed += 1;
        }

        tracing::info!(dir = %self.dir.display(), removed, "Cleaned up uploaded files");
        Ok(removed)
    }
}
