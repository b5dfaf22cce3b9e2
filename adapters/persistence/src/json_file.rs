//! JSON file backed progress store.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use pathforge_core::{ProgressData, ProgressStore, PROGRESS_SCHEMA_VERSION};
use thiserror::Error;
use tracing::{debug, warn};

/// Failures raised while reading or writing a progress file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("failed to access progress file {}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file contents are not valid progress JSON.
    #[error("failed to parse progress file {}", .path.display())]
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The file was written with an incompatible layout.
    #[error("progress file uses unsupported schema version {found}")]
    UnsupportedSchema {
        /// Version recorded in the file.
        found: u32,
    },
}

/// Progress store persisting a single JSON document on disk.
#[derive(Clone, Debug)]
pub struct JsonFileProgressStore {
    path: PathBuf,
}

impl JsonFileProgressStore {
    /// Creates a store backed by the file at `path`. The file need not exist.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored progress. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read, does not parse, or was
    /// written with a different schema version.
    pub fn try_load(&self) -> Result<ProgressData, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(ProgressData::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let progress: ProgressData =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        if progress.schema_version != PROGRESS_SCHEMA_VERSION {
            return Err(StoreError::UnsupportedSchema {
                found: progress.schema_version,
            });
        }
        Ok(progress)
    }

    /// Writes `progress`, replacing the previous file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error when the parent directory or the file cannot be
    /// written.
    pub fn try_save(&self, progress: &ProgressData) -> Result<(), StoreError> {
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_vec_pretty(progress).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(io_error)?;
        fs::rename(&staging, &self.path).map_err(io_error)?;
        debug!(path = %self.path.display(), "progress written");
        Ok(())
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn load(&self) -> ProgressData {
        self.try_load().unwrap_or_else(|error| {
            warn!(%error, "falling back to default progress");
            ProgressData::default()
        })
    }

    fn save(&mut self, progress: &ProgressData) {
        if let Err(error) = self.try_save(progress) {
            warn!(%error, "progress was not saved");
        }
    }
}
