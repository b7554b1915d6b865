//! Generated QR code storage on local disk.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use regex::Regex;

static RE_OUTPUT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+\.png$").unwrap());

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Flat directory of PNG files addressed by name.
#[derive(Debug, Clone)]
pub struct QrStore {
    dir: PathBuf,
}

impl QrStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a stored file name to its path. Names with directory parts are refused.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if !RE_OUTPUT_NAME.is_match(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    /// Write `data` under `name`, replacing any existing file.
    ///
    /// The bytes land in a temporary file first and are renamed into place,
    /// so readers never observe a partial PNG.
    pub fn save(&self, name: &str, data: &[u8]) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name)?;
        std::fs::create_dir_all(&self.dir)?;

        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!(".{name}.{}.{seq}.tmp", std::process::id()));
        std::fs::write(&tmp, data)?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::info!(path = %path.display(), bytes = data.len(), "QR code saved");
        Ok(path)
    }

    /// Read a stored file back.
    pub fn open(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(name)?;
        match std::fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }
}
