//! Optional raw-response dumps for inspecting what the API returned.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ScraperError;

/// Writes pretty-printed JSON snapshots into a directory, or does nothing
/// when disabled.
#[derive(Debug, Clone, Default)]
pub struct RawDumper {
    dir: Option<PathBuf>,
}

impl RawDumper {
    #[must_use]
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    #[must_use]
    pub fn to_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Saves `value` as `<dir>/<file_name>`, overwriting any previous dump.
    /// Returns the written path, or `None` when disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Dump`] if the directory or file cannot be
    /// written.
    pub fn save<T: Serialize + ?Sized>(
        &self,
        file_name: &str,
        value: &T,
    ) -> Result<Option<PathBuf>, ScraperError> {
        let Some(dir) = &self.dir else {
            return Ok(None);
        };
        let path = dir.join(file_name);
        let io_err = |path: &Path, source: std::io::Error| ScraperError::Dump {
            path: path.display().to_string(),
            source,
        };

        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        let body = serde_json::to_string_pretty(value).map_err(|e| ScraperError::Deserialize {
            context: format!("serializing dump {file_name}"),
            source: e,
        })?;
        std::fs::write(&path, body).map_err(|e| io_err(&path, e))?;

        tracing::debug!(path = %path.display(), "saved raw dump");
        Ok(Some(path))
    }
}
