//! Theme preference persistence.
//!
//! The whole format is one string: `light` or `dark`. Surrounding whitespace
//! is ignored on read. A missing file means "no preference".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::ThemeMode;
use crate::error::{FolioError, Result};

/// File-backed theme preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/folio-tui/theme`.
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir().ok_or(FolioError::NoConfigDir)?;
        Ok(Self::new(dir.join("folio-tui").join("theme")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored mode. `Ok(None)` when nothing is stored yet.
    pub fn load(&self) -> Result<Option<ThemeMode>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents.parse().map(Some),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Write the mode, creating parent directories as needed.
    pub fn save(&self, mode: ThemeMode) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, mode.as_str())?;
        Ok(())
    }
}
