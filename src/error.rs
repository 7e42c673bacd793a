//! Error type shared by the terminal, layout and preference surfaces.
//!
//! The animation core has no error paths: a timer firing after teardown is
//! prevented by cancellation, not reported.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FolioError {
    #[error("terminal or file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid theme preference {0:?} (expected \"light\" or \"dark\")")]
    InvalidTheme(String),
    #[error("layout computation failed: {0}")]
    Layout(String),
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, FolioError>;
