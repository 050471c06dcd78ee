//! Path management for Newsdesk files.

use newsdesk_core::{NewsdeskError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable that relocates every Newsdesk file.
pub const HOME_ENV: &str = "NEWSDESK_HOME";

const APP_DIR: &str = "newsdesk";

/// Locations of the files Newsdesk persists.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/newsdesk/          # Base directory (platform config dir)
/// ├── config.toml              # Client configuration
/// └── credential.toml          # Session credential (mode 0600)
/// ```
///
/// The base directory is, in order of precedence: an explicit path (the
/// `--home` flag), `$NEWSDESK_HOME`, or `<config_dir>/newsdesk`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsdeskPaths {
    base: PathBuf,
}

impl NewsdeskPaths {
    /// Resolves the base directory.
    ///
    /// # Errors
    ///
    /// Returns a config error if no explicit path is given and the platform
    /// config directory cannot be determined.
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        Self::resolve(base_path, std::env::var_os(HOME_ENV), dirs::config_dir())
    }

    /// Uses `base` as the base directory.
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn resolve(
        explicit: Option<&Path>,
        env_home: Option<OsString>,
        config_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::from_base(path));
        }
        if let Some(home) = env_home.filter(|home| !home.is_empty()) {
            return Ok(Self::from_base(home));
        }
        config_dir
            .map(|dir| Self::from_base(dir.join(APP_DIR)))
            .ok_or_else(|| NewsdeskError::config("Cannot find config directory"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config.toml")
    }

    /// # Security Note
    ///
    /// Holds the bearer credential; written with mode `0600` on Unix.
    pub fn credential_file(&self) -> PathBuf {
        self.base.join("credential.toml")
    }
}
