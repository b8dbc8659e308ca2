//! Core configuration
//!
//! Resolves the database location and session policy. Defaults come from
//! the platform directories; an optional TOML file in the config directory
//! overrides individual fields.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default session lifetime handed to the identity layer
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

/// Resolved core configuration
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Where the SQLite database lives
    pub database_path: PathBuf,
    /// Session lifetime in hours
    pub session_ttl_hours: i64,
}

/// On-disk override file, all fields optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    session_ttl_hours: Option<i64>,
}

impl CoreConfig {
    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        let dirs = project_dirs()?;
        let file = dirs.config_dir().join("config.toml");
        Self::load_from(&file, dirs.data_dir())
    }

    /// Load from an explicit override file and data directory (for testing)
    pub fn load_from(file: &Path, data_dir: &Path) -> Result<Self> {
        let overrides: ConfigFile = if file.exists() {
            toml::from_str(&fs::read_to_string(file)?)?
        } else {
            ConfigFile::default()
        };

        Ok(Self {
            database_path: overrides
                .database_path
                .unwrap_or_else(|| data_dir.join("tessera.db")),
            session_ttl_hours: overrides
                .session_ttl_hours
                .unwrap_or(DEFAULT_SESSION_TTL_HOURS),
        })
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "tessera", "tessera").ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine config directory",
        ))
    })
}
