//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};

/// File names probed in the project root, in order
pub const CONFIG_CANDIDATES: &[&str] = &[".adk.toml", "adk.toml", ".config/adk.toml"];

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, or discover it in `project_root`
    ///
    /// An explicit path must exist. Without one, a missing file yields defaults.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(project_root),
        };

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        tracing::debug!(path = ?config_path, "Configuration loaded");
        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file(project_root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| project_root.join(candidate))
        .find(|p| p.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {e}", path.display())).with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {e}", path.display()),
        )
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.android.archive_dir, "apk_builds");
        assert_eq!(config.schema.android.build_timeout(), Some(Duration::from_secs(1800)));
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), None).unwrap();
        assert!(config.path.is_none());
        assert_eq!(config.schema, ConfigSchema::default());
    }

    #[test]
    fn test_config_discovered_in_project_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".adk.toml"),
            "[android]\narchive_dir = \"releases\"\nbuild_timeout_secs = 0\n",
        )
        .unwrap();

        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config.schema.android.archive_dir, "releases");
        assert_eq!(config.schema.android.dir, "android");
        assert_eq!(config.schema.android.build_timeout(), None);
        assert_eq!(config.schema.logging.level, "warn");
    }

    #[test]
    fn test_config_explicit_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path(), Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_config_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adk.toml");
        std::fs::write(&path, "[android\n").unwrap();
        let err = Config::load(dir.path(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }
}
