// SPDX-License-Identifier: AGPL-3.0-or-later
//! Optional `mkdown.toml` holding default conversion options
//!
//! ```toml
//! [convert]
//! toc = true
//! css = "style.css"
//! driver = "pd"
//! ```

use std::path::{Path, PathBuf};

use mkdown_core::RawOptions;
use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "mkdown.toml";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Error reading config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    convert: RawOptions,
}

/// Load conversion defaults.
///
/// An explicit path must exist. Without one, a missing default file just
/// yields the built-in defaults.
pub(crate) fn load(explicit: Option<&Path>) -> Result<RawOptions, ConfigError> {
    let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if explicit.is_none() && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(RawOptions::default());
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(file.convert)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_convert_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mkdown.toml");
        std::fs::write(&path, "[convert]\ntoc = true\ndriver = \"pd\"\n").unwrap();

        let raw = load(Some(&path)).unwrap();
        assert!(raw.toc);
        assert_eq!(raw.driver, "pd");
        assert!(raw.smartypants);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mkdown.toml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(load(Some(&path)).unwrap(), RawOptions::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_unknown_option_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mkdown.toml");
        std::fs::write(&path, "[convert]\ncolour = true\n").unwrap();
        let err = load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("mkdown.toml"));
    }
}
