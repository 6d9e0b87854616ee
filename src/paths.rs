//! XDG-compliant path resolution for newsumm.
//!
//! Provides `SummPaths`: where the config file lives and where downloaded
//! linguistic resources are kept, following the XDG Base Directory Specification.

use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};

/// Global XDG-compliant directories for newsumm.
#[derive(Debug, Clone)]
pub struct SummPaths {
    /// `$XDG_CONFIG_HOME/newsumm/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/newsumm/`
    pub data_dir: PathBuf,
}

impl SummPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> ConfigResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| ConfigError::NoHome)?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("newsumm");

        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share"))
            .join("newsumm");

        Ok(Self { config_dir, data_dir })
    }

    /// All paths under one root, for tests and portable installs.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    /// Path to the global config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Default home of the punkt bundle.
    pub fn resources_dir(&self) -> PathBuf {
        self.data_dir.join("resources")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_use_xdg_layout() {
        // Read-only check; mutating env vars is unsafe in edition 2024.
        if std::env::var("HOME").is_err() {
            return;
        }
        let paths = SummPaths::resolve().unwrap();
        assert!(paths.config_dir.ends_with("newsumm"));
        assert!(paths.data_dir.ends_with("newsumm"));
        assert!(paths.config_file().ends_with("newsumm/config.toml"));
        assert!(paths.resources_dir().starts_with(&paths.data_dir));
    }

    #[test]
    fn rooted_paths_stay_under_root() {
        let paths = SummPaths::rooted("/tmp/ns");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/ns/config/config.toml"));
        assert_eq!(paths.resources_dir(), PathBuf::from("/tmp/ns/data/resources"));
    }
}
