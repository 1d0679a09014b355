//! Project configuration file (`cpct.toml`).
//!
//! Pure CLI convenience over [`cpc_drv::Config`]: lets a project pin its
//! include search directories and preprocessor defines once instead of
//! repeating `-I`/`-D` on every invocation. Command-line flags extend, rather
//! than replace, whatever a config file already sets.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

pub const CONFIG_FILE_NAME: &str = "cpct.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectConfig {
    /// Directories searched for `#INCLUDE` targets, checked after the
    /// including file's own directory.
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,

    /// Preprocessor symbols available to `#IF`. `TARGET.BITS.PER.WORD`
    /// defaults to `"64"` regardless of whether it appears here.
    #[serde(default)]
    pub defines: BTreeMap<String, String>,

    /// Emit `tracing::debug!` at every pipeline stage transition.
    #[serde(default)]
    pub verbose: bool,
}

impl ProjectConfig {
    /// Loads from the nearest `cpct.toml`, checked in the current directory,
    /// then `~/.config/cpct/`, then the platform config directory. Returns the
    /// default (empty) configuration if none is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CliError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    fn find_config_file() -> Option<PathBuf> {
        let current = PathBuf::from(CONFIG_FILE_NAME);
        if current.exists() {
            return Some(current);
        }
        if let Some(path) = home_dir().map(|dir| dir.join(".config").join("cpct").join(CONFIG_FILE_NAME)) {
            if path.exists() {
                return Some(path);
            }
        }
        if let Some(path) = config_dir().map(|dir| dir.join("cpct").join(CONFIG_FILE_NAME)) {
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_empty() {
        let config = ProjectConfig::default();
        assert!(config.search_dirs.is_empty());
        assert!(config.defines.is_empty());
        assert!(!config.verbose);
    }

    #[test]
    fn loads_search_dirs_and_defines_from_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "search_dirs = [\"lib\"]\nverbose = true\n\n[defines]\nDEBUG = \"1\"\n",
        )
        .expect("write config");

        let config = ProjectConfig::load_from_path(&path).expect("parse config");
        assert_eq!(config.search_dirs, vec![PathBuf::from("lib")]);
        assert!(config.verbose);
        assert_eq!(config.defines.get("DEBUG"), Some(&"1".to_string()));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = ProjectConfig::load_from_path(Path::new("/nonexistent/cpct.toml"));
        assert!(matches!(result, Err(CliError::ReadConfig { .. })));
    }
}
