//! Config file handling
//!
//! `<config dir>/curlconv/config.toml`:
//!
//! ```toml
//! [defaults]
//! language = "json"
//! verbose = false
//! strict = false
//! ```

use std::path::{Path, PathBuf};

use crate::errors::{CurlconvError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub config_dir: PathBuf,
    /// Output language when `--language` isn't given
    pub language: Option<String>,
    pub verbose: bool,
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: Self::default_config_dir(),
            language: None,
            verbose: false,
            strict: false,
        }
    }
}

impl Config {
    /// Load the user's config file. A missing file gives the defaults.
    pub fn load() -> Result<Self> {
        let config_dir = Self::default_config_dir();
        let mut config = Self::load_from(&config_dir.join("config.toml"))?;
        config.config_dir = config_dir;
        Ok(config)
    }

    pub fn load_from(config_file: &Path) -> Result<Self> {
        if !config_file.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_file)
            .map_err(|e| CurlconvError::Config(format!("Failed to read config: {}", e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| CurlconvError::Config(format!("Invalid config TOML: {}", e)))?;
        let defaults = toml_value.get("defaults");

        let language = defaults
            .and_then(|d| d.get("language"))
            .and_then(|v| v.as_str())
            .map(String::from);
        let verbose = defaults
            .and_then(|d| d.get("verbose"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let strict = defaults
            .and_then(|d| d.get("strict"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Ok(Self {
            config_dir: Self::default_config_dir(),
            language,
            verbose,
            strict,
        })
    }

    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("curlconv"))
            .unwrap_or_else(|| PathBuf::from(".curlconv"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_section() {
        let config = Config::from_toml("[defaults]\nlanguage = \"json\"\nverbose = true\n").unwrap();
        assert_eq!(config.language.as_deref(), Some("json"));
        assert!(config.verbose);
        assert!(!config.strict);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.language, None);
        assert!(!config.verbose);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[defaults\n").unwrap_err();
        assert!(matches!(err, CurlconvError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(!config.strict);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\nstrict = true").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert!(config.strict);
    }
}
