use crate::Locale;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "locad.toml";
pub const DEFAULT_JOURNAL_FILE: &str = "locad-history.jsonl";

/// Runtime configuration, read from `locad.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the history log is kept
    pub journal: PathBuf,
    pub locale: LocaleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal: PathBuf::from(DEFAULT_JOURNAL_FILE),
            locale: LocaleConfig::default(),
        }
    }
}

/// Locale preset plus optional overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub tag: String,
    pub number_max_fraction_digits: Option<u8>,
    pub percent_max_fraction_digits: Option<u8>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            tag: "en-US".to_string(),
            number_max_fraction_digits: None,
            percent_max_fraction_digits: None,
        }
    }
}

impl LocaleConfig {
    /// Resolve the preset and apply overrides. Unknown tags fall back to en-US.
    pub fn resolve(&self) -> Locale {
        let mut locale = Locale::from_tag(&self.tag).unwrap_or_else(|| {
            warn!(tag = %self.tag, "unknown locale, falling back to en-US");
            Locale::en_us()
        });

        if let Some(digits) = self.number_max_fraction_digits {
            locale.number_max_fraction_digits = digits;
        }
        if let Some(digits) = self.percent_max_fraction_digits {
            locale.percent_max_fraction_digits = digits;
        }
        locale
    }
}

impl Config {
    /// Load configuration from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(&temp_dir.path().join("locad.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.locale.resolve(), Locale::en_us());
    }

    #[test]
    fn test_parse_config() {
        let config = Config::from_toml(
            r#"
            journal = "data/history.jsonl"

            [locale]
            tag = "de-DE"
            percent_max_fraction_digits = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.journal, PathBuf::from("data/history.jsonl"));
        let locale = config.locale.resolve();
        assert_eq!(locale.decimal_separator, ",");
        assert_eq!(locale.percent_max_fraction_digits, 0);
        assert_eq!(locale.number_max_fraction_digits, 3);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml("[locale]\ntag = \"fr-FR\"\n").unwrap();
        assert_eq!(config.journal, PathBuf::from(DEFAULT_JOURNAL_FILE));
        assert_eq!(config.locale.tag, "fr-FR");
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        let config = LocaleConfig {
            tag: "tlh".to_string(),
            ..LocaleConfig::default()
        };
        assert_eq!(config.resolve(), Locale::en_us());
    }

    #[test]
    fn test_corrupted_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locad.toml");
        fs::write(&path, "journal = [").unwrap();

        let result = Config::load(&path);
        assert!(result.is_err());
    }
}
