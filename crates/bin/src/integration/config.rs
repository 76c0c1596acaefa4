//! Splitter configuration for the CLI.
//!
//! A JSON file supplies the base [`SplitConfig`]; command-line flags override
//! individual fields. Without `--config` the file at the platform default
//! location is used when present:
//! - Linux: `~/.config/newsfold/config.json`
//! - macOS: `~/Library/Application Support/newsfold/config.json`
//! - Windows: `%APPDATA%\newsfold\config.json`

use newsfold_validation::{CalendarOffset, SplitConfig, ValidationError};
use std::path::{Path, PathBuf};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    /// Config file could not be read.
    #[error("Cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not a valid splitter configuration.
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Override or resulting configuration is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Get the default configuration directory.
pub(crate) fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("newsfold")
}

/// Get the default configuration file path.
pub(crate) fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

/// Load the base configuration.
///
/// An explicit path must exist. The default path is optional and falls back
/// to [`SplitConfig::default`].
pub(crate) fn load_split_config(explicit: Option<&Path>) -> Result<SplitConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let path = default_config_path();
    if path.is_file() {
        tracing::debug!(path = %path.display(), "using default config");
        read_config(&path)
    } else {
        Ok(SplitConfig::default())
    }
}

fn read_config(path: &Path) -> Result<SplitConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Field overrides taken from the command line.
#[derive(Debug, Default)]
pub(crate) struct SplitOverrides {
    pub(crate) column: Option<String>,
    pub(crate) train: Option<String>,
    pub(crate) val: Option<String>,
    pub(crate) step: Option<String>,
    pub(crate) sliding: bool,
}

impl SplitOverrides {
    /// Apply the overrides on top of `config` and validate the result.
    pub(crate) fn apply(self, mut config: SplitConfig) -> Result<SplitConfig, ConfigError> {
        if let Some(column) = self.column {
            config.timestamp_field = column;
        }
        if let Some(train) = self.train {
            config.train_size = CalendarOffset::parse(&train)?;
        }
        if let Some(val) = self.val {
            config.val_size = CalendarOffset::parse(&val)?;
        }
        if let Some(step) = self.step {
            config.step = CalendarOffset::parse(&step)?;
        }
        if self.sliding {
            config.expanding = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_paths() {
        assert!(default_config_dir().ends_with("newsfold"));
        assert!(default_config_path().ends_with("newsfold/config.json"));
    }

    #[test]
    fn test_explicit_config_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"timestamp_field": "issuedate", "train_size": "3y"}"#).unwrap();

        let config = load_split_config(Some(&path)).unwrap();
        assert_eq!(config.timestamp_field, "issuedate");
        assert_eq!(config.train_size, CalendarOffset::years(3));
        assert_eq!(config.val_size, CalendarOffset::years(1));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_split_config(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_bad_offset_in_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"step": "1 decade"}"#).unwrap();
        assert!(matches!(
            load_split_config(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let overrides = SplitOverrides {
            column: Some("date".to_string()),
            step: Some("6m".to_string()),
            sliding: true,
            ..Default::default()
        };
        let config = overrides.apply(SplitConfig::default()).unwrap();
        assert_eq!(config.timestamp_field, "date");
        assert_eq!(config.step, CalendarOffset::months(6));
        assert!(!config.expanding);
        assert_eq!(config.train_size, CalendarOffset::years(2));
    }

    #[test]
    fn test_invalid_overrides() {
        let bad_step = SplitOverrides {
            step: Some("fortnightly".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_step.apply(SplitConfig::default()),
            Err(ConfigError::Validation(ValidationError::InvalidStepFormat(_)))
        ));

        let zero_step = SplitOverrides {
            step: Some("0d".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            zero_step.apply(SplitConfig::default()),
            Err(ConfigError::Validation(ValidationError::InvalidStepFormat(_)))
        ));
    }

    #[test]
    fn test_zero_train_override_is_accepted() {
        let zero_train = SplitOverrides {
            train: Some("0m".to_string()),
            ..Default::default()
        };
        let config = zero_train.apply(SplitConfig::default()).unwrap();
        assert!(config.train_size.is_zero());
    }
}
