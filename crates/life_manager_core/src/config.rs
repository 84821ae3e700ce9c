//! Application configuration.
//!
//! Every field has a built-in default, so an empty JSON object (or no file
//! at all) yields the stock setup. Environment variables are not read.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Local text-generation endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".to_string(),
            port: 11434,
            model: "llama2".to_string(),
            timeout_secs: 60,
        }
    }
}

impl AiConfig {
    /// `host:port`, the base every endpoint path is appended to.
    pub fn base_url(&self) -> String {
        format!("{}:{}", self.host.trim_end_matches('/'), self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Log directory; relative paths resolve against the working directory.
    pub log_dir: PathBuf,
    pub ai: AiConfig,
    /// Period at which the host should call the habit reminder check.
    pub reminder_check_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("life_manager.db"),
            log_dir: PathBuf::from("logs"),
            ai: AiConfig::default(),
            reminder_check_interval_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// `log_dir` made absolute against `base`.
    pub fn resolved_log_dir(&self, base: &Path) -> PathBuf {
        if self.log_dir.is_absolute() {
            self.log_dir.clone()
        } else {
            base.join(&self.log_dir)
        }
    }

    pub fn reminder_check_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_check_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn defaults_match_stock_setup() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, Path::new("life_manager.db"));
        assert_eq!(config.ai.base_url(), "http://localhost:11434");
        assert_eq!(config.ai.model, "llama2");
        assert_eq!(config.ai.timeout(), Duration::from_secs(60));
        assert_eq!(config.reminder_check_interval(), Duration::from_secs(60));
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config =
            AppConfig::from_json_str(r#"{"db_path": "/tmp/x.db", "ai": {"port": 9000}}"#).unwrap();
        assert_eq!(config.db_path, Path::new("/tmp/x.db"));
        assert_eq!(config.ai.port, 9000);
        assert_eq!(config.ai.host, "http://localhost");
        assert_eq!(config.reminder_check_interval_secs, 60);
        assert_eq!(AppConfig::from_json_str("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn log_dir_resolves_relative_to_base() {
        let config = AppConfig::default();
        assert_eq!(
            config.resolved_log_dir(Path::new("/srv/app")),
            Path::new("/srv/app/logs")
        );

        let pinned = AppConfig::from_json_str(r#"{"log_dir": "/var/log/life"}"#).unwrap();
        assert_eq!(
            pinned.resolved_log_dir(Path::new("/srv/app")),
            Path::new("/var/log/life")
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            AppConfig::from_json_str("{db_path"),
            Err(ConfigError::Parse(_))
        ));
    }
}
