//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/crewroster/config.toml` by default:
//!
//! ```toml
//! [roster]
//! source = "/home/crew/roster.json"
//!
//! [calendar]
//! lookahead_days = 30
//! export_dir = "/home/crew/calendars"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crewroster_calendar::CalendarConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Configuration for the crewroster client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Roster source settings.
    pub roster: RosterSettings,

    /// Calendar settings.
    pub calendar: CalendarSettings,
}

/// Where the roster comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    /// Path to a JSON roster dump.
    pub source: Option<PathBuf>,
}

/// Calendar and export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Days shown ahead of today.
    pub lookahead_days: u32,

    /// Minimum seconds between two roster refreshes.
    pub min_update_interval_secs: u64,

    /// Directory receiving saved `.ics` files.
    pub export_dir: PathBuf,

    /// Prefix of the calendar display name.
    pub name_prefix: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        let defaults = CalendarConfig::default();
        Self {
            lookahead_days: defaults.lookahead_days,
            min_update_interval_secs: defaults.min_update_interval.as_secs(),
            export_dir: ClientConfig::default_data_dir(),
            name_prefix: defaults.calendar_name_prefix,
        }
    }
}

impl CalendarSettings {
    /// Converts to the calendar configuration.
    pub fn to_calendar_config(&self) -> CalendarConfig {
        CalendarConfig::new(&self.export_dir)
            .with_lookahead_days(self.lookahead_days)
            .with_min_update_interval(Duration::from_secs(self.min_update_interval_secs))
            .with_calendar_name_prefix(&self.name_prefix)
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Returns the configured roster dump path.
    pub fn roster_source(&self) -> ClientResult<&Path> {
        self.roster.source.as_deref().ok_or_else(|| {
            ClientError::Config(format!(
                "no roster source configured, set [roster] source in {}",
                Self::default_path().display()
            ))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("crewroster")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("crewroster")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert!(!config.debug);
        assert!(config.roster.source.is_none());
        assert_eq!(config.calendar.lookahead_days, 30);
        assert_eq!(config.calendar.min_update_interval_secs, 300);
        assert!(config.calendar.export_dir.ends_with("crewroster"));
        assert_eq!(config.calendar.name_prefix, "Crew Roster");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_content = r#"
[roster]
source = "/data/roster.json"

[calendar]
lookahead_days = 7
"#;
        let config: ClientConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.roster_source().unwrap(), Path::new("/data/roster.json"));
        assert_eq!(config.calendar.lookahead_days, 7);
        assert_eq!(config.calendar.min_update_interval_secs, 300);
    }

    #[test]
    fn to_calendar_config() {
        let settings = CalendarSettings {
            lookahead_days: 14,
            min_update_interval_secs: 60,
            export_dir: PathBuf::from("/exports"),
            name_prefix: "Roster".to_string(),
        };
        let config = settings.to_calendar_config();
        assert_eq!(config.lookahead_days, 14);
        assert_eq!(config.min_update_interval, Duration::from_secs(60));
        assert_eq!(config.export_path("12345"), PathBuf::from("/exports/12345_roster.ics"));
        assert_eq!(config.calendar_name_prefix, "Roster");
    }

    #[test]
    fn missing_source_is_config_error() {
        let err = ClientConfig::default().roster_source().unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
        assert!(err.to_string().contains("[roster] source"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debug = true\n[roster]\nsource = \"r.json\"\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert!(config.debug);
        assert_eq!(config.roster.source, Some(PathBuf::from("r.json")));
    }

    #[test]
    fn load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[calendar]\nlookahead_days = \"soon\"\n").unwrap();

        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn roundtrip_through_toml() {
        let config = ClientConfig {
            roster: RosterSettings {
                source: Some(PathBuf::from("/data/roster.json")),
            },
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
