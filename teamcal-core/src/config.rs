//! Global teamcal configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};
use crate::settings::DEFAULT_SETTINGS_KEY;
use crate::storage::FileStorage;
use crate::view::WeekStart;

static DEFAULT_STORAGE_DIR: &str = "~/.local/share/teamcal";

const DEFAULT_MAX_EVENTS_PER_DAY: usize = 3;

fn default_storage_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORAGE_DIR)
}

fn default_settings_key() -> String {
    DEFAULT_SETTINGS_KEY.to_string()
}

fn default_max_events_per_day() -> usize {
    DEFAULT_MAX_EVENTS_PER_DAY
}

/// Configuration at ~/.config/teamcal/config.toml, overridable with
/// `TEAMCAL_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TeamcalConfig {
    /// Where persisted preferences live.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Storage key of the settings record.
    #[serde(default = "default_settings_key")]
    pub settings_key: String,

    #[serde(default)]
    pub week_start: WeekStart,

    /// Events shown in a month cell before collapsing into "+N more".
    #[serde(default = "default_max_events_per_day")]
    pub max_events_per_day: usize,
}

impl Default for TeamcalConfig {
    fn default() -> Self {
        TeamcalConfig {
            storage_dir: default_storage_dir(),
            settings_key: default_settings_key(),
            week_start: WeekStart::default(),
            max_events_per_day: DEFAULT_MAX_EVENTS_PER_DAY,
        }
    }
}

impl TeamcalConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("teamcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented-out config file
    /// on first run.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        let config: TeamcalConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("TEAMCAL"))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))?;

        if config.settings_key.trim().is_empty() {
            return Err(CalendarError::Config("settings_key must not be empty".into()));
        }

        Ok(config)
    }

    pub fn storage_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.storage_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(self.storage_path())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# teamcal configuration

# Where display preferences are stored:
# storage_dir = \"{}\"

# Storage key of the preferences record:
# settings_key = \"{}\"

# First day of the week (monday or sunday):
# week_start = \"monday\"

# Events shown per day in the month view before \"+N more\":
# max_events_per_day = {}
",
            DEFAULT_STORAGE_DIR, DEFAULT_SETTINGS_KEY, DEFAULT_MAX_EVENTS_PER_DAY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
