//! Persisted display preferences.
//!
//! The record is stored as JSON under a single key. Loading never fails: a
//! missing, unreadable or malformed record yields the defaults, and a partial
//! one is filled in from them. Saving is best-effort.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;
use crate::storage::SettingsStorage;
use crate::view::CalendarView;

pub const DEFAULT_SETTINGS_KEY: &str = "calendar-settings";

/// Version written by this release. Records without a version are v0.
pub const CURRENT_SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    /// Text only.
    Plain,
    /// Colored dot/background by event color.
    #[default]
    Colored,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgendaGroupBy {
    #[default]
    Date,
    Color,
}

macro_rules! lowercase_choice {
    ($ty:ty, $field:literal, $($variant:ident => $s:literal),+) => {
        impl FromStr for $ty {
            type Err = CalendarError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($s => Ok(Self::$variant),)+
                    _ => Err(CalendarError::validation($field, format!("unknown value '{s}'"))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $s),)+
                }
            }
        }
    };
}

lowercase_choice!(BadgeVariant, "badgeVariant", Plain => "plain", Colored => "colored");
lowercase_choice!(AgendaGroupBy, "agendaModeGroupBy", Date => "date", Color => "color");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSettings {
    pub version: u32,
    pub badge_variant: BadgeVariant,
    pub view: CalendarView,
    #[serde(rename = "use24HourFormat")]
    pub use_24_hour_format: bool,
    pub agenda_mode_group_by: AgendaGroupBy,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        CalendarSettings {
            version: CURRENT_SETTINGS_VERSION,
            badge_variant: BadgeVariant::default(),
            view: CalendarView::default(),
            use_24_hour_format: true,
            agenda_mode_group_by: AgendaGroupBy::default(),
        }
    }
}

/// Read the record stored at `key`, falling back to `defaults`.
pub fn load_settings<S: SettingsStorage>(
    storage: &S,
    key: &str,
    defaults: &CalendarSettings,
) -> CalendarSettings {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return defaults.clone(),
        Err(e) => {
            tracing::warn!(key, error = %e, "settings storage unavailable, using defaults");
            return defaults.clone();
        }
    };

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed settings record, using defaults");
            return defaults.clone();
        }
    };

    migrate(value, defaults).unwrap_or_else(|| defaults.clone())
}

/// Write the full record at `key`. Failures are logged and otherwise ignored.
pub fn save_settings<S: SettingsStorage>(storage: &S, key: &str, settings: &CalendarSettings) {
    let content = match serde_json::to_string(settings) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not serialize settings");
            return;
        }
    };

    if let Err(e) = storage.set(key, &content) {
        tracing::warn!(key, error = %e, "could not persist settings");
    }
}

/// Bring a stored record up to the current version, merged over `defaults`.
/// Returns None when the record is not an object or comes from a newer release.
pub fn migrate(value: Value, defaults: &CalendarSettings) -> Option<CalendarSettings> {
    let Value::Object(mut record) = value else {
        tracing::warn!("settings record is not an object, using defaults");
        return None;
    };

    let version = record
        .get("version")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    if version > u64::from(CURRENT_SETTINGS_VERSION) {
        tracing::warn!(version, "settings record from a newer release, using defaults");
        return None;
    }

    if version == 0 {
        migrate_v0(&mut record);
    }

    let mut settings = defaults.clone();
    settings.version = CURRENT_SETTINGS_VERSION;

    if let Some(v) = field(&record, "badgeVariant") {
        settings.badge_variant = v;
    }
    if let Some(v) = field(&record, "view") {
        settings.view = v;
    }
    if let Some(v) = field(&record, "use24HourFormat") {
        settings.use_24_hour_format = v;
    }
    if let Some(v) = field(&record, "agendaModeGroupBy") {
        settings.agenda_mode_group_by = v;
    }

    Some(settings)
}

// v0 records could hold the since-removed "year" view
fn migrate_v0(record: &mut Map<String, Value>) {
    if record.get("view").and_then(Value::as_str) == Some("year") {
        record.insert("view".into(), Value::String("month".into()));
    }
}

fn field<T: DeserializeOwned>(record: &Map<String, Value>, key: &str) -> Option<T> {
    let value = record.get(key)?.clone();
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(field = key, error = %e, "ignoring invalid settings field");
            None
        }
    }
}
