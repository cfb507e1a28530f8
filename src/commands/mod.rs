pub mod config;
pub mod events;
pub mod settings;
pub mod users;

use chrono::{NaiveDate, Utc};
use teamcal_core::CalendarStore;
use teamcal_core::config::TeamcalConfig;
use teamcal_core::storage::FileStorage;

/// Open the store for this session, reading the saved settings.
pub fn open_store(config: &TeamcalConfig) -> CalendarStore<FileStorage> {
    CalendarStore::new(
        config.storage(),
        &config.settings_key,
        today(),
    )
}

/// Today's date in UTC, the zone the calendar's day boundaries use.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_is_the_utc_date() {
        let before = Utc::now().date_naive();
        let day = today();
        let after = Utc::now().date_naive();
        assert!(day == before || day == after);
    }
}
