use anyhow::Result;
use owo_colors::OwoColorize;
use teamcal_core::CalendarStore;
use teamcal_core::config::TeamcalConfig;
use teamcal_core::settings::CalendarSettings;
use teamcal_core::storage::FileStorage;

pub fn show(config: &TeamcalConfig) -> Result<()> {
    let store = super::open_store(config);
    print_settings(store.settings());
    Ok(())
}

/// Apply a settings mutation; the store persists it.
pub fn update<F>(config: &TeamcalConfig, change: F) -> Result<()>
where
    F: FnOnce(&mut CalendarStore<FileStorage>),
{
    let mut store = super::open_store(config);
    change(&mut store);
    print_settings(store.settings());
    Ok(())
}

fn print_settings(settings: &CalendarSettings) {
    let time_format = if settings.use_24_hour_format {
        "24-hour"
    } else {
        "12-hour"
    };

    println!("{}", "Settings".bold());
    println!("  View:         {}", settings.view);
    println!("  Badges:       {}", settings.badge_variant);
    println!("  Time format:  {}", time_format);
    println!("  Agenda by:    {}", settings.agenda_mode_group_by);
}
