use anyhow::Result;
use owo_colors::OwoColorize;
use teamcal_core::config::TeamcalConfig;

pub fn run(config: &TeamcalConfig) -> Result<()> {
    let config_path = TeamcalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:    {}", config_path.display());
    println!(
        "  Settings:  {}",
        config
            .storage()
            .dir()
            .join(format!("{}.json", config.settings_key))
            .display()
    );
    println!();
    println!("{}", "Display".bold());
    println!("  Week starts on:      {:?}", config.week_start);
    println!("  Events per day cell: {}", config.max_events_per_day);

    Ok(())
}
