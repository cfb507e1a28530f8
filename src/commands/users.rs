use anyhow::Result;
use owo_colors::OwoColorize;
use teamcal_core::Event;
use teamcal_core::config::TeamcalConfig;

use crate::render::pluralize;

pub fn run(config: &TeamcalConfig, events: Vec<Event>) -> Result<()> {
    let mut store = super::open_store(config);
    store.initialize(events);

    let users = store.users();
    if users.is_empty() {
        println!("{}", "No responsible users found".dimmed());
        return Ok(());
    }

    for user in users {
        let count = store
            .all_events()
            .iter()
            .filter(|e| e.user_id() == Some(&user.id))
            .count();
        let name = if user.name.is_empty() {
            "(unnamed)".to_string()
        } else {
            user.name.clone()
        };
        println!(
            "{:>8}  {} {}",
            user.id.to_string().bold(),
            name,
            format!("({} {})", count, pluralize("event", count)).dimmed()
        );
    }

    let unassigned = store.all_events().iter().filter(|e| e.user.is_none()).count();
    if unassigned > 0 {
        println!();
        println!(
            "{}",
            format!("{} {} without a responsible user", unassigned, pluralize("event", unassigned))
                .dimmed()
        );
    }

    Ok(())
}
