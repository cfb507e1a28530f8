mod commands;
mod render;
mod seed;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use teamcal_core::config::TeamcalConfig;
use teamcal_core::settings::{AgendaGroupBy, BadgeVariant};
use teamcal_core::{CalendarView, EventColor, UserSelection};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "teamcal")]
#[command(about = "Browse and filter your team's calendar events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show events for the current view
    Events {
        /// JSON file with events, as returned by the events endpoint
        #[arg(short, long)]
        file: PathBuf,

        /// Anchor date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Switch to this view (remembered for next time)
        #[arg(short, long)]
        view: Option<CalendarView>,

        /// Only show events with this color (repeatable)
        #[arg(long = "color")]
        colors: Vec<EventColor>,

        /// Only show events this user is responsible for ("all" for everyone)
        #[arg(short, long)]
        user: Option<UserSelection>,
    },
    /// List the people responsible for events
    Users {
        /// JSON file with events, as returned by the events endpoint
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show or change display settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
    /// Show config and storage paths
    Config,
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    /// Set the default view
    View { view: CalendarView },
    /// Set the event badge style (plain or colored)
    Badge { variant: BadgeVariant },
    /// Group the agenda by date or color
    GroupBy { group_by: AgendaGroupBy },
    /// Switch between 24-hour and 12-hour times
    ToggleTimeFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TeamcalConfig::load()?;

    match cli.command {
        Commands::Events {
            file,
            date,
            view,
            colors,
            user,
        } => {
            let date = date.as_deref().map(parse_date).transpose()?;
            let events = seed::load(&file).await?;
            let options = commands::events::Options {
                date,
                view,
                colors,
                user,
            };
            commands::events::run(&config, events, options)
        }
        Commands::Users { file } => {
            let events = seed::load(&file).await?;
            commands::users::run(&config, events)
        }
        Commands::Settings { action } => match action.unwrap_or(SettingsAction::Show) {
            SettingsAction::Show => commands::settings::show(&config),
            SettingsAction::View { view } => {
                commands::settings::update(&config, |store| store.set_view(view))
            }
            SettingsAction::Badge { variant } => {
                commands::settings::update(&config, |store| store.set_badge_variant(variant))
            }
            SettingsAction::GroupBy { group_by } => commands::settings::update(&config, |store| {
                store.set_agenda_mode_group_by(group_by)
            }),
            SettingsAction::ToggleTimeFormat => {
                commands::settings::update(&config, |store| store.toggle_time_format())
            }
        },
        Commands::Config => commands::config::run(&config),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}
