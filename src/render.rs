//! Terminal rendering for teamcal-core types.
//!
//! Extension traits that add colored output to core types using owo_colors.
//! Times are shown in UTC, matching the day boundaries the core uses.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use teamcal_core::filter::EventFilter;
use teamcal_core::settings::{BadgeVariant, CalendarSettings};
use teamcal_core::view::{AgendaGroup, AgendaKey, DayCell};
use teamcal_core::{Event, EventColor, UserSelection};

pub trait Render {
    fn render(&self, settings: &CalendarSettings) -> String;
}

pub fn format_time(time: DateTime<Utc>, use_24_hour_format: bool) -> String {
    if use_24_hour_format {
        time.format("%H:%M").to_string()
    } else {
        time.format("%-I:%M %p").to_string()
    }
}

fn paint(color: EventColor, text: &str) -> String {
    match color {
        EventColor::Blue => text.blue().to_string(),
        EventColor::Green => text.green().to_string(),
        EventColor::Red => text.red().to_string(),
        EventColor::Yellow => text.yellow().to_string(),
        EventColor::Purple => text.magenta().to_string(),
        EventColor::Orange => text.truecolor(255, 165, 0).to_string(),
        EventColor::Gray => text.bright_black().to_string(),
    }
}

fn badge(event: &Event, variant: BadgeVariant) -> String {
    match variant {
        BadgeVariant::Colored => paint(event.color, "●"),
        BadgeVariant::Plain => "•".to_string(),
    }
}

impl Render for Event {
    fn render(&self, settings: &CalendarSettings) -> String {
        let time = format!(
            "{}-{}",
            format_time(self.start, settings.use_24_hour_format),
            format_time(self.end, settings.use_24_hour_format)
        );

        let mut line = format!(
            "{} {:>15} {}",
            badge(self, settings.badge_variant),
            time,
            self.title
        );

        let mut details = vec![self.kind.label().to_string()];
        if let Some(user) = &self.user {
            details.push(if user.name.is_empty() {
                user.id.to_string()
            } else {
                user.name.clone()
            });
        }
        line.push_str(&format!(" {}", format!("({})", details.join(", ")).dimmed()));
        line
    }
}

impl Render for DayCell<'_> {
    fn render(&self, settings: &CalendarSettings) -> String {
        let mut lines = vec![self.date.format("%a %b %-d").to_string().bold().to_string()];

        if self.visible.is_empty() {
            lines.push(format!("  {}", "No events".dimmed()));
        }
        for event in &self.visible {
            lines.push(format!("  {}", event.render(settings)));
        }
        if self.hidden_count > 0 {
            lines.push(format!("  {}", format!("+{} more", self.hidden_count).dimmed()));
        }

        lines.join("\n")
    }
}

impl Render for AgendaGroup<'_> {
    fn render(&self, settings: &CalendarSettings) -> String {
        let heading = match self.key {
            AgendaKey::Color(color) => paint(color, &self.key.to_string()).bold().to_string(),
            AgendaKey::Date(_) => self.key.to_string().bold().to_string(),
        };

        let mut lines = vec![heading];
        for event in &self.events {
            let date = event.start.format("%b %-d").to_string();
            let prefix = match self.key {
                AgendaKey::Color(_) => format!("{} ", date.dimmed()),
                AgendaKey::Date(_) => String::new(),
            };
            lines.push(format!("  {}{}", prefix, event.render(settings)));
        }

        lines.join("\n")
    }
}

/// One-line summary of the active filters, or None when nothing is filtered.
pub fn filter_summary(filter: &EventFilter) -> Option<String> {
    if !filter.is_active() {
        return None;
    }

    let mut parts = Vec::new();
    if !filter.selected_colors().is_empty() {
        let colors: Vec<String> = filter
            .selected_colors()
            .iter()
            .map(|c| paint(*c, c.as_str()))
            .collect();
        parts.push(format!("colors {}", colors.join(", ")));
    }
    if let UserSelection::User(id) = filter.selected_user() {
        parts.push(format!("user {}", id));
    }

    Some(format!("Filtered by {}", parts.join(" · ")))
}

/// Swatches for the colors present in the calendar.
pub fn color_legend(colors: &[EventColor]) -> Option<String> {
    if colors.is_empty() {
        return None;
    }

    let swatches: Vec<String> = colors
        .iter()
        .map(|c| format!("{} {}", paint(*c, "●"), c.as_str()))
        .collect();
    Some(swatches.join("  "))
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
