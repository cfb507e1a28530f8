use std::collections::BTreeSet;

use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use teamcal_core::config::TeamcalConfig;
use teamcal_core::view::{day_cell, events_in_range, group_agenda};
use teamcal_core::{CalendarView, Event, EventColor, UserSelection};

use crate::render::{Render, color_legend, filter_summary, pluralize};

pub struct Options {
    pub date: Option<NaiveDate>,
    pub view: Option<CalendarView>,
    pub colors: Vec<EventColor>,
    pub user: Option<UserSelection>,
}

pub fn run(config: &TeamcalConfig, events: Vec<Event>, options: Options) -> Result<()> {
    let mut store = super::open_store(config);
    store.initialize(events);

    store.set_selected_date(options.date);
    if let Some(view) = options.view {
        store.set_view(view);
    }

    let colors: BTreeSet<EventColor> = options.colors.into_iter().collect();
    for color in colors {
        store.toggle_color_filter(color);
    }
    if let Some(user) = options.user {
        store.select_user_filter(user);
    }

    let range = store.view_state().visible_range(config.week_start);
    let settings = store.settings();
    let in_range = events_in_range(store.events(), &range);

    let last_day = range.dates().last().copied().unwrap_or(store.selected_date());
    println!(
        "{} {} – {} {}",
        store.view().to_string().bold(),
        range.from.format("%b %-d, %Y"),
        last_day.format("%b %-d, %Y"),
        "(UTC)".dimmed()
    );
    if let Some(legend) = color_legend(&store.colors()) {
        println!("{}", legend);
    }
    if let Some(summary) = filter_summary(store.filter()) {
        println!("{}", summary.dimmed());
    }
    println!();

    if in_range.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    match store.view() {
        CalendarView::Agenda => {
            let groups = group_agenda(in_range.iter().copied(), settings.agenda_mode_group_by);
            let rendered: Vec<String> = groups.iter().map(|g| g.render(settings)).collect();
            println!("{}", rendered.join("\n\n"));
        }
        CalendarView::Month => {
            let cells: Vec<String> = range
                .dates()
                .into_iter()
                .map(|date| day_cell(store.events(), date, config.max_events_per_day))
                .filter(|cell| !cell.visible.is_empty() || cell.hidden_count > 0)
                .map(|cell| cell.render(settings))
                .collect();
            println!("{}", cells.join("\n\n"));
        }
        CalendarView::Day | CalendarView::Week => {
            let cells: Vec<String> = range
                .dates()
                .into_iter()
                .map(|date| day_cell(store.events(), date, usize::MAX).render(settings))
                .collect();
            println!("{}", cells.join("\n\n"));
        }
    }

    let hidden = store.all_events().len() - store.events().len();
    println!();
    println!(
        "{}",
        format!(
            "{} {} shown, {} hidden by filters",
            in_range.len(),
            pluralize("event", in_range.len()),
            hidden
        )
        .dimmed()
    );

    Ok(())
}
