//! Display mode, anchor date, and the date arithmetic the views need.

use chrono::{Datelike, DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::datetime::start_of_day;
use crate::error::CalendarError;
use crate::event::{Event, EventColor};
use crate::settings::AgendaGroupBy;

/// Active display mode. Any view can switch to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    Week,
    #[default]
    Month,
    Agenda,
}

impl CalendarView {
    pub const ALL: [CalendarView; 4] = [
        CalendarView::Day,
        CalendarView::Week,
        CalendarView::Month,
        CalendarView::Agenda,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarView::Day => "day",
            CalendarView::Week => "week",
            CalendarView::Month => "month",
            CalendarView::Agenda => "agenda",
        }
    }
}

impl FromStr for CalendarView {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        CalendarView::ALL
            .into_iter()
            .find(|v| v.as_str() == lowered)
            .ok_or_else(|| CalendarError::validation("view", format!("unknown view '{s}'")))
    }
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Anchor date plus display mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    selected_date: NaiveDate,
    view: CalendarView,
}

impl ViewState {
    pub fn new(selected_date: NaiveDate, view: CalendarView) -> Self {
        ViewState { selected_date, view }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn view(&self) -> CalendarView {
        self.view
    }

    /// Replace the anchor date. `None` leaves it unchanged.
    pub fn set_selected_date(&mut self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(date) => {
                self.selected_date = date;
                true
            }
            None => false,
        }
    }

    pub fn set_view(&mut self, view: CalendarView) {
        self.view = view;
    }

    pub fn visible_range(&self, week_start: WeekStart) -> DateRange {
        visible_range(self.view, self.selected_date, week_start)
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.selected_date = navigate(self.view, self.selected_date, direction);
    }
}

/// Half-open instant range `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Whole days from `first` up to and excluding `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        DateRange {
            from: start_of_day(first),
            to: start_of_day(last),
        }
    }

    /// Each calendar day the range touches.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let first = self.from.date_naive();
        let last = self.to.date_naive();
        first
            .iter_days()
            .take_while(|d| *d < last)
            .collect()
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The days a view shows around its anchor date.
/// The agenda lists the anchor's month, like the month view.
pub fn visible_range(view: CalendarView, date: NaiveDate, week_start: WeekStart) -> DateRange {
    match view {
        CalendarView::Day => DateRange::days(date, date + Duration::days(1)),
        CalendarView::Week => {
            let offset = match week_start {
                WeekStart::Monday => date.weekday().num_days_from_monday(),
                WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            };
            let first = date - Duration::days(i64::from(offset));
            DateRange::days(first, first + Duration::days(7))
        }
        CalendarView::Month | CalendarView::Agenda => {
            let first = first_of_month(date);
            let next = first
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX);
            DateRange::days(first, next)
        }
    }
}

/// The anchor date one step back or forward in the given view.
pub fn navigate(view: CalendarView, date: NaiveDate, direction: Direction) -> NaiveDate {
    let moved = match (view, direction) {
        (CalendarView::Day, Direction::Previous) => date.checked_sub_signed(Duration::days(1)),
        (CalendarView::Day, Direction::Next) => date.checked_add_signed(Duration::days(1)),
        (CalendarView::Week, Direction::Previous) => date.checked_sub_signed(Duration::weeks(1)),
        (CalendarView::Week, Direction::Next) => date.checked_add_signed(Duration::weeks(1)),
        (_, Direction::Previous) => date.checked_sub_months(Months::new(1)),
        (_, Direction::Next) => date.checked_add_months(Months::new(1)),
    };
    moved.unwrap_or(date)
}

fn sort_by_start(events: &mut [&Event]) {
    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
}

/// Events overlapping the range, sorted by start.
pub fn events_in_range<'a>(events: &'a [Event], range: &DateRange) -> Vec<&'a Event> {
    let mut found: Vec<&Event> = events
        .iter()
        .filter(|e| e.overlaps(range.from, range.to))
        .collect();
    sort_by_start(&mut found);
    found
}

/// The events shown in one month-grid cell.
#[derive(Debug)]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    pub visible: Vec<&'a Event>,
    /// How many more events fall on this day than fit in the cell.
    pub hidden_count: usize,
}

pub fn day_cell(events: &[Event], date: NaiveDate, max_visible: usize) -> DayCell<'_> {
    let mut on_day: Vec<&Event> = events.iter().filter(|e| e.occurs_on(date)).collect();
    sort_by_start(&mut on_day);

    let hidden_count = on_day.len().saturating_sub(max_visible);
    on_day.truncate(max_visible);

    DayCell {
        date,
        visible: on_day,
        hidden_count,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AgendaKey {
    Date(NaiveDate),
    Color(EventColor),
}

impl fmt::Display for AgendaKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AgendaKey::Date(d) => write!(f, "{}", d.format("%a %b %-d")),
            AgendaKey::Color(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug)]
pub struct AgendaGroup<'a> {
    pub key: AgendaKey,
    pub events: Vec<&'a Event>,
}

/// Group agenda entries by start date or by color. Groups come out in
/// chronological or palette order; entries within a group by start time.
pub fn group_agenda<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    group_by: AgendaGroupBy,
) -> Vec<AgendaGroup<'a>> {
    let mut groups: BTreeMap<AgendaKey, Vec<&Event>> = BTreeMap::new();

    for event in events {
        let key = match group_by {
            AgendaGroupBy::Date => AgendaKey::Date(event.start.date_naive()),
            AgendaGroupBy::Color => AgendaKey::Color(event.color),
        };
        groups.entry(key).or_default().push(event);
    }

    groups
        .into_iter()
        .map(|(key, mut events)| {
            sort_by_start(&mut events);
            AgendaGroup { key, events }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventId, EventKind};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_event(id: &str, color: EventColor, day: u32, hour: u32) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap();
        Event {
            id: EventId::from(id),
            title: id.to_string(),
            description: None,
            start,
            end: start + Duration::hours(1),
            color,
            user: None,
            kind: EventKind::Event,
            meta: Default::default(),
        }
    }

    #[test]
    fn test_set_selected_date_ignores_none() {
        let mut state = ViewState::new(date(2024, 5, 15), CalendarView::Month);
        assert!(!state.set_selected_date(None));
        assert_eq!(state.selected_date(), date(2024, 5, 15));
        assert!(state.set_selected_date(Some(date(1999, 1, 1))));
        assert_eq!(state.selected_date(), date(1999, 1, 1));
    }

    #[test]
    fn test_any_view_reachable_from_any_view() {
        let mut state = ViewState::new(date(2024, 5, 15), CalendarView::Day);
        for from in CalendarView::ALL {
            for to in CalendarView::ALL {
                state.set_view(from);
                state.set_view(to);
                assert_eq!(state.view(), to);
            }
        }
    }

    #[test]
    fn test_week_range_respects_week_start() {
        // 2024-05-15 is a Wednesday
        let monday = visible_range(CalendarView::Week, date(2024, 5, 15), WeekStart::Monday);
        assert_eq!(monday.from.date_naive(), date(2024, 5, 13));
        assert_eq!(monday.to.date_naive(), date(2024, 5, 20));

        let sunday = visible_range(CalendarView::Week, date(2024, 5, 15), WeekStart::Sunday);
        assert_eq!(sunday.from.date_naive(), date(2024, 5, 12));
        assert_eq!(sunday.dates().len(), 7);
    }

    #[test]
    fn test_month_and_day_ranges() {
        let month = visible_range(CalendarView::Month, date(2024, 2, 10), WeekStart::Monday);
        assert_eq!(month.from.date_naive(), date(2024, 2, 1));
        assert_eq!(month.to.date_naive(), date(2024, 3, 1));
        assert_eq!(month.dates().len(), 29);

        let day = visible_range(CalendarView::Day, date(2024, 2, 10), WeekStart::Monday);
        assert_eq!(day.dates(), vec![date(2024, 2, 10)]);
    }

    #[test]
    fn test_navigate_clamps_month_end() {
        assert_eq!(
            navigate(CalendarView::Month, date(2024, 1, 31), Direction::Next),
            date(2024, 2, 29)
        );
        assert_eq!(
            navigate(CalendarView::Week, date(2024, 1, 3), Direction::Previous),
            date(2023, 12, 27)
        );
        assert_eq!(
            navigate(CalendarView::Day, date(2024, 12, 31), Direction::Next),
            date(2025, 1, 1)
        );
    }

    #[test]
    fn test_day_cell_counts_hidden_events() {
        let events = vec![
            make_event("late", EventColor::Blue, 10, 18),
            make_event("early", EventColor::Blue, 10, 8),
            make_event("mid", EventColor::Red, 10, 12),
            make_event("other-day", EventColor::Red, 11, 12),
        ];

        let cell = day_cell(&events, date(2024, 5, 10), 2);
        let visible: Vec<_> = cell.visible.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(visible, vec!["early", "mid"]);
        assert_eq!(cell.hidden_count, 1);

        let roomy = day_cell(&events, date(2024, 5, 10), 5);
        assert_eq!(roomy.hidden_count, 0);
    }

    #[test]
    fn test_events_in_range_sorted() {
        let events = vec![
            make_event("b", EventColor::Blue, 14, 9),
            make_event("a", EventColor::Blue, 13, 9),
            make_event("outside", EventColor::Blue, 25, 9),
        ];
        let range = visible_range(CalendarView::Week, date(2024, 5, 15), WeekStart::Monday);
        let found: Vec<_> = events_in_range(&events, &range)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(found, vec!["a", "b"]);
    }

    #[test]
    fn test_group_agenda_by_date_and_color() {
        let events = vec![
            make_event("1", EventColor::Red, 11, 9),
            make_event("2", EventColor::Blue, 10, 15),
            make_event("3", EventColor::Red, 10, 9),
        ];

        let by_date = group_agenda(&events, AgendaGroupBy::Date);
        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date[0].key, AgendaKey::Date(date(2024, 5, 10)));
        let first: Vec<_> = by_date[0].events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(first, vec!["3", "2"]);

        let by_color = group_agenda(&events, AgendaGroupBy::Color);
        assert_eq!(by_color[0].key, AgendaKey::Color(EventColor::Blue));
        let red: Vec<_> = by_color[1].events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(red, vec!["3", "1"]);
    }
}
