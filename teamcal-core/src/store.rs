//! The calendar store: one instance per mounted scope (a team page, an
//! organization-wide view).
//!
//! It owns the canonical event list, the filter selection, the view state and
//! the display settings. The visible (filtered) list is re-derived from the
//! canonical list and the filter inside every mutation, so a read never sees
//! one updated without the other. Listeners are called after that.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::collection::EventCollection;
use crate::error::CalendarResult;
use crate::event::{Event, EventColor, EventId, EventRecord, EventUser};
use crate::filter::{EventFilter, UserSelection, derive_filtered};
use crate::settings::{
    AgendaGroupBy, BadgeVariant, CalendarSettings, load_settings, save_settings,
};
use crate::storage::SettingsStorage;
use crate::view::{CalendarView, Direction, ViewState};

/// What part of the store changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarChange {
    Events,
    Filter,
    View,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(CalendarChange)>;

pub struct CalendarStore<S: SettingsStorage> {
    events: EventCollection,
    visible: Vec<Event>,
    filter: EventFilter,
    view_state: ViewState,
    settings: CalendarSettings,
    storage: S,
    settings_key: String,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: SettingsStorage> CalendarStore<S> {
    /// Read the stored settings once and start at `today` in the stored view.
    pub fn new(storage: S, settings_key: &str, today: NaiveDate) -> Self {
        Self::with_defaults(storage, settings_key, today, &CalendarSettings::default())
    }

    pub fn with_defaults(
        storage: S,
        settings_key: &str,
        today: NaiveDate,
        defaults: &CalendarSettings,
    ) -> Self {
        let settings = load_settings(&storage, settings_key, defaults);

        CalendarStore {
            events: EventCollection::default(),
            visible: Vec::new(),
            filter: EventFilter::default(),
            view_state: ViewState::new(today, settings.view),
            settings,
            storage,
            settings_key: settings_key.to_string(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Events passing the active filters.
    pub fn events(&self) -> &[Event] {
        &self.visible
    }

    /// Every event in scope, ignoring filters.
    pub fn all_events(&self) -> &[Event] {
        self.events.as_slice()
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.events.get(id)
    }

    pub fn users(&self) -> Vec<EventUser> {
        self.events.users()
    }

    /// Colors present in the calendar, for the legend. Ignores filters.
    pub fn colors(&self) -> Vec<EventColor> {
        self.events.colors()
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    pub fn selected_colors(&self) -> &BTreeSet<EventColor> {
        self.filter.selected_colors()
    }

    pub fn selected_user(&self) -> &UserSelection {
        self.filter.selected_user()
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.view_state.selected_date()
    }

    pub fn view(&self) -> CalendarView {
        self.view_state.view()
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Event mutations
    // =========================================================================

    /// Replace every event (initial fetch or scope change).
    pub fn initialize(&mut self, events: Vec<Event>) {
        tracing::debug!(count = events.len(), "initializing calendar events");
        self.events.initialize(events);
        self.refresh(CalendarChange::Events);
    }

    pub fn add_event(&mut self, event: Event) {
        tracing::debug!(event_id = %event.id, "adding event");
        self.events.add(event);
        self.refresh(CalendarChange::Events);
    }

    /// Replace the event with the same id. Unknown ids are ignored.
    pub fn update_event(&mut self, event: Event) {
        let event_id = event.id.clone();
        if self.events.update(event) {
            tracing::debug!(event_id = %event_id, "updated event");
            self.refresh(CalendarChange::Events);
        } else {
            tracing::debug!(event_id = %event_id, "update for unknown event ignored");
        }
    }

    /// Normalize an upstream record, then update. Bad dates are rejected
    /// before anything changes.
    pub fn update_record(&mut self, record: EventRecord) -> CalendarResult<()> {
        let event = record.normalize()?;
        self.update_event(event);
        Ok(())
    }

    /// Remove the event with this id. Unknown ids are ignored.
    pub fn remove_event(&mut self, id: &EventId) {
        if self.events.remove(id) {
            tracing::debug!(event_id = %id, "removed event");
            self.refresh(CalendarChange::Events);
        } else {
            tracing::debug!(event_id = %id, "remove for unknown event ignored");
        }
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Returns whether the color is selected afterwards.
    pub fn toggle_color_filter(&mut self, color: EventColor) -> bool {
        let selected = self.filter.toggle_color(color);
        tracing::debug!(%color, selected, "toggled color filter");
        self.refresh(CalendarChange::Filter);
        selected
    }

    pub fn select_user_filter(&mut self, selection: impl Into<UserSelection>) {
        let selection = selection.into();
        tracing::debug!(user = %selection, "selected user filter");
        self.filter.select_user(selection);
        self.refresh(CalendarChange::Filter);
    }

    /// Reset both filter dimensions; the visible list becomes the full list.
    pub fn clear_filter(&mut self) {
        tracing::debug!("cleared filters");
        self.filter.clear();
        self.refresh(CalendarChange::Filter);
    }

    // =========================================================================
    // View state and settings
    // =========================================================================

    pub fn set_selected_date(&mut self, date: Option<NaiveDate>) {
        if self.view_state.set_selected_date(date) {
            self.notify(CalendarChange::View);
        }
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.view_state.navigate(direction);
        self.notify(CalendarChange::View);
    }

    pub fn set_view(&mut self, view: CalendarView) {
        tracing::debug!(%view, "set view");
        self.view_state.set_view(view);
        self.settings.view = view;
        self.persist_settings();
        self.notify(CalendarChange::View);
    }

    /// Flip between 24-hour and 12-hour display.
    pub fn toggle_time_format(&mut self) {
        self.settings.use_24_hour_format = !self.settings.use_24_hour_format;
        tracing::debug!(use_24_hour_format = self.settings.use_24_hour_format, "toggled time format");
        self.persist_settings();
        self.notify(CalendarChange::Settings);
    }

    pub fn set_badge_variant(&mut self, variant: BadgeVariant) {
        tracing::debug!(%variant, "set badge variant");
        self.settings.badge_variant = variant;
        self.persist_settings();
        self.notify(CalendarChange::Settings);
    }

    pub fn set_agenda_mode_group_by(&mut self, group_by: AgendaGroupBy) {
        tracing::debug!(%group_by, "set agenda grouping");
        self.settings.agenda_mode_group_by = group_by;
        self.persist_settings();
        self.notify(CalendarChange::Settings);
    }

    // =========================================================================
    // Change notification
    // =========================================================================

    pub fn subscribe(&mut self, listener: impl FnMut(CalendarChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn refresh(&mut self, change: CalendarChange) {
        self.visible = derive_filtered(self.events.as_slice(), &self.filter);
        self.notify(change);
    }

    fn persist_settings(&self) {
        save_settings(&self.storage, &self.settings_key, &self.settings);
    }

    fn notify(&mut self, change: CalendarChange) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(change);
        }
    }
}
