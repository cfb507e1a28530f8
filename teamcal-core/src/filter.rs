//! Color and responsible-user filtering.
//!
//! Both dimensions are combined: an event is visible when it passes the color
//! selection AND the user selection. An empty color selection means no color
//! filter at all.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::event::{Event, EventColor, UserId};

/// Which responsible user's events are shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserSelection {
    #[default]
    All,
    User(UserId),
}

impl UserSelection {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            UserSelection::All => true,
            UserSelection::User(id) => event.user_id() == Some(id),
        }
    }
}

impl From<UserId> for UserSelection {
    fn from(id: UserId) -> Self {
        UserSelection::User(id)
    }
}

impl FromStr for UserSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("all") {
            UserSelection::All
        } else {
            UserSelection::User(UserId::from(s))
        })
    }
}

impl fmt::Display for UserSelection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UserSelection::All => write!(f, "all"),
            UserSelection::User(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    selected_colors: BTreeSet<EventColor>,
    selected_user: UserSelection,
}

impl EventFilter {
    pub fn selected_colors(&self) -> &BTreeSet<EventColor> {
        &self.selected_colors
    }

    pub fn selected_user(&self) -> &UserSelection {
        &self.selected_user
    }

    /// Add the color if absent, remove it if present.
    /// Returns whether the color is selected afterwards.
    pub fn toggle_color(&mut self, color: EventColor) -> bool {
        if self.selected_colors.remove(&color) {
            false
        } else {
            self.selected_colors.insert(color);
            true
        }
    }

    pub fn select_user(&mut self, selection: UserSelection) {
        self.selected_user = selection;
    }

    pub fn clear(&mut self) {
        self.selected_colors.clear();
        self.selected_user = UserSelection::All;
    }

    pub fn is_active(&self) -> bool {
        !self.selected_colors.is_empty() || self.selected_user != UserSelection::All
    }

    pub fn matches(&self, event: &Event) -> bool {
        let color_ok =
            self.selected_colors.is_empty() || self.selected_colors.contains(&event.color);
        color_ok && self.selected_user.matches(event)
    }
}

/// The visible subset of `canonical`, in canonical order.
pub fn derive_filtered(canonical: &[Event], filter: &EventFilter) -> Vec<Event> {
    if !filter.is_active() {
        return canonical.to_vec();
    }
    canonical
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}
