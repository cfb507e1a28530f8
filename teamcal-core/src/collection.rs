//! The canonical, unfiltered list of events for one calendar scope.

use std::collections::BTreeSet;

use crate::event::{Event, EventColor, EventId, EventUser};

#[derive(Debug, Clone, Default)]
pub struct EventCollection {
    events: Vec<Event>,
}

impl EventCollection {
    pub fn new(events: Vec<Event>) -> Self {
        EventCollection { events }
    }

    /// Replace the whole list (initial fetch or scope change).
    pub fn initialize(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    pub fn add(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Replace the entry with the same id. Returns false if nothing matched.
    pub fn update(&mut self, event: Event) -> bool {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => {
                *existing = event;
                true
            }
            None => false,
        }
    }

    /// Remove the entry with this id. Returns false if nothing matched.
    pub fn remove(&mut self, id: &EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| &e.id != id);
        self.events.len() != before
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Distinct responsible users, sorted by name then id.
    pub fn users(&self) -> Vec<EventUser> {
        let mut users: Vec<EventUser> = Vec::new();
        for user in self.events.iter().filter_map(|e| e.user.as_ref()) {
            if !users.iter().any(|u| u.id == user.id) {
                users.push(user.clone());
            }
        }
        users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        users
    }

    /// Distinct colors in palette order.
    pub fn colors(&self) -> Vec<EventColor> {
        let present: BTreeSet<EventColor> = self.events.iter().map(|e| e.color).collect();
        present.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, UserId};
    use chrono::{TimeZone, Utc};

    fn make_event(id: &str, color: EventColor, user: Option<(&str, &str)>) -> Event {
        Event {
            id: EventId::from(id),
            title: format!("Event {id}"),
            description: None,
            start: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap(),
            color,
            user: user.map(|(id, name)| EventUser {
                id: UserId::from(id),
                name: name.to_string(),
            }),
            kind: EventKind::Training,
            meta: Default::default(),
        }
    }

    #[test]
    fn test_update_replaces_matching_entry() {
        let mut collection = EventCollection::new(vec![
            make_event("1", EventColor::Blue, None),
            make_event("2", EventColor::Red, None),
        ]);

        let mut changed = make_event("2", EventColor::Green, None);
        changed.title = "Moved".to_string();

        assert!(collection.update(changed));
        assert_eq!(collection.get(&EventId::from("2")).unwrap().title, "Moved");
        assert_eq!(collection.as_slice()[1].color, EventColor::Green);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut collection = EventCollection::new(vec![make_event("1", EventColor::Blue, None)]);
        assert!(!collection.update(make_event("999", EventColor::Red, None)));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.as_slice()[0].color, EventColor::Blue);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut collection = EventCollection::new(vec![
            make_event("1", EventColor::Blue, None),
            make_event("2", EventColor::Red, None),
        ]);

        assert!(collection.remove(&EventId::from("1")));
        let after_first: Vec<_> = collection.iter().map(|e| e.id.clone()).collect();

        assert!(!collection.remove(&EventId::from("1")));
        let after_second: Vec<_> = collection.iter().map(|e| e.id.clone()).collect();

        assert_eq!(after_first, after_second);
        assert_eq!(after_second, vec![EventId::from("2")]);
    }

    #[test]
    fn test_users_are_distinct_and_sorted() {
        let collection = EventCollection::new(vec![
            make_event("1", EventColor::Blue, Some(("20", "Sam"))),
            make_event("2", EventColor::Blue, Some(("10", "Alex"))),
            make_event("3", EventColor::Blue, Some(("20", "Sam"))),
            make_event("4", EventColor::Blue, None),
        ]);

        let users = collection.users();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Alex");
        assert_eq!(users[1].id, UserId::from("20"));
    }

    #[test]
    fn test_colors_in_palette_order() {
        let collection = EventCollection::new(vec![
            make_event("1", EventColor::Orange, None),
            make_event("2", EventColor::Blue, None),
            make_event("3", EventColor::Orange, None),
        ]);
        assert_eq!(collection.colors(), vec![EventColor::Blue, EventColor::Orange]);
    }
}
