//! Ownership of the store for one mounted page or session.

use crate::error::{CalendarError, CalendarResult};
use crate::storage::SettingsStorage;
use crate::store::CalendarStore;

/// Holds at most one store. Accessing it while nothing is mounted is a
/// programming error and is reported as [`CalendarError::NotMounted`].
pub struct CalendarScope<S: SettingsStorage> {
    store: Option<CalendarStore<S>>,
}

impl<S: SettingsStorage> Default for CalendarScope<S> {
    fn default() -> Self {
        CalendarScope { store: None }
    }
}

impl<S: SettingsStorage> CalendarScope<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a store, returning the one it replaces (if any).
    pub fn mount(&mut self, store: CalendarStore<S>) -> Option<CalendarStore<S>> {
        tracing::debug!("mounting calendar scope");
        self.store.replace(store)
    }

    /// Drop the mounted store and hand it back. Its events go with it.
    pub fn unmount(&mut self) -> Option<CalendarStore<S>> {
        tracing::debug!("unmounting calendar scope");
        self.store.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.store.is_some()
    }

    pub fn calendar(&self) -> CalendarResult<&CalendarStore<S>> {
        self.store.as_ref().ok_or(CalendarError::NotMounted)
    }

    pub fn calendar_mut(&mut self) -> CalendarResult<&mut CalendarStore<S>> {
        self.store.as_mut().ok_or(CalendarError::NotMounted)
    }
}
