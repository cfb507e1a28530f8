//! Core types for teamcal.
//!
//! This crate provides the in-memory calendar store used by teamcal front-ends:
//! - `event` for normalized events and the raw upstream record shape
//! - `store` for the store itself (events, filters, view state, settings)
//! - `settings` and `storage` for persisted display preferences

pub mod collection;
pub mod config;
pub mod datetime;
pub mod error;
pub mod event;
pub mod filter;
pub mod scope;
pub mod settings;
pub mod storage;
pub mod store;
pub mod view;

pub use error::{CalendarError, CalendarResult};
pub use event::{Event, EventColor, EventId, EventKind, EventRecord, EventUser, UserId};
pub use filter::UserSelection;
pub use store::{CalendarChange, CalendarStore};
pub use view::CalendarView;
