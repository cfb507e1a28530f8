//! Calendar event types.
//!
//! Upstream data arrives as [`EventRecord`]s in whatever shape the REST layer
//! produced (string or numeric ids, loosely formatted dates, missing colors).
//! [`EventRecord::normalize`] turns them into [`Event`]s, which is the only
//! form the store works with.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::datetime::{instant_from_millis, parse_instant, start_of_day};
use crate::error::{CalendarError, CalendarResult};

/// Ids show up as JSON strings from some endpoints and numbers from others.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl RawId {
    fn into_canonical(self) -> String {
        match self {
            RawId::Text(s) => s.trim().to_string(),
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
            // 10.0 and "10" name the same user
            RawId::Float(f) if f.fract() == 0.0 && fits_i64(f) => (f as i64).to_string(),
            RawId::Float(f) => f.to_string(),
        }
    }
}

/// Whether `f` converts to `i64` without saturating.
fn fits_i64(f: f64) -> bool {
    f >= i64::MIN as f64 && f < i64::MAX as f64
}

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| $name(raw.into_canonical()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.trim().to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name::from(s.as_str())
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                $name(n.to_string())
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                $name(n.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Event identifier, stable across updates.
    EventId
);

string_id!(
    /// Identifier of the person responsible for an event.
    UserId
);

/// Category tag from the fixed palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    #[default]
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Orange,
    Gray,
}

impl EventColor {
    /// Palette order, used for legends and color grouping.
    pub const ALL: [EventColor; 7] = [
        EventColor::Blue,
        EventColor::Green,
        EventColor::Red,
        EventColor::Yellow,
        EventColor::Purple,
        EventColor::Orange,
        EventColor::Gray,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventColor::Blue => "blue",
            EventColor::Green => "green",
            EventColor::Red => "red",
            EventColor::Yellow => "yellow",
            EventColor::Purple => "purple",
            EventColor::Orange => "orange",
            EventColor::Gray => "gray",
        }
    }
}

impl FromStr for EventColor {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        EventColor::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered || (lowered == "grey" && *c == EventColor::Gray))
            .ok_or_else(|| CalendarError::validation("color", format!("unknown color '{s}'")))
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What kind of activity an event represents. Only used for labels and icons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Training,
    Practice,
    League,
    Tournament,
    #[default]
    Event,
    /// Facility reservations and anything else the backend invents.
    Other(String),
}

impl EventKind {
    pub fn label(&self) -> &str {
        match self {
            EventKind::Training => "Training",
            EventKind::Practice => "Practice",
            EventKind::League => "League",
            EventKind::Tournament => "Tournament",
            EventKind::Event => "Event",
            EventKind::Other(s) => s,
        }
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "training" => EventKind::Training,
            "practice" => EventKind::Practice,
            "league" => EventKind::League,
            "tournament" => EventKind::Tournament,
            "event" => EventKind::Event,
            _ => EventKind::Other(s),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(s) => s,
            other => other.label().to_ascii_lowercase(),
        }
    }
}

/// The responsible party for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUser {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
}

/// A normalized calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "startDate")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end: DateTime<Utc>,
    pub color: EventColor,
    pub user: Option<EventUser>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Source-specific payload (status, location, facility, coach, raw backend data).
    /// Carried through untouched.
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl Event {
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether the event overlaps the half-open range `[from, to)`.
    /// Zero-length events count when their instant falls inside the range.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        if self.start == self.end {
            return self.start >= from && self.start < to;
        }
        self.start < to && self.end > from
    }

    /// Whether any part of the event falls on the given (UTC) day.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        let day_start = start_of_day(date);
        self.overlaps(day_start, day_start + Duration::days(1))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// A timestamp as the backend sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInstant {
    Millis(i64),
    /// Millisecond timestamps some serializers emit as `1704103200000.0`.
    FractionalMillis(f64),
    Text(String),
}

impl RawInstant {
    fn parse(&self, field: &str) -> CalendarResult<DateTime<Utc>> {
        let parsed = match self {
            RawInstant::Millis(ms) => instant_from_millis(*ms),
            // sub-millisecond precision is truncated
            RawInstant::FractionalMillis(ms) if ms.is_finite() && fits_i64(ms.trunc()) => {
                instant_from_millis(ms.trunc() as i64)
            }
            RawInstant::FractionalMillis(_) => None,
            RawInstant::Text(s) => parse_instant(s),
        };
        parsed.ok_or_else(|| {
            CalendarError::validation(field, format!("'{}' is not a valid date", self))
        })
    }
}

impl fmt::Display for RawInstant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RawInstant::Millis(ms) => write!(f, "{ms}"),
            RawInstant::FractionalMillis(ms) => write!(f, "{ms}"),
            RawInstant::Text(s) => write!(f, "{s}"),
        }
    }
}

/// An event as received from upstream, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: RawInstant,
    pub end_date: RawInstant,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub user: Option<EventUser>,
    #[serde(default, rename = "type")]
    pub kind: Option<EventKind>,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl EventRecord {
    /// Convert into an [`Event`].
    ///
    /// Dates that cannot be parsed are rejected. A missing color falls back to
    /// the default; an unrecognized one does too, with a warning.
    pub fn normalize(self) -> CalendarResult<Event> {
        let start = self.start_date.parse("startDate")?;
        let end = self.end_date.parse("endDate")?;

        let color = match self.color.as_deref() {
            None | Some("") => EventColor::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(event_id = %self.id, color = raw, "unknown event color, using default");
                EventColor::default()
            }),
        };

        Ok(Event {
            id: self.id,
            title: self.title,
            description: self.description,
            start,
            end,
            color,
            user: self.user,
            kind: self.kind.unwrap_or_default(),
            meta: self.meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(value: Value) -> EventRecord {
        serde_json::from_value(value).expect("valid record")
    }

    #[test]
    fn test_ids_normalize_numbers_and_strings() {
        let a: UserId = serde_json::from_value(json!(10)).unwrap();
        let b: UserId = serde_json::from_value(json!("10")).unwrap();
        let c: UserId = serde_json::from_value(json!(10.0)).unwrap();
        let d: UserId = serde_json::from_value(json!(" 10 ")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
        assert_eq!(a, UserId::from(10i64));
        assert_eq!(serde_json::to_value(&a).unwrap(), json!("10"));
    }

    #[test]
    fn test_normalize_full_record() {
        let event = record(json!({
            "id": 1,
            "title": "U12 practice",
            "startDate": "2024-01-01T10:00:00Z",
            "endDate": "2024-01-01T11:30:00+00:00",
            "color": "Green",
            "user": {"id": 10, "name": "Coach Kim"},
            "type": "practice",
            "meta": {"facility": "Field 3"}
        }))
        .normalize()
        .unwrap();

        assert_eq!(event.id, EventId::from("1"));
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(event.duration(), Duration::minutes(90));
        assert_eq!(event.color, EventColor::Green);
        assert_eq!(event.kind, EventKind::Practice);
        assert_eq!(event.user_id(), Some(&UserId::from("10")));
        assert_eq!(event.meta.get("facility"), Some(&json!("Field 3")));
    }

    #[test]
    fn test_normalize_defaults_missing_and_unknown_color() {
        let missing = record(json!({
            "id": "a", "startDate": "2024-01-01", "endDate": "2024-01-01"
        }))
        .normalize()
        .unwrap();
        assert_eq!(missing.color, EventColor::Blue);
        assert_eq!(missing.kind, EventKind::Event);

        let unknown = record(json!({
            "id": "b", "startDate": "2024-01-01", "endDate": "2024-01-01", "color": "teal"
        }))
        .normalize()
        .unwrap();
        assert_eq!(unknown.color, EventColor::default());
    }

    #[test]
    fn test_normalize_accepts_epoch_millis() {
        let event = record(json!({
            "id": 7, "startDate": 1_704_103_200_000i64, "endDate": "2024-01-01T11:00:00Z"
        }))
        .normalize()
        .unwrap();
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_huge_float_ids_stay_distinct() {
        let a: UserId = serde_json::from_value(json!(1e19)).unwrap();
        let b: UserId = serde_json::from_value(json!(2e19)).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, UserId::from("10000000000000000000"));
    }

    #[test]
    fn test_normalize_accepts_fractional_millis() {
        let event = record(json!({
            "id": 8, "startDate": 1_704_103_200_000.0, "endDate": 1_704_106_800_000.9
        }))
        .normalize()
        .unwrap();
        assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap());

        let err = record(json!({"id": 9, "startDate": 1e300, "endDate": 0}))
            .normalize()
            .unwrap_err();
        assert!(matches!(err, CalendarError::Validation { .. }));
    }

    #[test]
    fn test_normalize_rejects_bad_dates() {
        let err = record(json!({
            "id": 1, "startDate": "not a date", "endDate": "2024-01-01"
        }))
        .normalize()
        .unwrap_err();

        match err {
            CalendarError::Validation { field, .. } => assert_eq!(field, "startDate"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_does_not_enforce_chronology() {
        let event = record(json!({
            "id": 1, "startDate": "2024-01-02", "endDate": "2024-01-01"
        }))
        .normalize()
        .unwrap();
        assert!(event.start > event.end);
    }

    #[test]
    fn test_facility_kinds_pass_through() {
        let kind: EventKind = serde_json::from_value(json!("field_reservation")).unwrap();
        assert_eq!(kind, EventKind::Other("field_reservation".to_string()));
        assert_eq!(serde_json::to_value(&kind).unwrap(), json!("field_reservation"));
        assert_eq!(serde_json::to_value(EventKind::League).unwrap(), json!("league"));
    }

    #[test]
    fn test_occurs_on_multi_day_event() {
        let event = record(json!({
            "id": 1, "startDate": "2024-05-10T18:00:00Z", "endDate": "2024-05-12T09:00:00Z"
        }))
        .normalize()
        .unwrap();

        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        assert!(!event.occurs_on(day(9)));
        assert!(event.occurs_on(day(10)));
        assert!(event.occurs_on(day(11)));
        assert!(event.occurs_on(day(12)));
        assert!(!event.occurs_on(day(13)));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("PURPLE".parse::<EventColor>().unwrap(), EventColor::Purple);
        assert_eq!("grey".parse::<EventColor>().unwrap(), EventColor::Gray);
        assert!("teal".parse::<EventColor>().is_err());
    }
}
