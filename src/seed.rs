//! Loading the event seed exported from the events endpoint.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::Value;
use teamcal_core::{Event, EventRecord};

/// Records that could not be turned into events, with the reason.
pub struct Rejected {
    pub index: usize,
    pub reason: String,
}

/// Read and normalize a seed file. Bad records are reported and skipped.
pub async fn load(path: &Path) -> Result<Vec<Event>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;

    let (events, rejected) =
        parse(&content).with_context(|| format!("Could not parse {}", path.display()))?;

    for r in &rejected {
        eprintln!(
            "{} skipping record #{}: {}",
            "warning:".yellow(),
            r.index,
            r.reason
        );
    }

    Ok(events)
}

/// Accepts either a bare array of records or an `{"events": [...]}` envelope.
pub fn parse(content: &str) -> Result<(Vec<Event>, Vec<Rejected>)> {
    let value: Value = serde_json::from_str(content)?;

    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("events") {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!("Expected an array of events or an object with an \"events\" array"),
        },
        _ => anyhow::bail!("Expected an array of events or an object with an \"events\" array"),
    };

    let mut events = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for (index, raw) in records.into_iter().enumerate() {
        let normalized = serde_json::from_value::<EventRecord>(raw)
            .map_err(|e| e.to_string())
            .and_then(|record| record.normalize().map_err(|e| e.to_string()));

        match normalized {
            Ok(event) => events.push(event),
            Err(reason) => rejected.push(Rejected { index, reason }),
        }
    }

    tracing::debug!(loaded = events.len(), rejected = rejected.len(), "parsed event seed");

    Ok((events, rejected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let (events, rejected) = parse(
            r#"[{"id": 1, "title": "Practice", "startDate": "2024-01-01T10:00:00Z", "endDate": "2024-01-01T11:00:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 1);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_parse_envelope_skips_bad_records() {
        let (events, rejected) = parse(
            r#"{"events": [
                {"id": 1, "startDate": "2024-01-01", "endDate": "2024-01-01"},
                {"id": 2, "startDate": "soon", "endDate": "2024-01-01"},
                {"title": "no id", "startDate": "2024-01-01", "endDate": "2024-01-01"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(events.len(), 1);
        let indexes: Vec<usize> = rejected.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![1, 2]);
        assert!(rejected[0].reason.contains("startDate"));
    }

    #[test]
    fn test_parse_keeps_minute_precision_timestamps() {
        let (events, rejected) = parse(
            r#"[{"id": 1, "startDate": "2024-01-01T10:00Z", "endDate": "2024-01-01T12:00+01:00"}]"#,
        )
        .unwrap();
        assert!(rejected.is_empty());
        assert_eq!(events[0].duration(), chrono::Duration::hours(1));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(parse(r#"{"data": []}"#).is_err());
        assert!(parse("42").is_err());
        assert!(parse("not json").is_err());
    }
}
