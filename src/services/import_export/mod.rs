//! Versioned export envelope and defensive import normalization.
//!
//! Export writes a strict, versioned shape. Import works the other way
//! around: externally supplied JSON is coerced field-by-field against a
//! declared expected shape, so a half-broken file still imports whatever is
//! usable instead of failing outright.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlannerError, PlannerResult};
use crate::models::day::Weekday;
use crate::models::event::{Event, DEFAULT_COLOR};
use crate::models::grid::GridConfig;
use crate::utils::time::{to_input_string, MINUTES_PER_DAY};

/// Current export file format.
pub const EXPORT_VERSION: u32 = 1;

/// Settings snapshot as written to export files.
///
/// Note `gridLinesMinutes`: the export schema and the persisted-settings
/// schema (`gridLines`) spell this field differently. Both are historical
/// formats and are supported verbatim, not treated as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub use12h: bool,
    pub week_start: Weekday,
    pub grid_start: String,
    pub grid_end: String,
    pub grid_lines_minutes: u16,
    pub days: Vec<Weekday>,
}

/// Human-downloadable export envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub version: u32,
    pub exported_at: String,
    pub settings: ExportSettings,
    pub events: Vec<Event>,
}

/// Build the export envelope for the current store and configuration.
pub fn export_payload(events: &[Event], config: &GridConfig) -> ExportPayload {
    ExportPayload {
        version: EXPORT_VERSION,
        exported_at: Local::now().to_rfc3339(),
        settings: ExportSettings {
            use12h: config.use12h,
            week_start: config.week_start,
            grid_start: to_input_string(config.start_minutes, config.use12h, false),
            grid_end: to_input_string(config.end_minutes, config.use12h, true),
            grid_lines_minutes: config.grid_lines_minutes,
            days: config.days().to_vec(),
        },
        events: events.to_vec(),
    }
}

/// Settings recovered from an import. Each field is independently optional:
/// the absence (or rejection) of one never invalidates the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedSettings {
    pub use12h: Option<bool>,
    pub week_start: Option<Weekday>,
    pub grid_start: Option<String>,
    pub grid_end: Option<String>,
    pub grid_lines_minutes: Option<u16>,
    pub days: Option<Vec<Weekday>>,
}

/// Result of normalizing an external payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedImport {
    pub events: Vec<Event>,
    pub settings: Option<ImportedSettings>,
}

/// Validate and coerce an externally supplied payload.
///
/// The top level must be an object carrying an `events` array; anything
/// else aborts the whole import. Individual event entries are coerced
/// field-by-field and silently dropped when unusable (empty title or
/// `end <= start`).
pub fn normalize_import(raw: &Value) -> PlannerResult<NormalizedImport> {
    let Some(payload) = raw.as_object() else {
        return Err(PlannerError::Import("not a JSON object".to_string()));
    };

    let Some(entries) = payload.get("events").and_then(Value::as_array) else {
        return Err(PlannerError::Import("missing events array".to_string()));
    };

    let events = coerce_event_entries(entries);

    let settings = payload
        .get("settings")
        .and_then(Value::as_object)
        .map(|s| ImportedSettings {
            use12h: s.get("use12h").and_then(Value::as_bool),
            week_start: s
                .get("weekStart")
                .and_then(Value::as_str)
                .and_then(|token| token.parse().ok()),
            grid_start: s
                .get("gridStart")
                .and_then(Value::as_str)
                .map(str::to_string),
            grid_end: s.get("gridEnd").and_then(Value::as_str).map(str::to_string),
            grid_lines_minutes: s.get("gridLinesMinutes").and_then(coerce_minutes),
            days: s.get("days").and_then(Value::as_array).map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|token| token.parse().ok())
                    .collect()
            }),
        });

    Ok(NormalizedImport { events, settings })
}

/// Best-effort coercion of event-shaped records, shared by import and the
/// legacy storage migration. Unusable entries are dropped, not fatal.
pub fn coerce_event_entries(entries: &[Value]) -> Vec<Event> {
    entries.iter().filter_map(coerce_event_entry).collect()
}

fn coerce_event_entry(entry: &Value) -> Option<Event> {
    let record = entry.as_object()?;

    let event = Event {
        id: record
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(Event::new_id),
        title: record
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        day: record
            .get("day")
            .and_then(Value::as_str)
            .and_then(|token| token.parse().ok())
            .unwrap_or(Weekday::Mon),
        start: record.get("start").and_then(coerce_minutes).unwrap_or(0),
        end: record.get("end").and_then(coerce_minutes).unwrap_or(0),
        color: record
            .get("color")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_COLOR)
            .to_string(),
    };

    (!event.title.is_empty() && event.end > event.start).then_some(event)
}

fn coerce_minutes(value: &Value) -> Option<u16> {
    let n = value.as_f64()?;
    if !n.is_finite() || !(0.0..=f64::from(MINUTES_PER_DAY)).contains(&n) {
        return None;
    }
    Some(n as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::day::DEFAULT_DAYS;
    use crate::models::event::EventDraft;

    fn sample_config() -> GridConfig {
        GridConfig::new(480, 1080, 30, Weekday::Mon, true, &DEFAULT_DAYS)
    }

    #[test]
    fn export_envelope_shape() {
        let events = vec![EventDraft::new("Gym", Weekday::Wed, 540, 600).into_event("e1".into())];
        let payload = export_payload(&events, &sample_config());

        assert_eq!(payload.version, 1);
        assert!(!payload.exported_at.is_empty());
        assert_eq!(payload.settings.grid_start, "8:00 AM");
        assert_eq!(payload.settings.grid_end, "6:00 PM");
        assert_eq!(payload.settings.grid_lines_minutes, 30);
        assert_eq!(payload.events, events);

        let json = serde_json::to_value(&payload).unwrap();
        let settings = json.get("settings").and_then(Value::as_object).unwrap();
        assert!(settings.contains_key("gridLinesMinutes"));
        assert!(!settings.contains_key("gridLines"));
        assert!(json.get("exportedAt").is_some());
    }

    #[test]
    fn export_round_trips_through_import() {
        let events = vec![
            EventDraft::new("Gym", Weekday::Wed, 540, 600).into_event("e1".into()),
            EventDraft::new("Call", Weekday::Fri, 600, 660).into_event("e2".into()),
        ];
        let payload = export_payload(&events, &sample_config());
        let raw = serde_json::to_value(&payload).unwrap();

        let normalized = normalize_import(&raw).unwrap();
        assert_eq!(normalized.events, events);

        let settings = normalized.settings.unwrap();
        assert_eq!(settings.use12h, Some(true));
        assert_eq!(settings.week_start, Some(Weekday::Mon));
        assert_eq!(settings.grid_lines_minutes, Some(30));
        assert_eq!(settings.days, Some(DEFAULT_DAYS.to_vec()));
    }

    #[test]
    fn non_object_payload_is_an_import_error() {
        for raw in [json!([1, 2, 3]), json!("text"), json!(42), json!(null)] {
            assert!(matches!(
                normalize_import(&raw),
                Err(PlannerError::Import(_))
            ));
        }
    }

    #[test]
    fn missing_events_array_is_an_import_error() {
        let raw = json!({"version": 1, "settings": {}});
        assert!(matches!(
            normalize_import(&raw),
            Err(PlannerError::Import(_))
        ));
        let raw = json!({"events": "not an array"});
        assert!(matches!(
            normalize_import(&raw),
            Err(PlannerError::Import(_))
        ));
    }

    #[test]
    fn malformed_entries_are_dropped_not_fatal() {
        let raw = json!({
            "events": [
                {"title": "", "start": 0, "end": 60},
                {"title": "X", "start": 10, "end": 5},
                {"title": "Y", "start": 0, "end": 30},
            ]
        });
        let normalized = normalize_import(&raw).unwrap();
        assert_eq!(normalized.events.len(), 1);
        assert_eq!(normalized.events[0].title, "Y");
    }

    #[test]
    fn missing_fields_get_defaults() {
        let raw = json!({"events": [{"title": "Y", "end": 30}]});
        let normalized = normalize_import(&raw).unwrap();
        let event = &normalized.events[0];
        assert!(!event.id.is_empty());
        assert_eq!(event.day, Weekday::Mon);
        assert_eq!(event.start, 0);
        assert_eq!(event.color, DEFAULT_COLOR);
    }

    #[test]
    fn out_of_range_minutes_fall_back_to_zero() {
        let raw = json!({
            "events": [
                {"title": "A", "start": -5, "end": 60},
                {"title": "B", "start": 0, "end": 9000},
            ]
        });
        let normalized = normalize_import(&raw).unwrap();
        // A survives with start coerced to 0; B's end falls to 0 and the
        // entry fails the end > start filter.
        assert_eq!(normalized.events.len(), 1);
        assert_eq!(normalized.events[0].title, "A");
        assert_eq!(normalized.events[0].start, 0);
    }

    #[test]
    fn non_entry_values_are_skipped() {
        let raw = json!({"events": [null, 7, "x", {"title": "Y", "start": 0, "end": 30}]});
        let normalized = normalize_import(&raw).unwrap();
        assert_eq!(normalized.events.len(), 1);
    }

    #[test]
    fn settings_fields_are_independent() {
        let raw = json!({
            "events": [],
            "settings": {
                "weekStart": "Someday",
                "gridLinesMinutes": 45,
                "days": ["Mon", "Funday", "Wed"],
            }
        });
        let settings = normalize_import(&raw).unwrap().settings.unwrap();
        // Bad weekStart is rejected on its own; the rest still lands.
        assert_eq!(settings.week_start, None);
        assert_eq!(settings.grid_lines_minutes, Some(45));
        assert_eq!(settings.days, Some(vec![Weekday::Mon, Weekday::Wed]));
        assert_eq!(settings.use12h, None);
        assert_eq!(settings.grid_start, None);
    }

    #[test]
    fn absent_settings_block_is_fine() {
        let raw = json!({"events": []});
        let normalized = normalize_import(&raw).unwrap();
        assert!(normalized.settings.is_none());
    }
}
