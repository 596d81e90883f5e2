// Event model
// Flat schedule entry positioned by weekday and minute-of-day

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::day::Weekday;
use crate::utils::time::MINUTES_PER_DAY;

/// Display color applied when an entry carries none of its own.
pub const DEFAULT_COLOR: &str = "#4f46e5";

/// A single scheduled block.
///
/// `start` and `end` are minutes since midnight; `end == 1440` means the
/// event runs to the end of the day. The id is assigned once at creation
/// and never reused or changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub day: Weekday,
    pub start: u16,
    pub end: u16,
    pub color: String,
}

impl Event {
    /// Mint a fresh opaque id.
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn duration(&self) -> u16 {
        self.end - self.start
    }
}

/// Candidate fields for an add or edit. The store assigns the id on add
/// and preserves it on edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub day: Weekday,
    pub start: u16,
    pub end: u16,
    pub color: String,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, day: Weekday, start: u16, end: u16) -> Self {
        Self {
            title: title.into(),
            day,
            start,
            end,
            color: DEFAULT_COLOR.to_string(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Validate the candidate fields.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.end <= self.start {
            return Err("Event end time must be after start time".to_string());
        }

        if self.end > MINUTES_PER_DAY {
            return Err("Event end time cannot pass the end of the day".to_string());
        }

        Ok(())
    }

    pub(crate) fn into_event(self, id: String) -> Event {
        Event {
            id,
            title: self.title,
            day: self.day,
            start: self.start,
            end: self.end,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_draft() {
        let draft = EventDraft::new("Standup", Weekday::Mon, 540, 600);
        assert!(draft.validate().is_ok());
        assert_eq!(draft.color, DEFAULT_COLOR);
    }

    #[test]
    fn empty_title_rejected() {
        let draft = EventDraft::new("", Weekday::Mon, 540, 600);
        assert_eq!(draft.validate().unwrap_err(), "Event title cannot be empty");
    }

    #[test]
    fn whitespace_title_rejected() {
        let draft = EventDraft::new("   ", Weekday::Mon, 540, 600);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn end_must_follow_start() {
        let draft = EventDraft::new("Standup", Weekday::Mon, 600, 600);
        assert_eq!(
            draft.validate().unwrap_err(),
            "Event end time must be after start time"
        );
        let draft = EventDraft::new("Standup", Weekday::Mon, 600, 540);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn end_of_day_sentinel_is_valid() {
        let draft = EventDraft::new("Night shift", Weekday::Fri, 1380, 1440);
        assert!(draft.validate().is_ok());
        let draft = EventDraft::new("Too far", Weekday::Fri, 1380, 1441);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(Event::new_id(), Event::new_id());
    }

    #[test]
    fn draft_becomes_event_with_given_id() {
        let event = EventDraft::new("Gym", Weekday::Wed, 1080, 1140)
            .with_color("#22c55e")
            .into_event("abc-123".to_string());
        assert_eq!(event.id, "abc-123");
        assert_eq!(event.title, "Gym");
        assert_eq!(event.color, "#22c55e");
        assert_eq!(event.duration(), 60);
    }

    #[test]
    fn event_serializes_flat() {
        let event = EventDraft::new("Gym", Weekday::Wed, 1080, 1140).into_event("e1".to_string());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "e1",
                "title": "Gym",
                "day": "Wed",
                "start": 1080,
                "end": 1140,
                "color": DEFAULT_COLOR,
            })
        );
    }
}
