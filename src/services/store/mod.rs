//! In-memory event collection with conflict-checked mutations.
//!
//! The store is the single source of truth the grid renders from. Every
//! mutation validates first and leaves the collection untouched on failure;
//! persistence is the session's job, layered on top.

use crate::error::{PlannerError, PlannerResult};
use crate::models::day::Weekday;
use crate::models::event::{Event, EventDraft};
use crate::utils::time::overlaps;

/// Ordered collection of schedule events.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

/// Per-day partition of a repeat-day add.
///
/// Repeat adds are deliberately not atomic across days: each target day is
/// evaluated and committed independently, and partial success is reported
/// back distinctly from total failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepeatOutcome {
    pub added: Vec<Weekday>,
    pub skipped: Vec<Weekday>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    /// True iff any event on the candidate's day strictly overlaps it.
    /// `ignore_id` excludes the event being edited from the check, so an
    /// event never conflicts with itself.
    pub fn has_conflict(&self, candidate: &EventDraft, ignore_id: Option<&str>) -> bool {
        self.events.iter().any(|event| {
            if ignore_id.is_some_and(|id| event.id == id) {
                return false;
            }
            event.day == candidate.day
                && overlaps(candidate.start, candidate.end, event.start, event.end)
        })
    }

    /// Append a fresh event built from the candidate.
    pub fn add(&mut self, draft: EventDraft) -> PlannerResult<Event> {
        draft.validate().map_err(PlannerError::Validation)?;

        if self.has_conflict(&draft, None) {
            return Err(PlannerError::Conflict {
                days: vec![draft.day],
            });
        }

        let event = draft.into_event(Event::new_id());
        self.events.push(event.clone());
        Ok(event)
    }

    /// Replace every field of an existing event except its id.
    pub fn update(&mut self, id: &str, draft: EventDraft) -> PlannerResult<Event> {
        let position = self
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or_else(|| PlannerError::NotFound(id.to_string()))?;

        draft.validate().map_err(PlannerError::Validation)?;

        if self.has_conflict(&draft, Some(id)) {
            return Err(PlannerError::Conflict {
                days: vec![draft.day],
            });
        }

        let event = draft.into_event(self.events[position].id.clone());
        self.events[position] = event.clone();
        Ok(event)
    }

    /// Remove an event by id, returning it.
    pub fn remove(&mut self, id: &str) -> PlannerResult<Event> {
        let position = self
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or_else(|| PlannerError::NotFound(id.to_string()))?;

        Ok(self.events.remove(position))
    }

    /// Drop every event, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.events.len();
        self.events.clear();
        removed
    }

    /// Attempt an independent add of the candidate on every target day.
    ///
    /// A conflict on one day does not block the others. When every day is
    /// skipped the whole operation fails with a conflict listing them all.
    pub fn add_repeating(
        &mut self,
        draft: &EventDraft,
        target_days: &[Weekday],
    ) -> PlannerResult<RepeatOutcome> {
        draft.validate().map_err(PlannerError::Validation)?;

        let mut outcome = RepeatOutcome::default();
        for &day in target_days {
            let candidate = EventDraft { day, ..draft.clone() };
            if self.has_conflict(&candidate, None) {
                outcome.skipped.push(day);
            } else {
                self.events.push(candidate.into_event(Event::new_id()));
                outcome.added.push(day);
            }
        }

        if outcome.added.is_empty() && !outcome.skipped.is_empty() {
            return Err(PlannerError::Conflict {
                days: outcome.skipped,
            });
        }

        Ok(outcome)
    }
}
