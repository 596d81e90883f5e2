//! Planner session: the application-facing command surface.
//!
//! Owns the event store, the grid configuration and the backing storage.
//! Whatever UI shell exists calls these handlers; the core never depends on
//! a specific event loop or callback mechanism. Every command validates,
//! mutates in memory and persists before reporting success, so a crash
//! loses at most the operation in flight.

use std::path::Path;

use crate::error::{PlannerError, PlannerResult};
use crate::models::day::Weekday;
use crate::models::event::{Event, EventDraft};
use crate::models::grid::GridConfig;
use crate::models::settings::Settings;
use crate::services::image;
use crate::services::import_export::{self, ExportPayload, ImportedSettings};
use crate::services::layout::{self, GridGeometry, GridMetrics};
use crate::services::storage::{self, KeyValueStore};
use crate::services::store::{EventStore, RepeatOutcome};
use crate::utils::time::parse_time;

pub struct PlannerSession {
    store: EventStore,
    config: GridConfig,
    storage: Box<dyn KeyValueStore>,
}

impl PlannerSession {
    /// Open a session over the given storage: settings fall back to
    /// defaults, events to an empty collection, so startup never fails on
    /// bad data.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let mut session = Self {
            store: EventStore::new(),
            config: GridConfig::default(),
            storage,
        };
        session.reload();
        session
    }

    /// Drop in-memory state and load it again from storage.
    pub fn reload(&mut self) {
        let settings = storage::load_settings(self.storage.as_ref());
        let mut config = settings.to_grid_config();
        if let Err(reason) = config.validate() {
            log::warn!("persisted settings produce an invalid grid ({reason}), using defaults");
            config = Settings::default().to_grid_config();
        }

        let events = storage::load_events(self.storage.as_ref());
        log::info!(
            "planner session loaded: {} events, {} visible days",
            events.len(),
            config.days().len()
        );

        self.store = EventStore::from_events(events);
        self.config = config;
    }

    pub fn events(&self) -> &[Event] {
        self.store.events()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Lay out the current configuration at the given pixel metrics.
    pub fn layout(&self, metrics: GridMetrics) -> GridGeometry {
        layout::layout(&self.config, metrics)
    }

    /// Add a single event.
    pub fn add_event(&mut self, draft: EventDraft) -> PlannerResult<Event> {
        draft.validate().map_err(PlannerError::Validation)?;
        self.check_in_range(&draft)?;

        let event = self.store.add(draft)?;
        self.persist_events()?;
        log::info!("added event {} on {}", event.id, event.day);
        Ok(event)
    }

    /// Replace every field of an existing event except its id.
    pub fn update_event(&mut self, id: &str, draft: EventDraft) -> PlannerResult<Event> {
        draft.validate().map_err(PlannerError::Validation)?;
        self.check_in_range(&draft)?;

        let event = self.store.update(id, draft)?;
        self.persist_events()?;
        log::info!("updated event {id}");
        Ok(event)
    }

    /// Remove an event by id.
    pub fn remove_event(&mut self, id: &str) -> PlannerResult<Event> {
        let event = self.store.remove(id)?;
        self.persist_events()?;
        log::info!("removed event {id}");
        Ok(event)
    }

    /// Add the candidate independently on every target day.
    ///
    /// Days outside the visible subset are ignored; with no usable target
    /// day the candidate's own day is used. New events only: edits stay
    /// single-day.
    pub fn add_repeating(
        &mut self,
        draft: EventDraft,
        target_days: &[Weekday],
    ) -> PlannerResult<RepeatOutcome> {
        draft.validate().map_err(PlannerError::Validation)?;
        self.check_in_range(&draft)?;

        let mut days: Vec<Weekday> = target_days
            .iter()
            .copied()
            .filter(|day| self.config.days().contains(day))
            .collect();
        if days.is_empty() {
            days.push(draft.day);
        }

        let outcome = self.store.add_repeating(&draft, &days)?;
        if !outcome.added.is_empty() {
            self.persist_events()?;
        }
        log::info!(
            "repeat add: {} day(s) added, {} skipped",
            outcome.added.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    /// Delete every event.
    pub fn clear_all(&mut self) -> PlannerResult<usize> {
        let removed = self.store.clear();
        self.persist_events()?;
        log::info!("cleared {removed} events");
        Ok(removed)
    }

    /// Reconfigure the visible grid from settings-shaped input and persist
    /// the snapshot. Bad boundary strings and empty day selections are
    /// validation errors; the previous configuration stays in place.
    pub fn apply_grid_settings(&mut self, settings: &Settings) -> PlannerResult<()> {
        let config = settings
            .try_to_grid_config()
            .map_err(PlannerError::Validation)?;
        self.config = config;
        self.persist_settings()?;
        Ok(())
    }

    /// Import a serialized export file.
    ///
    /// A parse failure or missing events array aborts with an import error
    /// and leaves the store untouched. On success events replace the
    /// collection wholesale; settings apply field-by-field, keeping the
    /// previous configuration if the combination fails validation.
    pub fn import_json(&mut self, raw: &str) -> PlannerResult<usize> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|err| PlannerError::Import(err.to_string()))?;
        let normalized = import_export::normalize_import(&value)?;

        let imported = normalized.events.len();
        self.store = EventStore::from_events(normalized.events);
        self.persist_events()?;

        if let Some(settings) = normalized.settings {
            self.apply_imported_settings(&settings);
            self.persist_settings()?;
        }

        log::info!("imported {imported} events");
        Ok(imported)
    }

    fn apply_imported_settings(&mut self, settings: &ImportedSettings) {
        let mut config = self.config.clone();

        if let Some(week_start) = settings.week_start {
            config.set_week_start(week_start);
        }
        if let Some(use12h) = settings.use12h {
            config.use12h = use12h;
        }
        if let Some(interval) = settings.grid_lines_minutes {
            if interval > 0 {
                config.grid_lines_minutes = interval;
            }
        }
        if let Some(days) = &settings.days {
            if !days.is_empty() {
                config.set_days(days);
            }
        }
        if let Some(text) = &settings.grid_start {
            if let Some(minutes) = parse_time(text, false) {
                config.start_minutes = minutes;
            }
        }
        if let Some(text) = &settings.grid_end {
            if let Some(minutes) = parse_time(text, true) {
                config.end_minutes = minutes;
            }
        }

        match config.validate() {
            Ok(()) => self.config = config,
            Err(reason) => {
                log::warn!("imported settings produce an invalid grid ({reason}), keeping current");
            }
        }
    }

    /// Build the versioned export envelope.
    pub fn export_payload(&self) -> ExportPayload {
        import_export::export_payload(self.store.events(), &self.config)
    }

    /// Serialize the export envelope as pretty JSON, ready for download.
    pub fn export_json(&self) -> PlannerResult<String> {
        serde_json::to_string_pretty(&self.export_payload())
            .map_err(|err| PlannerError::Storage(err.into()))
    }

    /// Rasterize the current grid to a PNG file at `scale`x density.
    pub fn export_png(
        &self,
        path: &Path,
        metrics: GridMetrics,
        scale: u32,
    ) -> PlannerResult<()> {
        let geometry = self.layout(metrics);
        image::export_png(path, &geometry, self.store.events(), scale)?;
        Ok(())
    }

    fn check_in_range(&self, draft: &EventDraft) -> PlannerResult<()> {
        if !self.config.contains_interval(draft.start, draft.end) {
            return Err(PlannerError::Validation(
                "Event must be inside the visible grid time range.".to_string(),
            ));
        }
        Ok(())
    }

    fn persist_events(&mut self) -> PlannerResult<()> {
        storage::save_events(self.storage.as_mut(), self.store.events())?;
        Ok(())
    }

    fn persist_settings(&mut self) -> PlannerResult<()> {
        let snapshot = Settings::from_grid_config(&self.config);
        storage::save_settings(self.storage.as_mut(), &snapshot)?;
        Ok(())
    }
}
