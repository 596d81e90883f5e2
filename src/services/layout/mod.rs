//! Grid layout engine.
//!
//! Maps the configured time range and day set into row/column geometry and
//! pixel coordinates back into (day, minute) for click-to-create. Stateless:
//! everything derives from a `GridConfig` snapshot plus pixel metrics.
//!
//! Rows are a fixed 15-minute quantum regardless of the user-configured
//! "major gridline" interval; major rows are a derived annotation, which is
//! what lets gridline spacings like 20 or 45 minutes work without
//! non-uniform row heights.

use crate::models::day::Weekday;
use crate::models::event::Event;
use crate::models::grid::GridConfig;
use crate::utils::time::{format_time, BASE_STEP_MIN, SNAP_STEP_MIN};

/// Pixel sizing knobs for the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub row_height: f32,
    pub header_height: f32,
    pub time_col_width: f32,
    pub day_col_width: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            row_height: 24.0,
            header_height: 52.0,
            time_col_width: 70.0,
            day_col_width: 140.0,
        }
    }
}

/// One 15-minute display row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub start_minute: u16,
    /// Flagged for stronger visual emphasis at the configured interval.
    pub major: bool,
    /// Time label, present on full-hour rows.
    pub label: Option<String>,
}

/// A day column's horizontal extent.
#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub day: Weekday,
    pub x: f32,
    pub width: f32,
}

/// Computed geometry for one `GridConfig` snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    pub start_minutes: u16,
    pub end_minutes: u16,
    pub rows: Vec<GridRow>,
    pub columns: Vec<DayColumn>,
    pub metrics: GridMetrics,
}

/// Screen rectangle for a projected event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Resolved grid position for a clicked point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridHit {
    pub day: Weekday,
    pub minute: u16,
    /// Suggested end for a new event, clamped to the grid range.
    pub proposed_end: u16,
}

/// Inset subtracted from event rectangles for visual separation.
const EVENT_INSET_X: f32 = 6.0;
const EVENT_INSET_Y: f32 = 3.0;
/// Events never render shorter than this, so they stay clickable.
const MIN_EVENT_HEIGHT: f32 = 26.0;
/// Proposed duration for click-to-create.
const DEFAULT_EVENT_MINUTES: u16 = 60;

/// Compute row and column geometry for the given configuration.
pub fn layout(config: &GridConfig, metrics: GridMetrics) -> GridGeometry {
    let total = config.end_minutes.saturating_sub(config.start_minutes).max(1);
    let row_count = total.div_ceil(BASE_STEP_MIN);
    let interval = config.grid_lines_minutes.max(1);

    let mut rows = Vec::with_capacity(row_count as usize);
    for r in 0..row_count {
        let start_minute = config.start_minutes + r * BASE_STEP_MIN;
        let major = (start_minute - config.start_minutes) % interval == 0;
        let label =
            (start_minute % 60 == 0).then(|| format_time(start_minute, config.use12h, false));
        rows.push(GridRow {
            start_minute,
            major,
            label,
        });
    }

    let columns = config
        .days()
        .iter()
        .enumerate()
        .map(|(i, &day)| DayColumn {
            day,
            x: metrics.time_col_width + i as f32 * metrics.day_col_width,
            width: metrics.day_col_width,
        })
        .collect();

    GridGeometry {
        start_minutes: config.start_minutes,
        end_minutes: config.end_minutes,
        rows,
        columns,
        metrics,
    }
}

impl GridGeometry {
    pub fn pixels_per_minute(&self) -> f32 {
        self.metrics.row_height / f32::from(BASE_STEP_MIN)
    }

    /// Total pixel size of the rendered grid.
    pub fn size(&self) -> (f32, f32) {
        let width =
            self.metrics.time_col_width + self.columns.len() as f32 * self.metrics.day_col_width;
        let height =
            self.metrics.header_height + self.rows.len() as f32 * self.metrics.row_height;
        (width, height)
    }

    /// Map an event onto its screen rectangle.
    ///
    /// Returns `None` when the event's day is not a visible column or its
    /// interval does not intersect the visible time range at all.
    pub fn project(&self, event: &Event) -> Option<EventRect> {
        if event.end <= self.start_minutes || event.start >= self.end_minutes {
            return None;
        }

        let column = self.columns.iter().find(|column| column.day == event.day)?;
        let ppm = self.pixels_per_minute();

        let y = self.metrics.header_height
            + (f32::from(event.start) - f32::from(self.start_minutes)) * ppm
            + EVENT_INSET_Y;
        let height =
            (f32::from(event.end - event.start) * ppm - 2.0 * EVENT_INSET_Y).max(MIN_EVENT_HEIGHT);

        Some(EventRect {
            x: column.x + EVENT_INSET_X,
            y,
            width: column.width - 2.0 * EVENT_INSET_X,
            height,
        })
    }

    /// Resolve a pixel point back to (day, minute).
    ///
    /// `None` above the header's bottom edge or outside every day column.
    /// The minute is clamped into the visible range and snapped to the
    /// nearest 5-minute increment.
    pub fn unproject(&self, x: f32, y: f32) -> Option<GridHit> {
        let column = self
            .columns
            .iter()
            .find(|column| x >= column.x && x <= column.x + column.width)?;

        let rel_y = y - self.metrics.header_height;
        if rel_y < 0.0 {
            return None;
        }

        let raw = i32::from(self.start_minutes) + (rel_y / self.pixels_per_minute()).round() as i32;
        let clamped = raw.clamp(
            i32::from(self.start_minutes),
            i32::from(self.end_minutes) - 1,
        );
        let snap = i32::from(SNAP_STEP_MIN);
        let minute = ((clamped + snap / 2) / snap * snap) as u16;

        let proposed_end = (minute + DEFAULT_EVENT_MINUTES).min(self.end_minutes);

        Some(GridHit {
            day: column.day,
            minute,
            proposed_end,
        })
    }
}
