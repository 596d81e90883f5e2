// Grid configuration
// The visible week: time range, gridline interval, day subset, display mode

use crate::models::day::{Weekday, DEFAULT_DAYS};
use crate::utils::time::MINUTES_PER_DAY;

/// Configuration of the visible time grid.
///
/// `days` is kept private so its ordering invariant holds by construction:
/// the selected subset always appears in the rotation of the canonical week
/// starting at `week_start`, never in arbitrary user order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub start_minutes: u16,
    pub end_minutes: u16,
    pub grid_lines_minutes: u16,
    pub week_start: Weekday,
    /// Display mode only; never affects stored data.
    pub use12h: bool,
    days: Vec<Weekday>,
}

impl GridConfig {
    pub fn new(
        start_minutes: u16,
        end_minutes: u16,
        grid_lines_minutes: u16,
        week_start: Weekday,
        use12h: bool,
        selected_days: &[Weekday],
    ) -> Self {
        let mut config = Self {
            start_minutes,
            end_minutes,
            grid_lines_minutes,
            week_start,
            use12h,
            days: Vec::new(),
        };
        config.set_days(selected_days);
        config
    }

    /// Selected days, in week-start rotation order.
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// Replace the day subset. Ordering is re-derived from the canonical
    /// rotation; duplicates collapse.
    pub fn set_days(&mut self, selected: &[Weekday]) {
        self.days = Weekday::week_starting(self.week_start)
            .into_iter()
            .filter(|day| selected.contains(day))
            .collect();
    }

    /// Change the week anchor and re-order the current selection around it.
    pub fn set_week_start(&mut self, week_start: Weekday) {
        self.week_start = week_start;
        let selected = self.days.clone();
        self.set_days(&selected);
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.end_minutes <= self.start_minutes {
            return Err("Grid end must be after start.".to_string());
        }

        if self.end_minutes > MINUTES_PER_DAY {
            return Err("Grid end cannot pass the end of the day.".to_string());
        }

        if self.grid_lines_minutes == 0 {
            return Err("Gridline interval must be at least one minute.".to_string());
        }

        if self.days.is_empty() {
            return Err("Select at least one day.".to_string());
        }

        Ok(())
    }

    /// Whether `[start, end)` lies inside the visible time range.
    pub fn contains_interval(&self, start: u16, end: u16) -> bool {
        start >= self.start_minutes && end <= self.end_minutes
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(0, 1439, 30, Weekday::Mon, true, &DEFAULT_DAYS)
    }
}
