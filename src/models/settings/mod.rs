// Persisted display settings (schema v1)

use serde::{Deserialize, Serialize};

use crate::models::day::{Weekday, DEFAULT_DAYS};
use crate::models::grid::GridConfig;
use crate::utils::time::{parse_time, to_input_string};

/// Snapshot of the grid's display-relevant fields, stored under the
/// settings key. Field names are the persisted v1 schema, verbatim
/// (`gridLines`, not the export file's `gridLinesMinutes`).
///
/// Missing fields fall back individually; a corrupt value fails the whole
/// snapshot, and the caller falls back to `Settings::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub use12h: bool,
    pub week_start: Weekday,
    pub grid_start: String,
    pub grid_end: String,
    pub grid_lines: u16,
    pub days: Vec<Weekday>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use12h: true,
            week_start: Weekday::Mon,
            grid_start: "12:00 AM".to_string(),
            grid_end: "11:59 PM".to_string(),
            grid_lines: 30,
            days: DEFAULT_DAYS.to_vec(),
        }
    }
}

impl Settings {
    /// Lenient resolution for the load path: unparsable boundary strings
    /// fall back to the full-day range and an empty day list falls back to
    /// the default subset, mirroring how a half-broken snapshot should
    /// still produce a usable grid.
    pub fn to_grid_config(&self) -> GridConfig {
        let start = parse_time(&self.grid_start, false).unwrap_or(0);
        let end = parse_time(&self.grid_end, true).unwrap_or(1439);
        let days: &[Weekday] = if self.days.is_empty() {
            &DEFAULT_DAYS
        } else {
            &self.days
        };
        GridConfig::new(start, end, self.grid_lines, self.week_start, self.use12h, days)
    }

    /// Strict resolution for user-driven reconfiguration: bad input is an
    /// error here, not a silent fallback.
    pub fn try_to_grid_config(&self) -> Result<GridConfig, String> {
        let start =
            parse_time(&self.grid_start, false).ok_or_else(|| "Invalid grid start time.".to_string())?;
        let end =
            parse_time(&self.grid_end, true).ok_or_else(|| "Invalid grid end time.".to_string())?;

        let config = GridConfig::new(
            start,
            end,
            self.grid_lines,
            self.week_start,
            self.use12h,
            &self.days,
        );
        config.validate()?;
        Ok(config)
    }

    /// Snapshot the given configuration in its canonical displayable form.
    pub fn from_grid_config(config: &GridConfig) -> Self {
        Self {
            use12h: config.use12h,
            week_start: config.week_start,
            grid_start: to_input_string(config.start_minutes, config.use12h, false),
            grid_end: to_input_string(config.end_minutes, config.use12h, true),
            grid_lines: config.grid_lines_minutes,
            days: config.days().to_vec(),
        }
    }
}
