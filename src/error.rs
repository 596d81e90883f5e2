// Error taxonomy for core planner operations

use thiserror::Error;

use crate::models::day::Weekday;

/// Errors surfaced by core operations.
///
/// Every variant is recoverable by the user retrying with corrected input;
/// nothing here is fatal, and nothing in the core panics. The presentation
/// layer alone turns these into visible text.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Malformed input: time text, empty title, end before start,
    /// out-of-range event, empty day selection, inverted grid boundaries.
    #[error("{0}")]
    Validation(String),

    /// The candidate interval strictly overlaps an existing event on the
    /// listed day(s). Distinct from generic validation so the UI can phrase
    /// it as a scheduling conflict.
    #[error("Conflict: overlaps an existing event on {}.", day_list(.days))]
    Conflict { days: Vec<Weekday> },

    /// The import payload could not be used at all; the store is unchanged.
    #[error("Import failed: {0}")]
    Import(String),

    /// An edit or delete referenced an id that no longer exists.
    #[error("No event with id {0}")]
    NotFound(String),

    /// Underlying storage failed.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type PlannerResult<T> = Result<T, PlannerError>;

fn day_list(days: &[Weekday]) -> String {
    days.iter()
        .map(|day| day.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
