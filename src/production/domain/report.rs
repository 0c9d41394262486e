//! Duration report rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder rendered when a joined record no longer exists.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Elapsed time of one completed process instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedDuration {
    /// Part number, or [`UNKNOWN_LABEL`].
    pub part_number: String,
    /// Project name, or [`UNKNOWN_LABEL`].
    pub project_name: String,
    /// Step name.
    pub step_name: String,
    /// Operator username, or [`UNKNOWN_LABEL`].
    pub operator_name: String,
    /// Minutes between start and end, rounded to two decimals.
    pub duration_minutes: f64,
    /// Start timestamp.
    pub start_time: DateTime<Utc>,
    /// End timestamp.
    pub end_time: DateTime<Utc>,
}

/// Returns the minutes between `start` and `end`, rounded to two decimals.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "durations are reported as fractional minutes"
)]
#[must_use]
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let elapsed_ms = (end - start).num_milliseconds() as f64;
    let minutes = elapsed_ms / 60_000.0;
    (minutes * 100.0).round() / 100.0
}
