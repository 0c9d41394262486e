//! Process status shared by parts and process instances.

use super::ParseProcessStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a part or a process instance.
///
/// Instances move `Pending -> InProgress -> Completed`. `Blocked` is stored
/// and displayed but no scan produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Not started.
    Pending,
    /// Started and not yet completed.
    InProgress,
    /// Finished.
    Completed,
    /// Held by a manual intervention. A start scan resumes it as in progress.
    Blocked,
}

impl ProcessStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }
}

impl TryFrom<&str> for ProcessStatus {
    type Error = ParseProcessStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "blocked" => Ok(Self::Blocked),
            _ => Err(ParseProcessStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
