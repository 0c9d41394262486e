//! Caller-facing error classification shared by all service layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a failed operation.
///
/// Service errors map onto these kinds so an HTTP layer can choose a status
/// code without inspecting error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or empty input.
    Validation,
    /// An identifier or scan token did not resolve.
    NotFound,
    /// The predecessor step has not been completed yet.
    OrderViolation,
    /// The step has already been started.
    AlreadyStarted,
    /// The step has already been completed.
    AlreadyCompleted,
    /// The step has not been started.
    NotStarted,
    /// Credentials or session principal could not be established.
    Authentication,
    /// The caller lacks the required privilege.
    Authorization,
    /// A uniqueness constraint was violated.
    Conflict,
    /// The persistence layer failed.
    Persistence,
}

impl ErrorKind {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::OrderViolation => "order_violation",
            Self::AlreadyStarted => "already_started",
            Self::AlreadyCompleted => "already_completed",
            Self::NotStarted => "not_started",
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Conflict => "conflict",
            Self::Persistence => "persistence",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
