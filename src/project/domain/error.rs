//! Error types for project domain validation.

use thiserror::Error;

/// Errors returned while constructing project values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The project name exceeds the storage limit.
    #[error("project name exceeds {max} characters")]
    ProjectNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },

    /// The step template contains no steps.
    #[error("a project needs at least one process step")]
    EmptyStepTemplate,

    /// A template entry is blank.
    #[error("process step {position} must not be empty")]
    EmptyStepName {
        /// Zero-based position of the offending entry.
        position: usize,
    },
}

/// Error returned when a step name is blank.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("step name must not be empty")]
pub struct EmptyStepNameError;
