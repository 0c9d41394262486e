//! Error types for production domain rules.

use super::{ProcessInstanceId, ProcessStatus};
use thiserror::Error;

/// Errors returned when a production rule is violated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductionDomainError {
    /// The part number is empty after trimming.
    #[error("part number must not be empty")]
    EmptyPartNumber,

    /// A part was created without any steps.
    #[error("a part needs at least one process step")]
    EmptyStepPlan,

    /// A plan entry is blank.
    #[error("process step {position} must not be empty")]
    EmptyStepName {
        /// Zero-based position of the offending entry.
        position: usize,
    },

    /// The plan has more steps than a step index can address.
    #[error("a part cannot have more than {max} process steps")]
    StepPlanTooLong {
        /// Maximum accepted plan length.
        max: u32,
    },

    /// The predecessor step has not been completed.
    #[error("step {step_index} cannot start before step {predecessor_index} is completed")]
    OrderViolation {
        /// Index of the step being started.
        step_index: u32,
        /// Index of the blocking predecessor.
        predecessor_index: u32,
    },

    /// The step is already in progress.
    #[error("process instance {0} has already been started")]
    AlreadyStarted(ProcessInstanceId),

    /// The step is already completed.
    #[error("process instance {0} has already been completed")]
    AlreadyCompleted(ProcessInstanceId),

    /// The step cannot be completed from its current status.
    #[error("process instance {instance_id} has not been started (status {status})")]
    NotStarted {
        /// Instance that was scanned.
        instance_id: ProcessInstanceId,
        /// Status observed at scan time.
        status: ProcessStatus,
    },

    /// A completion referenced a step outside the part's plan.
    #[error("step {step_index} is outside a plan of {total_steps} steps")]
    StepOutsidePlan {
        /// Index that was completed.
        step_index: u32,
        /// Number of steps in the part's plan.
        total_steps: u32,
    },
}

/// Error returned while parsing a process status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown process status: {0}")]
pub struct ParseProcessStatusError(pub String);
