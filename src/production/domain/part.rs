//! Part (work order) aggregate.

use super::{PartId, PartNumber, ProcessStatus, ProductionDomainError};
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A physical work order moving through its own step plan.
///
/// `current_step_index` points into the part's process instances. Once the
/// last step completes it stays on that step and the status becomes
/// [`ProcessStatus::Completed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    id: PartId,
    part_number: PartNumber,
    project_id: ProjectId,
    current_step_index: u32,
    status: ProcessStatus,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPartData {
    /// Persisted part identifier.
    pub id: PartId,
    /// Persisted part number.
    pub part_number: PartNumber,
    /// Referenced project.
    pub project_id: ProjectId,
    /// Persisted step pointer.
    pub current_step_index: u32,
    /// Persisted status.
    pub status: ProcessStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Part {
    /// Creates a pending part positioned on its first step.
    #[must_use]
    pub fn new(part_number: PartNumber, project_id: ProjectId, clock: &impl Clock) -> Self {
        Self {
            id: PartId::new(),
            part_number,
            project_id,
            current_step_index: 0,
            status: ProcessStatus::Pending,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a part from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPartData) -> Self {
        Self {
            id: data.id,
            part_number: data.part_number,
            project_id: data.project_id,
            current_step_index: data.current_step_index,
            status: data.status,
            created_at: data.created_at,
        }
    }

    /// Returns the part identifier.
    #[must_use]
    pub const fn id(&self) -> PartId {
        self.id
    }

    /// Returns the part number.
    #[must_use]
    pub const fn part_number(&self) -> &PartNumber {
        &self.part_number
    }

    /// Returns the referenced project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the zero-based index of the current step.
    #[must_use]
    pub const fn current_step_index(&self) -> u32 {
        self.current_step_index
    }

    /// Returns the part status.
    #[must_use]
    pub const fn status(&self) -> ProcessStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Advances the part after the step at `step_index` completed.
    ///
    /// Completing the last step of a plan of `total_steps` marks the part
    /// completed and leaves the pointer on that step. Any other step moves
    /// the pointer to its successor and marks the part in progress.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionDomainError::StepOutsidePlan`] when `step_index`
    /// does not address a step of the plan.
    pub const fn record_step_completion(
        &mut self,
        step_index: u32,
        total_steps: u32,
    ) -> Result<(), ProductionDomainError> {
        if step_index >= total_steps {
            return Err(ProductionDomainError::StepOutsidePlan {
                step_index,
                total_steps,
            });
        }
        if step_index + 1 == total_steps {
            self.current_step_index = step_index;
            self.status = ProcessStatus::Completed;
        } else {
            self.current_step_index = step_index + 1;
            self.status = ProcessStatus::InProgress;
        }
        Ok(())
    }
}
