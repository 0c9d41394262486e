//! Process instance state machine.

use super::{
    PartId, ProcessInstanceId, ProcessStatus, ProductionDomainError, ScanPurpose, ScanToken,
};
use crate::identity::domain::UserId;
use crate::project::domain::StepName;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One step of a part's plan, driven by its start and end tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInstance {
    id: ProcessInstanceId,
    part_id: PartId,
    step_name: StepName,
    step_index: u32,
    status: ProcessStatus,
    operator_id: Option<UserId>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    start_token: ScanToken,
    end_token: ScanToken,
}

/// Parameter object for reconstructing a persisted process instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProcessInstanceData {
    /// Persisted instance identifier.
    pub id: ProcessInstanceId,
    /// Owning part.
    pub part_id: PartId,
    /// Step name.
    pub step_name: StepName,
    /// Zero-based position within the part's plan.
    pub step_index: u32,
    /// Persisted status.
    pub status: ProcessStatus,
    /// Operator who started the step.
    pub operator_id: Option<UserId>,
    /// Start timestamp.
    pub start_time: Option<DateTime<Utc>>,
    /// End timestamp.
    pub end_time: Option<DateTime<Utc>>,
    /// Token that begins the step.
    pub start_token: ScanToken,
    /// Token that completes the step.
    pub end_token: ScanToken,
}

impl ProcessInstance {
    /// Creates a pending instance with freshly generated tokens.
    #[must_use]
    pub fn new(part_id: PartId, step_name: StepName, step_index: u32) -> Self {
        Self {
            id: ProcessInstanceId::new(),
            part_id,
            step_name,
            step_index,
            status: ProcessStatus::Pending,
            operator_id: None,
            start_time: None,
            end_time: None,
            start_token: ScanToken::generate(),
            end_token: ScanToken::generate(),
        }
    }

    /// Reconstructs an instance from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProcessInstanceData) -> Self {
        Self {
            id: data.id,
            part_id: data.part_id,
            step_name: data.step_name,
            step_index: data.step_index,
            status: data.status,
            operator_id: data.operator_id,
            start_time: data.start_time,
            end_time: data.end_time,
            start_token: data.start_token,
            end_token: data.end_token,
        }
    }

    /// Returns the instance identifier.
    #[must_use]
    pub const fn id(&self) -> ProcessInstanceId {
        self.id
    }

    /// Returns the owning part.
    #[must_use]
    pub const fn part_id(&self) -> PartId {
        self.part_id
    }

    /// Returns the step name.
    #[must_use]
    pub const fn step_name(&self) -> &StepName {
        &self.step_name
    }

    /// Returns the zero-based position within the part's plan.
    #[must_use]
    pub const fn step_index(&self) -> u32 {
        self.step_index
    }

    /// Returns the instance status.
    #[must_use]
    pub const fn status(&self) -> ProcessStatus {
        self.status
    }

    /// Returns the operator who started the step, if started.
    #[must_use]
    pub const fn operator_id(&self) -> Option<UserId> {
        self.operator_id
    }

    /// Returns the start timestamp, if started.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Returns the end timestamp, if completed.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Returns the token that begins the step.
    #[must_use]
    pub const fn start_token(&self) -> &ScanToken {
        &self.start_token
    }

    /// Returns the token that completes the step.
    #[must_use]
    pub const fn end_token(&self) -> &ScanToken {
        &self.end_token
    }

    /// Returns the token for `purpose`.
    #[must_use]
    pub const fn token(&self, purpose: ScanPurpose) -> &ScanToken {
        match purpose {
            ScanPurpose::Start => &self.start_token,
            ScanPurpose::End => &self.end_token,
        }
    }

    /// Returns the index of the preceding step, or `None` for the first step.
    #[must_use]
    pub const fn predecessor_index(&self) -> Option<u32> {
        self.step_index.checked_sub(1)
    }

    /// Checks whether the step may begin.
    ///
    /// The ordering guard runs first: any step after the first requires its
    /// predecessor to be completed. A missing predecessor counts as not
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionDomainError::OrderViolation`],
    /// [`ProductionDomainError::AlreadyStarted`] or
    /// [`ProductionDomainError::AlreadyCompleted`].
    pub fn ensure_can_begin(&self, predecessor: Option<&Self>) -> Result<(), ProductionDomainError> {
        if let Some(predecessor_index) = self.predecessor_index() {
            let predecessor_done = predecessor.is_some_and(|previous| {
                previous.step_index == predecessor_index
                    && previous.status == ProcessStatus::Completed
            });
            if !predecessor_done {
                return Err(ProductionDomainError::OrderViolation {
                    step_index: self.step_index,
                    predecessor_index,
                });
            }
        }
        match self.status {
            ProcessStatus::Pending | ProcessStatus::Blocked => Ok(()),
            ProcessStatus::InProgress => Err(ProductionDomainError::AlreadyStarted(self.id)),
            ProcessStatus::Completed => Err(ProductionDomainError::AlreadyCompleted(self.id)),
        }
    }

    /// Starts the step on behalf of `operator`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::ensure_can_begin`]. The instance is left
    /// unchanged on failure.
    pub fn begin(
        &mut self,
        predecessor: Option<&Self>,
        operator: UserId,
        clock: &impl Clock,
    ) -> Result<(), ProductionDomainError> {
        self.ensure_can_begin(predecessor)?;
        self.status = ProcessStatus::InProgress;
        self.operator_id = Some(operator);
        self.start_time = Some(clock.utc());
        Ok(())
    }

    /// Completes a started step.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionDomainError::NotStarted`] unless the step is in
    /// progress. The instance is left unchanged on failure.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), ProductionDomainError> {
        if self.status != ProcessStatus::InProgress {
            return Err(ProductionDomainError::NotStarted {
                instance_id: self.id,
                status: self.status,
            });
        }
        self.status = ProcessStatus::Completed;
        self.end_time = Some(clock.utc());
        Ok(())
    }
}
