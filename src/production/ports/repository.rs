//! Repository port for parts and their process instances.

use crate::production::domain::{
    Part, PartId, ProcessInstance, ProcessInstanceId, ProcessStatus, ScanPurpose, ScanToken,
};
use crate::project::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for production repository operations.
pub type ProductionRepositoryResult<T> = Result<T, ProductionRepositoryError>;

/// Persistence contract for parts and process instances.
///
/// Instances are owned by their part. Status transitions are conditional on
/// the status the caller read, so two concurrent scans of the same token
/// cannot both succeed.
#[async_trait]
pub trait ProductionRepository: Send + Sync {
    /// Stores a part together with its full set of instances.
    ///
    /// Either everything is stored or nothing is.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionRepositoryError::DuplicatePart`] when the part
    /// already exists or [`ProductionRepositoryError::DuplicateToken`] when a
    /// token collides with a stored one.
    async fn store_part(
        &self,
        part: &Part,
        instances: &[ProcessInstance],
    ) -> ProductionRepositoryResult<()>;

    /// Finds a part by identifier.
    async fn find_part(&self, id: PartId) -> ProductionRepositoryResult<Option<Part>>;

    /// Lists parts, oldest first, optionally restricted to one project.
    async fn list_parts(
        &self,
        project_id: Option<ProjectId>,
    ) -> ProductionRepositoryResult<Vec<Part>>;

    /// Deletes a part and its instances. Returns whether the part existed.
    async fn delete_part(&self, id: PartId) -> ProductionRepositoryResult<bool>;

    /// Deletes every part of a project with their instances.
    ///
    /// Returns the number of parts removed.
    async fn delete_parts_for_project(
        &self,
        project_id: ProjectId,
    ) -> ProductionRepositoryResult<u64>;

    /// Finds the instance whose token for `purpose` equals `token`.
    ///
    /// A start token never matches an end lookup and vice versa.
    async fn find_instance_by_token(
        &self,
        token: &ScanToken,
        purpose: ScanPurpose,
    ) -> ProductionRepositoryResult<Option<ProcessInstance>>;

    /// Finds the instance of `part_id` at `step_index`.
    async fn find_instance_at(
        &self,
        part_id: PartId,
        step_index: u32,
    ) -> ProductionRepositoryResult<Option<ProcessInstance>>;

    /// Lists the instances of a part ordered by step index.
    async fn list_instances(
        &self,
        part_id: PartId,
    ) -> ProductionRepositoryResult<Vec<ProcessInstance>>;

    /// Lists every completed instance that has both timestamps.
    async fn list_completed_instances(&self) -> ProductionRepositoryResult<Vec<ProcessInstance>>;

    /// Persists a started instance if its stored status is still `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionRepositoryError::StatusConflict`] when another
    /// transition got there first or
    /// [`ProductionRepositoryError::InstanceNotFound`] when the instance is
    /// gone.
    async fn begin_instance(
        &self,
        instance: &ProcessInstance,
        expected: ProcessStatus,
    ) -> ProductionRepositoryResult<()>;

    /// Persists a completed instance and its advanced part as one unit.
    ///
    /// The part is only written if the instance's stored status is still
    /// `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionRepositoryError::StatusConflict`],
    /// [`ProductionRepositoryError::InstanceNotFound`] or
    /// [`ProductionRepositoryError::PartNotFound`]; nothing is written in
    /// those cases.
    async fn complete_instance(
        &self,
        instance: &ProcessInstance,
        expected: ProcessStatus,
        part: &Part,
    ) -> ProductionRepositoryResult<()>;
}

/// Errors returned by production repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProductionRepositoryError {
    /// A part with the same identifier already exists.
    #[error("duplicate part identifier: {0}")]
    DuplicatePart(PartId),

    /// A scan token is already in use.
    #[error("duplicate scan token")]
    DuplicateToken,

    /// The part does not exist.
    #[error("part not found: {0}")]
    PartNotFound(PartId),

    /// The process instance does not exist.
    #[error("process instance not found: {0}")]
    InstanceNotFound(ProcessInstanceId),

    /// The stored status changed since it was read.
    #[error("process instance {instance_id} is {actual}, expected {expected}")]
    StatusConflict {
        /// Instance being transitioned.
        instance_id: ProcessInstanceId,
        /// Status the caller read.
        expected: ProcessStatus,
        /// Status found at write time.
        actual: ProcessStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProductionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<diesel::result::Error> for ProductionRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
