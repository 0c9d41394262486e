//! Service-level errors for production operations.

use crate::error::ErrorKind;
use crate::identity::domain::IdentityError;
use crate::production::{
    domain::{PartId, ProductionDomainError, ScanPurpose},
    ports::ProductionRepositoryError,
};
use crate::project::{domain::ProjectId, ports::ProjectRepositoryError};
use thiserror::Error;

/// Errors returned by production services.
#[derive(Debug, Error)]
pub enum ProductionServiceError {
    /// A production rule rejected the request.
    #[error(transparent)]
    Domain(#[from] ProductionDomainError),

    /// The production repository failed.
    #[error(transparent)]
    Repository(#[from] ProductionRepositoryError),

    /// The project repository failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),

    /// The acting user could not be established or lacks privilege.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The referenced project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The referenced part does not exist.
    #[error("part not found: {0}")]
    PartNotFound(PartId),

    /// No instance carries the scanned token for this purpose.
    #[error("no process instance has this {0} token")]
    TokenNotFound(ScanPurpose),
}

impl ProductionServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => domain_kind(err),
            Self::Repository(err) => match err {
                ProductionRepositoryError::PartNotFound(_)
                | ProductionRepositoryError::InstanceNotFound(_) => ErrorKind::NotFound,
                ProductionRepositoryError::DuplicatePart(_)
                | ProductionRepositoryError::DuplicateToken
                | ProductionRepositoryError::StatusConflict { .. } => ErrorKind::Conflict,
                ProductionRepositoryError::Persistence(_) => ErrorKind::Persistence,
            },
            Self::Projects(err) => match err {
                ProjectRepositoryError::DuplicateProject(_) => ErrorKind::Conflict,
                ProjectRepositoryError::Persistence(_) => ErrorKind::Persistence,
            },
            Self::Identity(err) => err.kind(),
            Self::ProjectNotFound(_) | Self::PartNotFound(_) | Self::TokenNotFound(_) => {
                ErrorKind::NotFound
            }
        }
    }
}

const fn domain_kind(err: &ProductionDomainError) -> ErrorKind {
    match err {
        ProductionDomainError::EmptyPartNumber
        | ProductionDomainError::EmptyStepPlan
        | ProductionDomainError::EmptyStepName { .. }
        | ProductionDomainError::StepPlanTooLong { .. } => ErrorKind::Validation,
        ProductionDomainError::OrderViolation { .. } => ErrorKind::OrderViolation,
        ProductionDomainError::AlreadyStarted(_) => ErrorKind::AlreadyStarted,
        ProductionDomainError::AlreadyCompleted(_) => ErrorKind::AlreadyCompleted,
        ProductionDomainError::NotStarted { .. } => ErrorKind::NotStarted,
        ProductionDomainError::StepOutsidePlan { .. } => ErrorKind::Persistence,
    }
}

/// Result type for production service operations.
pub type ProductionServiceResult<T> = Result<T, ProductionServiceError>;
