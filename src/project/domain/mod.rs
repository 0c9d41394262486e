//! Domain model for the project catalog.

mod error;
mod ids;
mod project;

pub use error::{EmptyStepNameError, ProjectDomainError};
pub use ids::{ProjectId, ProjectName, StepName};
pub use project::{PersistedProjectData, Project};
