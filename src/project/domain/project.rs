//! Project aggregate.

use super::{ProjectDomainError, ProjectId, ProjectName, StepName};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A grouping of parts with a default step template.
///
/// The template is fixed after creation. Parts copy whichever steps the
/// caller chooses at part creation and never consult the template again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    description: String,
    process_steps: Vec<StepName>,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: ProjectName,
    /// Persisted description.
    pub description: String,
    /// Persisted step template.
    pub process_steps: Vec<StepName>,
    /// Creator of the project.
    pub created_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new project from raw template entries.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyStepTemplate`] when `steps` is
    /// empty or [`ProjectDomainError::EmptyStepName`] when an entry is blank.
    pub fn new<S>(
        name: ProjectName,
        description: impl Into<String>,
        steps: impl IntoIterator<Item = S>,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError>
    where
        S: Into<String>,
    {
        let process_steps = steps
            .into_iter()
            .enumerate()
            .map(|(position, step)| {
                StepName::new(step).map_err(|_| ProjectDomainError::EmptyStepName { position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if process_steps.is_empty() {
            return Err(ProjectDomainError::EmptyStepTemplate);
        }
        Ok(Self {
            id: ProjectId::new(),
            name,
            description: description.into().trim().to_owned(),
            process_steps,
            created_by,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            process_steps: data.process_steps,
            created_by: data.created_by,
            created_at: data.created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the free-form description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the default step template.
    #[must_use]
    pub fn process_steps(&self) -> &[StepName] {
        &self.process_steps
    }

    /// Returns the creator's identifier.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
