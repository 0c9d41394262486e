//! Project creation, lookup, and cascading deletion.

use crate::error::ErrorKind;
use crate::identity::domain::{IdentityError, Principal};
use crate::production::ports::{ProductionRepository, ProductionRepositoryError};
use crate::project::{
    domain::{Project, ProjectDomainError, ProjectId, ProjectName},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: String,
    process_steps: Vec<String>,
}

impl CreateProjectRequest {
    /// Creates a request with a name and no template steps.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            process_steps: Vec::new(),
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the default step template.
    #[must_use]
    pub fn with_steps<S>(mut self, steps: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        self.process_steps = steps.into_iter().map(Into::into).collect();
        self
    }
}

/// Service-level errors for the project catalog.
#[derive(Debug, Error)]
pub enum ProjectCatalogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// The project repository failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),

    /// Cascading into the project's parts failed.
    #[error(transparent)]
    Production(#[from] ProductionRepositoryError),

    /// The caller lacks the required privilege.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// The project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),
}

impl ProjectCatalogError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(ProjectRepositoryError::DuplicateProject(_)) => ErrorKind::Conflict,
            Self::Repository(ProjectRepositoryError::Persistence(_)) => ErrorKind::Persistence,
            Self::Production(
                ProductionRepositoryError::PartNotFound(_)
                | ProductionRepositoryError::InstanceNotFound(_),
            )
            | Self::NotFound(_) => ErrorKind::NotFound,
            Self::Production(
                ProductionRepositoryError::DuplicatePart(_)
                | ProductionRepositoryError::DuplicateToken
                | ProductionRepositoryError::StatusConflict { .. },
            ) => ErrorKind::Conflict,
            Self::Production(ProductionRepositoryError::Persistence(_)) => ErrorKind::Persistence,
            Self::Identity(err) => err.kind(),
        }
    }
}

/// Result type for project catalog operations.
pub type ProjectCatalogResult<T> = Result<T, ProjectCatalogError>;

/// Project catalog orchestration service.
#[derive(Clone)]
pub struct ProjectCatalogService<J, R, C>
where
    J: ProjectRepository,
    R: ProductionRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<J>,
    production: Arc<R>,
    clock: Arc<C>,
}

impl<J, R, C> ProjectCatalogService<J, R, C>
where
    J: ProjectRepository,
    R: ProductionRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project catalog service.
    #[must_use]
    pub const fn new(projects: Arc<J>, production: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            projects,
            production,
            clock,
        }
    }

    /// Creates a project on behalf of a manager or admin.
    ///
    /// # Errors
    ///
    /// Returns an authorization error for operators, a validation error for
    /// a blank name or an empty or blank step template, or a repository
    /// error.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
        actor: &Principal,
    ) -> ProjectCatalogResult<Project> {
        actor.ensure_privileged()?;
        let CreateProjectRequest {
            name,
            description,
            process_steps,
        } = request;
        let project = Project::new(
            ProjectName::new(name)?,
            description,
            process_steps,
            actor.id(),
            &*self.clock,
        )?;
        self.projects.store(&project).await?;
        tracing::info!(
            project_id = %project.id(),
            template_steps = project.process_steps().len(),
            actor = %actor.username(),
            "created project"
        );
        Ok(project)
    }

    /// Returns a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::NotFound`] when the project does not
    /// exist.
    pub async fn get_project(&self, id: ProjectId) -> ProjectCatalogResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or(ProjectCatalogError::NotFound(id))
    }

    /// Lists all projects, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::Repository`] when the lookup fails.
    pub async fn list_projects(&self) -> ProjectCatalogResult<Vec<Project>> {
        Ok(self.projects.list_all().await?)
    }

    /// Deletes a project with all of its parts and their instances.
    ///
    /// # Errors
    ///
    /// Returns an authorization error for operators or
    /// [`ProjectCatalogError::NotFound`] when the project does not exist.
    pub async fn delete_project(&self, id: ProjectId, actor: &Principal) -> ProjectCatalogResult<()> {
        actor.ensure_privileged()?;
        if self.projects.find_by_id(id).await?.is_none() {
            return Err(ProjectCatalogError::NotFound(id));
        }
        let removed_parts = self.production.delete_parts_for_project(id).await?;
        if !self.projects.delete(id).await? {
            return Err(ProjectCatalogError::NotFound(id));
        }
        tracing::info!(
            project_id = %id,
            removed_parts,
            actor = %actor.username(),
            "deleted project"
        );
        Ok(())
    }
}
