//! In-memory project repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut projects = self.state.write().map_err(poisoned)?;
        if projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let projects = self.state.read().map_err(poisoned)?;
        Ok(projects.get(&id).cloned())
    }

    async fn list_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        let projects = self.state.read().map_err(poisoned)?;
        let mut listed: Vec<Project> = projects.values().cloned().collect();
        listed.sort_by_key(|project| (project.created_at(), project.id().into_inner()));
        Ok(listed)
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool> {
        let mut projects = self.state.write().map_err(poisoned)?;
        Ok(projects.remove(&id).is_some())
    }
}
