//! Progress aggregation for dashboards and part listings.

use super::{ProductionServiceError, ProductionServiceResult};
use crate::production::{
    domain::{Part, PartId, ProcessInstance, StepInfo},
    ports::ProductionRepository,
};
use crate::project::{
    domain::{Project, ProjectId},
    ports::ProjectRepository,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A part together with all of its instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartStatusView {
    /// The part.
    pub part: Part,
    /// Its instances ordered by step index.
    pub instances: Vec<ProcessInstance>,
}

/// A part with its derived step information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartWithStepInfo {
    /// The part.
    pub part: Part,
    /// Derived progress view.
    pub step_info: StepInfo,
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardEntry {
    /// The part.
    pub part: Part,
    /// The part's project.
    pub project: Project,
    /// Derived progress view.
    pub step_info: StepInfo,
}

/// Derives per-part progress from stored instances.
#[derive(Clone)]
pub struct ProgressService<R, J>
where
    R: ProductionRepository,
    J: ProjectRepository,
{
    production: Arc<R>,
    projects: Arc<J>,
}

impl<R, J> ProgressService<R, J>
where
    R: ProductionRepository,
    J: ProjectRepository,
{
    /// Creates a new progress service.
    #[must_use]
    pub const fn new(production: Arc<R>, projects: Arc<J>) -> Self {
        Self {
            production,
            projects,
        }
    }

    /// Computes the step information of `part` from its own instances.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::Repository`] when the instances
    /// cannot be loaded.
    pub async fn compute_step_info(&self, part: &Part) -> ProductionServiceResult<StepInfo> {
        let instances = self.production.list_instances(part.id()).await?;
        Ok(StepInfo::compute(part, &instances))
    }

    /// Returns a part and all of its instances.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::PartNotFound`] when the part does
    /// not exist.
    pub async fn part_status(&self, id: PartId) -> ProductionServiceResult<PartStatusView> {
        let part = self
            .production
            .find_part(id)
            .await?
            .ok_or(ProductionServiceError::PartNotFound(id))?;
        let instances = self.production.list_instances(id).await?;
        Ok(PartStatusView { part, instances })
    }

    /// Lists parts with their step information, optionally for one project.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::ProjectNotFound`] when a project is
    /// given and does not exist.
    pub async fn list_parts_with_step_info(
        &self,
        project_id: Option<ProjectId>,
    ) -> ProductionServiceResult<Vec<PartWithStepInfo>> {
        if let Some(id) = project_id {
            if self.projects.find_by_id(id).await?.is_none() {
                return Err(ProductionServiceError::ProjectNotFound(id));
            }
        }
        let parts = self.production.list_parts(project_id).await?;
        let mut listed = Vec::with_capacity(parts.len());
        for part in parts {
            let step_info = self.compute_step_info(&part).await?;
            listed.push(PartWithStepInfo { part, step_info });
        }
        Ok(listed)
    }

    /// Lists every part whose project still exists with its progress.
    ///
    /// # Errors
    ///
    /// Returns a repository error when parts, projects or instances cannot be
    /// loaded.
    pub async fn dashboard_overview(&self) -> ProductionServiceResult<Vec<DashboardEntry>> {
        let projects: HashMap<ProjectId, Project> = self
            .projects
            .list_all()
            .await?
            .into_iter()
            .map(|project| (project.id(), project))
            .collect();
        let parts = self.production.list_parts(None).await?;

        let mut entries = Vec::with_capacity(parts.len());
        for part in parts {
            let Some(project) = projects.get(&part.project_id()) else {
                tracing::debug!(part_id = %part.id(), "skipping part without project");
                continue;
            };
            let step_info = self.compute_step_info(&part).await?;
            entries.push(DashboardEntry {
                part,
                project: project.clone(),
                step_info,
            });
        }
        Ok(entries)
    }
}
