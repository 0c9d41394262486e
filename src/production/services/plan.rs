//! Part creation from caller-supplied step plans.

use super::{ProductionServiceError, ProductionServiceResult};
use crate::identity::domain::Principal;
use crate::production::{
    domain::{Part, PartId, PartNumber, ProcessStatus, ScanToken, StepPlan},
    ports::ProductionRepository,
};
use crate::project::{domain::ProjectId, ports::ProjectRepository};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request payload for creating a part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePartRequest {
    part_number: String,
    project_id: ProjectId,
    step_names: Vec<String>,
}

impl CreatePartRequest {
    /// Creates a request for a part of `project_id` with no steps yet.
    #[must_use]
    pub fn new(part_number: impl Into<String>, project_id: ProjectId) -> Self {
        Self {
            part_number: part_number.into(),
            project_id,
            step_names: Vec::new(),
        }
    }

    /// Sets the ordered step names of the part's plan.
    #[must_use]
    pub fn with_steps<S>(mut self, steps: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        self.step_names = steps.into_iter().map(Into::into).collect();
        self
    }
}

/// Printable token pair of one process instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTokenPair {
    /// Step name.
    pub step_name: String,
    /// Position within the part's plan.
    pub step_index: u32,
    /// Current instance status.
    pub status: ProcessStatus,
    /// Token that begins the step.
    pub start_token: ScanToken,
    /// Token that completes the step.
    pub end_token: ScanToken,
}

/// Creates, lists, and deletes parts.
#[derive(Clone)]
pub struct StepPlanService<R, J, C>
where
    R: ProductionRepository,
    J: ProjectRepository,
    C: Clock + Send + Sync,
{
    production: Arc<R>,
    projects: Arc<J>,
    clock: Arc<C>,
}

impl<R, J, C> StepPlanService<R, J, C>
where
    R: ProductionRepository,
    J: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new step plan service.
    #[must_use]
    pub const fn new(production: Arc<R>, projects: Arc<J>, clock: Arc<C>) -> Self {
        Self {
            production,
            projects,
            clock,
        }
    }

    /// Creates a pending part and one pending instance per requested step.
    ///
    /// The project's template is never consulted; the part's plan is exactly
    /// the requested steps in the requested order.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty plan, blank step or blank
    /// part number, [`ProductionServiceError::ProjectNotFound`] when the
    /// project does not exist, or a repository error.
    pub async fn create_part(&self, request: CreatePartRequest) -> ProductionServiceResult<Part> {
        let CreatePartRequest {
            part_number,
            project_id,
            step_names,
        } = request;
        let plan = StepPlan::new(step_names)?;
        let number = PartNumber::new(part_number)?;
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(ProductionServiceError::ProjectNotFound(project_id));
        }

        let part = Part::new(number, project_id, &*self.clock);
        let instances = plan.materialize(part.id());
        self.production.store_part(&part, &instances).await?;
        tracing::info!(
            part_id = %part.id(),
            project_id = %project_id,
            total_steps = instances.len(),
            "created part"
        );
        Ok(part)
    }

    /// Lists all parts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::Repository`] when the lookup fails.
    pub async fn list_parts(&self) -> ProductionServiceResult<Vec<Part>> {
        Ok(self.production.list_parts(None).await?)
    }

    /// Deletes a part together with its instances.
    ///
    /// # Errors
    ///
    /// Returns an authorization error for operators or
    /// [`ProductionServiceError::PartNotFound`] when the part does not exist.
    pub async fn delete_part(&self, id: PartId, actor: &Principal) -> ProductionServiceResult<()> {
        actor.ensure_privileged()?;
        if !self.production.delete_part(id).await? {
            return Err(ProductionServiceError::PartNotFound(id));
        }
        tracing::info!(part_id = %id, actor = %actor.username(), "deleted part");
        Ok(())
    }

    /// Lists the start and end tokens of every step of a part.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::PartNotFound`] when the part does
    /// not exist.
    pub async fn list_scan_tokens(&self, id: PartId) -> ProductionServiceResult<Vec<ScanTokenPair>> {
        if self.production.find_part(id).await?.is_none() {
            return Err(ProductionServiceError::PartNotFound(id));
        }
        let instances = self.production.list_instances(id).await?;
        Ok(instances
            .into_iter()
            .map(|instance| ScanTokenPair {
                step_name: instance.step_name().as_str().to_owned(),
                step_index: instance.step_index(),
                status: instance.status(),
                start_token: instance.start_token().clone(),
                end_token: instance.end_token().clone(),
            })
            .collect())
    }
}
