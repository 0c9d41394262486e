//! Duration reporting over completed process instances.

use super::ProductionServiceResult;
use crate::identity::{
    domain::{Principal, UserId},
    ports::IdentityProvider,
};
use crate::production::{
    domain::{CompletedDuration, Part, PartId, UNKNOWN_LABEL, duration_minutes},
    ports::ProductionRepository,
};
use crate::project::{
    domain::{Project, ProjectId},
    ports::ProjectRepository,
};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

/// Reports how long each completed step took.
#[derive(Clone)]
pub struct DurationReportService<R, J, I>
where
    R: ProductionRepository,
    J: ProjectRepository,
    I: IdentityProvider,
{
    production: Arc<R>,
    projects: Arc<J>,
    identity: Arc<I>,
}

impl<R, J, I> DurationReportService<R, J, I>
where
    R: ProductionRepository,
    J: ProjectRepository,
    I: IdentityProvider,
{
    /// Creates a new duration report service.
    #[must_use]
    pub const fn new(production: Arc<R>, projects: Arc<J>, identity: Arc<I>) -> Self {
        Self {
            production,
            projects,
            identity,
        }
    }

    /// Lists completed steps, most recently finished first.
    ///
    /// Parts, projects, and operators that no longer exist are shown as
    /// [`UNKNOWN_LABEL`].
    ///
    /// # Errors
    ///
    /// Returns an authorization error for operators or a repository error
    /// when a lookup fails.
    pub async fn completed_durations(
        &self,
        actor: &Principal,
    ) -> ProductionServiceResult<Vec<CompletedDuration>> {
        actor.ensure_privileged()?;
        let instances = self.production.list_completed_instances().await?;

        let mut lookups = ReportLookups::default();
        let mut rows = Vec::with_capacity(instances.len());
        for instance in instances {
            let (Some(start_time), Some(end_time)) = (instance.start_time(), instance.end_time())
            else {
                continue;
            };
            let part = lookups.part(&*self.production, instance.part_id()).await?;
            let project = match part.as_ref() {
                Some(found) => lookups.project(&*self.projects, found.project_id()).await?,
                None => None,
            };
            let operator = match instance.operator_id() {
                Some(user_id) => lookups.operator(&*self.identity, user_id).await?,
                None => None,
            };

            rows.push(CompletedDuration {
                part_number: part
                    .map_or_else(unknown, |found| found.part_number().as_str().to_owned()),
                project_name: project.map_or_else(unknown, |found| found.name().as_str().to_owned()),
                step_name: instance.step_name().as_str().to_owned(),
                operator_name: operator.unwrap_or_else(unknown),
                duration_minutes: duration_minutes(start_time, end_time),
                start_time,
                end_time,
            });
        }

        rows.sort_by_key(|row| Reverse(row.end_time));
        tracing::debug!(rows = rows.len(), "built duration report");
        Ok(rows)
    }
}

/// Per-report caches of joined records; `None` marks a missing record.
#[derive(Default)]
struct ReportLookups {
    parts: HashMap<PartId, Option<Part>>,
    projects: HashMap<ProjectId, Option<Project>>,
    operators: HashMap<UserId, Option<String>>,
}

impl ReportLookups {
    async fn part(
        &mut self,
        production: &impl ProductionRepository,
        id: PartId,
    ) -> ProductionServiceResult<Option<Part>> {
        if let Some(cached) = self.parts.get(&id) {
            return Ok(cached.clone());
        }
        let found = production.find_part(id).await?;
        self.parts.insert(id, found.clone());
        Ok(found)
    }

    async fn project(
        &mut self,
        projects: &impl ProjectRepository,
        id: ProjectId,
    ) -> ProductionServiceResult<Option<Project>> {
        if let Some(cached) = self.projects.get(&id) {
            return Ok(cached.clone());
        }
        let found = projects.find_by_id(id).await?;
        self.projects.insert(id, found.clone());
        Ok(found)
    }

    async fn operator(
        &mut self,
        identity: &impl IdentityProvider,
        id: UserId,
    ) -> ProductionServiceResult<Option<String>> {
        if let Some(cached) = self.operators.get(&id) {
            return Ok(cached.clone());
        }
        let found = identity
            .find_user(id)
            .await?
            .map(|principal| principal.username().as_str().to_owned());
        self.operators.insert(id, found.clone());
        Ok(found)
    }
}

fn unknown() -> String {
    UNKNOWN_LABEL.to_owned()
}
