//! Scan transition engine.

use super::{ProductionServiceError, ProductionServiceResult};
use crate::identity::{
    domain::{AuthMode, Principal},
    ports::IdentityProvider,
    services::ActorResolver,
};
use crate::production::{
    domain::{
        PartId, ProcessInstanceId, ProcessStatus, ProductionDomainError, ScanPurpose, ScanToken,
    },
    ports::{ProductionRepository, ProductionRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of a successful start scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStarted {
    /// Started instance.
    pub instance_id: ProcessInstanceId,
    /// Owning part.
    pub part_id: PartId,
    /// Step name.
    pub step_name: String,
    /// Username of the operator.
    pub operator: String,
    /// Start timestamp.
    pub start_time: DateTime<Utc>,
}

/// Outcome of a successful end scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCompleted {
    /// Completed instance.
    pub instance_id: ProcessInstanceId,
    /// Owning part.
    pub part_id: PartId,
    /// Step name.
    pub step_name: String,
    /// Username of the operator who scanned the end token.
    pub operator: String,
    /// End timestamp.
    pub end_time: DateTime<Utc>,
    /// Part status after the cascade.
    pub part_status: ProcessStatus,
    /// Part step pointer after the cascade.
    pub current_step_index: u32,
}

/// Applies start and end scans to process instances.
#[derive(Clone)]
pub struct ScanTransitionService<R, I, C>
where
    R: ProductionRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    actors: ActorResolver<I>,
    clock: Arc<C>,
}

impl<R, I, C> ScanTransitionService<R, I, C>
where
    R: ProductionRepository,
    I: IdentityProvider,
    C: Clock + Send + Sync,
{
    /// Creates a new scan transition service.
    #[must_use]
    pub const fn new(repository: Arc<R>, identity: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            repository,
            actors: ActorResolver::new(identity),
            clock,
        }
    }

    /// Resolves the acting user from `mode` and begins the step.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the actor cannot be resolved,
    /// otherwise the errors of [`Self::begin_step`].
    pub async fn begin_step_as(
        &self,
        token: &ScanToken,
        mode: &AuthMode,
        bearer_token: Option<&str>,
    ) -> ProductionServiceResult<StepStarted> {
        let actor = self.actors.resolve(mode, bearer_token).await?;
        self.begin_step(token, &actor).await
    }

    /// Resolves the acting user from `mode` and completes the step.
    ///
    /// # Errors
    ///
    /// Returns an authentication error when the actor cannot be resolved,
    /// otherwise the errors of [`Self::end_step`].
    pub async fn end_step_as(
        &self,
        token: &ScanToken,
        mode: &AuthMode,
        bearer_token: Option<&str>,
    ) -> ProductionServiceResult<StepCompleted> {
        let actor = self.actors.resolve(mode, bearer_token).await?;
        self.end_step(token, &actor).await
    }

    /// Begins the step whose start token is `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::TokenNotFound`] for an unknown
    /// token, or an order, already-started or already-completed violation.
    /// A concurrent scan that wins the race makes this call fail with the
    /// status it produced.
    #[tracing::instrument(skip_all, fields(purpose = "start", operator = %actor.username()))]
    pub async fn begin_step(
        &self,
        token: &ScanToken,
        actor: &Principal,
    ) -> ProductionServiceResult<StepStarted> {
        let mut instance = self
            .repository
            .find_instance_by_token(token, ScanPurpose::Start)
            .await?
            .ok_or(ProductionServiceError::TokenNotFound(ScanPurpose::Start))?;
        let predecessor = match instance.predecessor_index() {
            Some(index) => {
                self.repository
                    .find_instance_at(instance.part_id(), index)
                    .await?
            }
            None => None,
        };

        let observed = instance.status();
        if let Err(err) = instance.begin(predecessor.as_ref(), actor.id(), &*self.clock) {
            tracing::warn!(
                part_id = %instance.part_id(),
                step_index = instance.step_index(),
                error = %err,
                "rejected start scan"
            );
            return Err(err.into());
        }
        self.repository
            .begin_instance(&instance, observed)
            .await
            .map_err(|err| lost_race(err, begin_conflict))?;

        let start_time = instance.start_time().unwrap_or_else(|| self.clock.utc());
        tracing::info!(
            part_id = %instance.part_id(),
            step_index = instance.step_index(),
            "step started"
        );
        Ok(StepStarted {
            instance_id: instance.id(),
            part_id: instance.part_id(),
            step_name: instance.step_name().as_str().to_owned(),
            operator: actor.username().as_str().to_owned(),
            start_time,
        })
    }

    /// Completes the step whose end token is `token` and advances its part.
    ///
    /// The instance completion and the part update are persisted together.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionServiceError::TokenNotFound`] for an unknown
    /// token, a not-started violation unless the step is in progress, or
    /// [`ProductionServiceError::PartNotFound`] when the owning part is gone.
    #[tracing::instrument(skip_all, fields(purpose = "end", operator = %actor.username()))]
    pub async fn end_step(
        &self,
        token: &ScanToken,
        actor: &Principal,
    ) -> ProductionServiceResult<StepCompleted> {
        let mut instance = self
            .repository
            .find_instance_by_token(token, ScanPurpose::End)
            .await?
            .ok_or(ProductionServiceError::TokenNotFound(ScanPurpose::End))?;

        let observed = instance.status();
        if let Err(err) = instance.complete(&*self.clock) {
            tracing::warn!(
                part_id = %instance.part_id(),
                step_index = instance.step_index(),
                error = %err,
                "rejected end scan"
            );
            return Err(err.into());
        }

        let part_id = instance.part_id();
        let mut part = self
            .repository
            .find_part(part_id)
            .await?
            .ok_or(ProductionServiceError::PartNotFound(part_id))?;
        let total_steps = self.repository.list_instances(part_id).await?.len();
        let total = u32::try_from(total_steps).map_err(|_| {
            ProductionDomainError::StepPlanTooLong { max: u32::MAX }
        })?;
        part.record_step_completion(instance.step_index(), total)?;

        self.repository
            .complete_instance(&instance, observed, &part)
            .await
            .map_err(|err| lost_race(err, end_conflict))?;

        let end_time = instance.end_time().unwrap_or_else(|| self.clock.utc());
        tracing::info!(
            part_id = %part_id,
            step_index = instance.step_index(),
            part_status = %part.status(),
            "step completed"
        );
        Ok(StepCompleted {
            instance_id: instance.id(),
            part_id,
            step_name: instance.step_name().as_str().to_owned(),
            operator: actor.username().as_str().to_owned(),
            end_time,
            part_status: part.status(),
            current_step_index: part.current_step_index(),
        })
    }
}

/// Turns a lost compare-and-swap into the violation the winner caused.
fn lost_race(
    err: ProductionRepositoryError,
    conflict: fn(ProcessInstanceId, ProcessStatus) -> ProductionDomainError,
) -> ProductionServiceError {
    match err {
        ProductionRepositoryError::StatusConflict {
            instance_id,
            actual,
            ..
        } => {
            let violation = conflict(instance_id, actual);
            tracing::warn!(%instance_id, error = %violation, "lost concurrent scan");
            violation.into()
        }
        ProductionRepositoryError::PartNotFound(id) => ProductionServiceError::PartNotFound(id),
        other => other.into(),
    }
}

const fn begin_conflict(instance_id: ProcessInstanceId, actual: ProcessStatus) -> ProductionDomainError {
    match actual {
        ProcessStatus::Completed => ProductionDomainError::AlreadyCompleted(instance_id),
        ProcessStatus::Pending | ProcessStatus::InProgress | ProcessStatus::Blocked => {
            ProductionDomainError::AlreadyStarted(instance_id)
        }
    }
}

const fn end_conflict(instance_id: ProcessInstanceId, actual: ProcessStatus) -> ProductionDomainError {
    ProductionDomainError::NotStarted {
        instance_id,
        status: actual,
    }
}
