//! In-memory repository for parts and process instances.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::production::{
    domain::{
        Part, PartId, ProcessInstance, ProcessInstanceId, ProcessStatus, ScanPurpose, ScanToken,
    },
    ports::{ProductionRepository, ProductionRepositoryError, ProductionRepositoryResult},
};
use crate::project::domain::ProjectId;

/// Thread-safe in-memory production repository.
///
/// Every operation holds one lock for its whole duration, which makes
/// multi-record writes atomic and status checks race-free.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductionRepository {
    state: Arc<RwLock<InMemoryProductionState>>,
}

#[derive(Debug, Default)]
struct InMemoryProductionState {
    parts: HashMap<PartId, Part>,
    instances: HashMap<ProcessInstanceId, ProcessInstance>,
    part_instances: HashMap<PartId, Vec<ProcessInstanceId>>,
    start_tokens: HashMap<ScanToken, ProcessInstanceId>,
    end_tokens: HashMap<ScanToken, ProcessInstanceId>,
}

impl InMemoryProductionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> ProductionRepositoryError {
    ProductionRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryProductionState {
    fn token_in_use(&self, token: &ScanToken) -> bool {
        self.start_tokens.contains_key(token) || self.end_tokens.contains_key(token)
    }

    fn instances_of(&self, part_id: PartId) -> Vec<ProcessInstance> {
        let mut listed: Vec<ProcessInstance> = self
            .part_instances
            .get(&part_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.instances.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        listed.sort_by_key(ProcessInstance::step_index);
        listed
    }

    fn remove_part(&mut self, part_id: PartId) -> bool {
        let removed = self.parts.remove(&part_id).is_some();
        for id in self.part_instances.remove(&part_id).unwrap_or_default() {
            if let Some(instance) = self.instances.remove(&id) {
                self.start_tokens.remove(instance.start_token());
                self.end_tokens.remove(instance.end_token());
            }
        }
        removed
    }

    fn check_status(
        &self,
        instance: &ProcessInstance,
        expected: ProcessStatus,
    ) -> ProductionRepositoryResult<()> {
        let stored = self
            .instances
            .get(&instance.id())
            .ok_or(ProductionRepositoryError::InstanceNotFound(instance.id()))?;
        if stored.status() != expected {
            return Err(ProductionRepositoryError::StatusConflict {
                instance_id: instance.id(),
                expected,
                actual: stored.status(),
            });
        }
        Ok(())
    }
}

fn has_duplicate_tokens(instances: &[ProcessInstance]) -> bool {
    let mut seen = HashSet::new();
    instances
        .iter()
        .flat_map(|instance| [instance.start_token(), instance.end_token()])
        .any(|token| !seen.insert(token))
}

#[async_trait]
impl ProductionRepository for InMemoryProductionRepository {
    async fn store_part(
        &self,
        part: &Part,
        instances: &[ProcessInstance],
    ) -> ProductionRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.parts.contains_key(&part.id()) {
            return Err(ProductionRepositoryError::DuplicatePart(part.id()));
        }
        if has_duplicate_tokens(instances)
            || instances.iter().any(|instance| {
                state.token_in_use(instance.start_token()) || state.token_in_use(instance.end_token())
            })
        {
            return Err(ProductionRepositoryError::DuplicateToken);
        }

        state.parts.insert(part.id(), part.clone());
        let ids = instances.iter().map(ProcessInstance::id).collect();
        state.part_instances.insert(part.id(), ids);
        for instance in instances {
            state
                .start_tokens
                .insert(instance.start_token().clone(), instance.id());
            state
                .end_tokens
                .insert(instance.end_token().clone(), instance.id());
            state.instances.insert(instance.id(), instance.clone());
        }
        Ok(())
    }

    async fn find_part(&self, id: PartId) -> ProductionRepositoryResult<Option<Part>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.parts.get(&id).cloned())
    }

    async fn list_parts(
        &self,
        project_id: Option<ProjectId>,
    ) -> ProductionRepositoryResult<Vec<Part>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut listed: Vec<Part> = state
            .parts
            .values()
            .filter(|part| project_id.is_none_or(|wanted| part.project_id() == wanted))
            .cloned()
            .collect();
        listed.sort_by_key(|part| (part.created_at(), part.id()));
        Ok(listed)
    }

    async fn delete_part(&self, id: PartId) -> ProductionRepositoryResult<bool> {
        let mut state = self.state.write().map_err(poisoned)?;
        Ok(state.remove_part(id))
    }

    async fn delete_parts_for_project(
        &self,
        project_id: ProjectId,
    ) -> ProductionRepositoryResult<u64> {
        let mut state = self.state.write().map_err(poisoned)?;
        let doomed: Vec<PartId> = state
            .parts
            .values()
            .filter(|part| part.project_id() == project_id)
            .map(Part::id)
            .collect();
        let mut removed = 0_u64;
        for part_id in doomed {
            if state.remove_part(part_id) {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn find_instance_by_token(
        &self,
        token: &ScanToken,
        purpose: ScanPurpose,
    ) -> ProductionRepositoryResult<Option<ProcessInstance>> {
        let state = self.state.read().map_err(poisoned)?;
        let index = match purpose {
            ScanPurpose::Start => &state.start_tokens,
            ScanPurpose::End => &state.end_tokens,
        };
        Ok(index
            .get(token)
            .and_then(|id| state.instances.get(id))
            .cloned())
    }

    async fn find_instance_at(
        &self,
        part_id: PartId,
        step_index: u32,
    ) -> ProductionRepositoryResult<Option<ProcessInstance>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .instances_of(part_id)
            .into_iter()
            .find(|instance| instance.step_index() == step_index))
    }

    async fn list_instances(
        &self,
        part_id: PartId,
    ) -> ProductionRepositoryResult<Vec<ProcessInstance>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.instances_of(part_id))
    }

    async fn list_completed_instances(&self) -> ProductionRepositoryResult<Vec<ProcessInstance>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .instances
            .values()
            .filter(|instance| {
                instance.status() == ProcessStatus::Completed
                    && instance.start_time().is_some()
                    && instance.end_time().is_some()
            })
            .cloned()
            .collect())
    }

    async fn begin_instance(
        &self,
        instance: &ProcessInstance,
        expected: ProcessStatus,
    ) -> ProductionRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.check_status(instance, expected)?;
        state.instances.insert(instance.id(), instance.clone());
        Ok(())
    }

    async fn complete_instance(
        &self,
        instance: &ProcessInstance,
        expected: ProcessStatus,
        part: &Part,
    ) -> ProductionRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.check_status(instance, expected)?;
        if !state.parts.contains_key(&part.id()) {
            return Err(ProductionRepositoryError::PartNotFound(part.id()));
        }
        state.instances.insert(instance.id(), instance.clone());
        state.parts.insert(part.id(), part.clone());
        Ok(())
    }
}
