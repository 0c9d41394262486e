//! Caller-supplied step plans.

use super::{PartId, ProcessInstance, ProductionDomainError};
use crate::project::domain::StepName;

/// Non-empty ordered list of step names chosen when a part is created.
///
/// A plan is independent of the project's template and is materialized
/// exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    steps: Vec<StepName>,
}

impl StepPlan {
    /// Validates raw step names into a plan, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`ProductionDomainError::EmptyStepPlan`] when no steps are
    /// given, [`ProductionDomainError::EmptyStepName`] when an entry is
    /// blank, or [`ProductionDomainError::StepPlanTooLong`] when the plan
    /// cannot be indexed.
    pub fn new<S>(steps: impl IntoIterator<Item = S>) -> Result<Self, ProductionDomainError>
    where
        S: Into<String>,
    {
        let validated = steps
            .into_iter()
            .enumerate()
            .map(|(position, step)| {
                StepName::new(step)
                    .map_err(|_| ProductionDomainError::EmptyStepName { position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if validated.is_empty() {
            return Err(ProductionDomainError::EmptyStepPlan);
        }
        if u32::try_from(validated.len()).is_err() {
            return Err(ProductionDomainError::StepPlanTooLong { max: u32::MAX });
        }
        Ok(Self { steps: validated })
    }

    /// Returns the planned step names.
    #[must_use]
    pub fn steps(&self) -> &[StepName] {
        &self.steps
    }

    /// Returns the number of steps.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; plans are never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Creates one pending instance per step with indices `0..len`.
    #[must_use]
    pub fn materialize(&self, part_id: PartId) -> Vec<ProcessInstance> {
        self.steps
            .iter()
            .zip(0_u32..)
            .map(|(name, index)| ProcessInstance::new(part_id, name.clone(), index))
            .collect()
    }
}
