//! Derived per-part progress view.

use super::{Part, ProcessInstance, ProcessStatus};
use serde::{Deserialize, Serialize};

/// Step label shown once a part has finished its plan.
pub const COMPLETED_STEP_LABEL: &str = "Completed";

/// Current step, plan length, and completion percentage of a part.
///
/// Always recomputed from the part's own instances; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Name of the step the part is on, or [`COMPLETED_STEP_LABEL`].
    pub current_step_name: String,
    /// Number of instances in the part's plan.
    pub total_steps: u32,
    /// `(current_step_index + 1) / total_steps * 100`, or `0` without steps.
    pub progress_percent: f64,
}

impl StepInfo {
    /// Computes the view for `part` from its instances in any order.
    #[must_use]
    pub fn compute(part: &Part, instances: &[ProcessInstance]) -> Self {
        let mut ordered: Vec<&ProcessInstance> = instances.iter().collect();
        ordered.sort_by_key(|instance| instance.step_index());
        let total_steps = u32::try_from(ordered.len()).unwrap_or(u32::MAX);
        let index = part.current_step_index();

        let current = usize::try_from(index)
            .ok()
            .and_then(|position| ordered.get(position));
        let current_step_name = match (part.status(), current) {
            (ProcessStatus::Completed, _) | (_, None) => COMPLETED_STEP_LABEL.to_owned(),
            (_, Some(instance)) => instance.step_name().as_str().to_owned(),
        };

        Self {
            current_step_name,
            total_steps,
            progress_percent: progress_percent(index, total_steps),
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "progress is reported as a fractional percentage"
)]
fn progress_percent(current_step_index: u32, total_steps: u32) -> f64 {
    if total_steps == 0 {
        return 0.0;
    }
    let reached = f64::from(current_step_index.saturating_add(1)) * 100.0;
    reached / f64::from(total_steps)
}
