//! Domain model for parts, process instances, and their derived views.

mod error;
mod ids;
mod instance;
mod part;
mod plan;
mod progress;
mod report;
mod status;
mod token;

pub use error::{ParseProcessStatusError, ProductionDomainError};
pub use ids::{PartId, PartNumber, ProcessInstanceId};
pub use instance::{PersistedProcessInstanceData, ProcessInstance};
pub use part::{Part, PersistedPartData};
pub use plan::StepPlan;
pub use progress::{COMPLETED_STEP_LABEL, StepInfo};
pub use report::{CompletedDuration, UNKNOWN_LABEL, duration_minutes};
pub use status::ProcessStatus;
pub use token::{ScanPurpose, ScanToken};
