//! Orchestration services for production tracking.

mod error;
mod plan;
mod progress;
mod report;
mod scan;

pub use error::{ProductionServiceError, ProductionServiceResult};
pub use plan::{CreatePartRequest, ScanTokenPair, StepPlanService};
pub use progress::{DashboardEntry, PartStatusView, PartWithStepInfo, ProgressService};
pub use report::DurationReportService;
pub use scan::{ScanTransitionService, StepCompleted, StepStarted};
