//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use chrono::Duration;
use mockable::DefaultClock;
use rstest::fixture;
use shopfloor::identity::{
    adapters::{memory::InMemoryIdentityProvider, session::SessionTokenService},
    domain::{Principal, UserRole},
};
use shopfloor::production::{
    adapters::memory::InMemoryProductionRepository,
    domain::Part,
    services::{
        CreatePartRequest, DurationReportService, ProgressService, ScanTokenPair,
        ScanTransitionService, StepPlanService,
    },
};
use shopfloor::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::Project,
    services::{CreateProjectRequest, ProjectCatalogService},
};

pub type TestIdentity = InMemoryIdentityProvider<DefaultClock>;
pub type TestCatalog =
    ProjectCatalogService<InMemoryProjectRepository, InMemoryProductionRepository, DefaultClock>;
pub type TestPlans =
    StepPlanService<InMemoryProductionRepository, InMemoryProjectRepository, DefaultClock>;
pub type TestScans = ScanTransitionService<InMemoryProductionRepository, TestIdentity, DefaultClock>;
pub type TestProgress = ProgressService<InMemoryProductionRepository, InMemoryProjectRepository>;
pub type TestReports =
    DurationReportService<InMemoryProductionRepository, InMemoryProjectRepository, TestIdentity>;

pub const OPERATOR_PASSWORD: &str = "line-operator-1";

/// All services of the shop floor wired over shared in-memory adapters.
pub struct Shopfloor {
    pub identity: Arc<TestIdentity>,
    pub catalog: TestCatalog,
    pub plans: TestPlans,
    pub scans: TestScans,
    pub progress: TestProgress,
    pub reports: TestReports,
    pub operator: Principal,
    pub manager: Principal,
}

impl Shopfloor {
    /// Creates a project owned by the manager.
    pub async fn project(&self, name: &str, template: &[&str]) -> eyre::Result<Project> {
        let request = CreateProjectRequest::new(name).with_steps(template.iter().copied());
        Ok(self.catalog.create_project(request, &self.manager).await?)
    }

    /// Creates a part of `project` with its own step plan.
    pub async fn part(&self, project: &Project, number: &str, steps: &[&str]) -> eyre::Result<Part> {
        let request =
            CreatePartRequest::new(number, project.id()).with_steps(steps.iter().copied());
        Ok(self.plans.create_part(request).await?)
    }

    /// Returns the printed token pairs of `part`.
    pub async fn tokens(&self, part: &Part) -> eyre::Result<Vec<ScanTokenPair>> {
        Ok(self.plans.list_scan_tokens(part.id()).await?)
    }

    /// Starts and completes every step of `part` in order.
    pub async fn run_all_steps(&self, part: &Part) -> eyre::Result<()> {
        for pair in self.tokens(part).await? {
            self.scans.begin_step(&pair.start_token, &self.operator).await?;
            self.scans.end_step(&pair.end_token, &self.operator).await?;
        }
        Ok(())
    }
}

#[fixture]
pub fn floor() -> Shopfloor {
    let clock = Arc::new(DefaultClock);
    let production = Arc::new(InMemoryProductionRepository::new());
    let projects = Arc::new(InMemoryProjectRepository::new());
    let identity = Arc::new(InMemoryIdentityProvider::new(
        SessionTokenService::new("integration-secret", Duration::hours(8)),
        Arc::clone(&clock),
    ));
    let operator = identity
        .register("ayse", OPERATOR_PASSWORD, UserRole::Operator)
        .expect("operator registration should succeed")
        .principal();
    let manager = identity
        .register("mehmet", "floor-manager-1", UserRole::Manager)
        .expect("manager registration should succeed")
        .principal();

    Shopfloor {
        catalog: ProjectCatalogService::new(
            Arc::clone(&projects),
            Arc::clone(&production),
            Arc::clone(&clock),
        ),
        plans: StepPlanService::new(
            Arc::clone(&production),
            Arc::clone(&projects),
            Arc::clone(&clock),
        ),
        scans: ScanTransitionService::new(
            Arc::clone(&production),
            Arc::clone(&identity),
            Arc::clone(&clock),
        ),
        progress: ProgressService::new(Arc::clone(&production), Arc::clone(&projects)),
        reports: DurationReportService::new(production, projects, Arc::clone(&identity)),
        identity,
        operator,
        manager,
    }
}
