//! Shared world state for scan transition BDD scenarios.

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
    domain::{Part, ScanToken},
    services::{ProductionServiceError, ProgressService, ScanTransitionService, StepPlanService},
};
use shopfloor::project::{
    adapters::memory::InMemoryProjectRepository, domain::Project,
    services::ProjectCatalogService,
};

/// Identity provider used by the BDD world.
pub type TestIdentity = InMemoryIdentityProvider<DefaultClock>;

/// Scenario world wiring every service over in-memory adapters.
pub struct ShopfloorWorld {
    pub catalog:
        ProjectCatalogService<InMemoryProjectRepository, InMemoryProductionRepository, DefaultClock>,
    pub plans: StepPlanService<InMemoryProductionRepository, InMemoryProjectRepository, DefaultClock>,
    pub scans: ScanTransitionService<InMemoryProductionRepository, TestIdentity, DefaultClock>,
    pub progress: ProgressService<InMemoryProductionRepository, InMemoryProjectRepository>,
    pub operator: Principal,
    pub manager: Principal,
    pub project: Option<Project>,
    pub part: Option<Part>,
    pub last_part_result: Option<Result<Part, ProductionServiceError>>,
    pub last_scan_result: Option<Result<(), ProductionServiceError>>,
}

impl ShopfloorWorld {
    /// Creates a world with one operator and one manager registered.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let production = Arc::new(InMemoryProductionRepository::new());
        let projects = Arc::new(InMemoryProjectRepository::new());
        let identity = Arc::new(InMemoryIdentityProvider::new(
            SessionTokenService::new("bdd-secret", Duration::hours(1)),
            Arc::clone(&clock),
        ));
        let operator = identity
            .register("operator1", "password123", UserRole::Operator)
            .expect("operator registration should succeed")
            .principal();
        let manager = identity
            .register("manager1", "password123", UserRole::Manager)
            .expect("manager registration should succeed")
            .principal();

        Self {
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
                identity,
                Arc::clone(&clock),
            ),
            progress: ProgressService::new(production, projects),
            operator,
            manager,
            project: None,
            part: None,
            last_part_result: None,
            last_scan_result: None,
        }
    }

    /// Returns the project created by a previous step.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing project in scenario world"))
    }

    /// Returns the part created by a previous step.
    pub fn part(&self) -> Result<&Part, eyre::Report> {
        self.part
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing part in scenario world"))
    }

    /// Looks up the printed token pair of step `index` of the current part.
    pub fn tokens_at(&self, index: u32) -> Result<(ScanToken, ScanToken), eyre::Report> {
        let part_id = self.part()?.id();
        let pair = run_async(self.plans.list_scan_tokens(part_id))?
            .into_iter()
            .find(|pair| pair.step_index == index)
            .ok_or_else(|| eyre::eyre!("part has no step {index}"))?;
        Ok((pair.start_token, pair.end_token))
    }
}

impl Default for ShopfloorWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a comma-separated step list from a feature file.
pub fn step_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ShopfloorWorld {
    ShopfloorWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
