//! Shared fixtures for production tests.

use std::sync::{Arc, Mutex};

use crate::identity::{
    adapters::{memory::InMemoryIdentityProvider, session::SessionTokenService},
    domain::{Principal, UserRole},
};
use crate::production::{
    adapters::memory::InMemoryProductionRepository,
    domain::Part,
    services::{
        CreatePartRequest, DurationReportService, ProgressService, ScanTransitionService,
        StepPlanService,
    },
};
use crate::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, ProjectName},
    ports::ProjectRepository,
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock that advances by a fixed step on every reading.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    pub fn at_shift_start(step: Duration) -> Self {
        let start = Utc
            .with_ymd_and_hms(2024, 3, 4, 8, 0, 0)
            .single()
            .expect("valid start timestamp");
        Self::new(start, step)
    }

    /// Moves the clock forward by `by` without taking a reading.
    pub fn advance(&self, by: Duration) {
        let mut next = self.next.lock().expect("clock lock");
        *next += by;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock lock");
        let now = *next;
        *next = now + self.step;
        now
    }
}

pub type TestIdentity = InMemoryIdentityProvider<SteppingClock>;

/// Fully wired services over in-memory adapters.
pub struct World {
    pub clock: Arc<SteppingClock>,
    pub production: Arc<InMemoryProductionRepository>,
    pub projects: Arc<InMemoryProjectRepository>,
    pub identity: Arc<TestIdentity>,
    pub plans: StepPlanService<InMemoryProductionRepository, InMemoryProjectRepository, SteppingClock>,
    pub scans: ScanTransitionService<InMemoryProductionRepository, TestIdentity, SteppingClock>,
    pub progress: ProgressService<InMemoryProductionRepository, InMemoryProjectRepository>,
    pub reports:
        DurationReportService<InMemoryProductionRepository, InMemoryProjectRepository, TestIdentity>,
    pub operator: Principal,
    pub manager: Principal,
}

impl World {
    pub fn new() -> Self {
        let clock = Arc::new(SteppingClock::at_shift_start(Duration::minutes(
            15,
        )));
        let production = Arc::new(InMemoryProductionRepository::new());
        let projects = Arc::new(InMemoryProjectRepository::new());
        let identity = Arc::new(InMemoryIdentityProvider::new(
            SessionTokenService::new("test-secret", Duration::hours(1)),
            Arc::clone(&clock),
        ));
        let operator = identity
            .register("operator1", "password123", UserRole::Operator)
            .expect("operator registration")
            .principal();
        let manager = identity
            .register("manager1", "password123", UserRole::Manager)
            .expect("manager registration")
            .principal();
        Self {
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
            reports: DurationReportService::new(
                Arc::clone(&production),
                Arc::clone(&projects),
                Arc::clone(&identity),
            ),
            clock,
            production,
            projects,
            identity,
            operator,
            manager,
        }
    }

    pub async fn project_with_template(&self, name: &str, template: &[&str]) -> Project {
        let project = Project::new(
            ProjectName::new(name).expect("valid project name"),
            "",
            template.iter().copied(),
            self.manager.id(),
            &*self.clock,
        )
        .expect("valid project");
        self.projects
            .store(&project)
            .await
            .expect("project should store");
        project
    }

    pub async fn part_with_steps(&self, project: &Project, number: &str, steps: &[&str]) -> Part {
        self.plans
            .create_part(CreatePartRequest::new(number, project.id()).with_steps(steps.iter().copied()))
            .await
            .expect("part should be created")
    }
}
