//! Seeds a `PostgreSQL` database with a demo project and parts.
//!
//! Usage:
//!
//! ```text
//! shopfloor-seed [part-count]
//! ```
//!
//! Configuration is read the same way as every other Shopfloor component
//! (`.env`, `shopfloor.toml`, then `SHOPFLOOR__*` variables). The schema
//! under `migrations/` must already be applied. Each created part logs the
//! start and end token of every step so the codes can be printed.

use mockable::DefaultClock;
use shopfloor::config::{ConfigLoadError, ShopfloorConfig};
use shopfloor::database::build_pool;
use shopfloor::identity::domain::{IdentityError, Principal, UserId, UserRole, Username};
use shopfloor::production::{
    adapters::postgres::PostgresProductionRepository,
    services::{CreatePartRequest, ProductionServiceError, StepPlanService},
};
use shopfloor::project::{
    adapters::postgres::PostgresProjectRepository,
    services::{CreateProjectRequest, ProjectCatalogError, ProjectCatalogService},
};
use shopfloor::telemetry::{TelemetryError, init_tracing};
use std::env;
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_PART_COUNT: u32 = 3;
const MAX_PART_COUNT: u32 = 100;
const SEED_USERNAME: &str = "seed";
const DEMO_PROJECT: &str = "Demo gearbox housing";
const DEMO_TEMPLATE: [&str; 3] = ["Cutting", "Machining", "Inspection"];
const DEMO_PLAN: [&str; 4] = ["Hazırlık", "İşleme", "Kalite kontrol", "Paketleme"];

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
enum SeedError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error("failed to connect to PostgreSQL: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("failed to initialize runtime: {0}")]
    RuntimeInit(#[source] std::io::Error),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Catalog(#[from] ProjectCatalogError),

    #[error(transparent)]
    Production(#[from] ProductionServiceError),
}

fn main() -> Result<(), BoxError> {
    let part_count = parse_part_count(env::args().skip(1))?;
    let config = ShopfloorConfig::load().map_err(SeedError::from)?;
    init_tracing(&config.logging).map_err(SeedError::from)?;
    let runtime = build_runtime()?;
    runtime.block_on(seed(&config, part_count))?;
    Ok(())
}

fn parse_part_count(mut args: impl Iterator<Item = String>) -> Result<u32, SeedError> {
    let Some(raw) = args.next() else {
        return Ok(DEFAULT_PART_COUNT);
    };
    if let Some(extra) = args.next() {
        return Err(SeedError::InvalidArgs(format!(
            "unexpected argument '{extra}'"
        )));
    }
    let count: u32 = raw
        .parse()
        .map_err(|_| SeedError::InvalidArgs(format!("part count '{raw}' is not a number")))?;
    if count == 0 || count > MAX_PART_COUNT {
        return Err(SeedError::InvalidArgs(format!(
            "part count must be between 1 and {MAX_PART_COUNT}, got {count}"
        )));
    }
    Ok(count)
}

fn build_runtime() -> Result<tokio::runtime::Runtime, SeedError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(SeedError::RuntimeInit)
}

fn seed_principal() -> Result<Principal, SeedError> {
    Ok(Principal::new(
        UserId::new(),
        Username::new(SEED_USERNAME)?,
        UserRole::Admin,
    ))
}

fn part_number(ordinal: u32) -> String {
    format!("WO-{ordinal:04}")
}

async fn seed(config: &ShopfloorConfig, part_count: u32) -> Result<(), SeedError> {
    let pool = build_pool(&config.database)?;
    let clock = Arc::new(DefaultClock);
    let projects = Arc::new(PostgresProjectRepository::new(pool.clone()));
    let production = Arc::new(PostgresProductionRepository::new(pool));
    let catalog = ProjectCatalogService::new(
        Arc::clone(&projects),
        Arc::clone(&production),
        Arc::clone(&clock),
    );
    let plans = StepPlanService::new(production, projects, clock);
    let actor = seed_principal()?;

    let project = catalog
        .create_project(
            CreateProjectRequest::new(DEMO_PROJECT)
                .with_description("Seeded demo data")
                .with_steps(DEMO_TEMPLATE),
            &actor,
        )
        .await?;
    tracing::info!(project_id = %project.id(), name = DEMO_PROJECT, "seeded project");

    for ordinal in 1..=part_count {
        let number = part_number(ordinal);
        let part = plans
            .create_part(CreatePartRequest::new(number.as_str(), project.id()).with_steps(DEMO_PLAN))
            .await?;
        for pair in plans.list_scan_tokens(part.id()).await? {
            tracing::info!(
                part_number = %number,
                step_index = pair.step_index,
                step_name = %pair.step_name,
                start_token = %pair.start_token,
                end_token = %pair.end_token,
                "scan tokens"
            );
        }
    }
    tracing::info!(part_count, "seeding finished");
    Ok(())
}
