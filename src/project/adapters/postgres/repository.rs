//! `PostgreSQL` repository implementation for project storage.

use super::{
    models::{NewProjectRow, ProjectRow},
    schema::projects,
};
use crate::database::PgPool;
use crate::identity::domain::UserId;
use crate::project::{
    domain::{PersistedProjectData, Project, ProjectId, ProjectName, StepName},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let new_row = to_new_row(project)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(projects::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(|connection| {
            let rows = projects::table
                .order((projects::created_at.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(projects::table.filter(projects::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            Ok(removed > 0)
        })
        .await
    }
}

fn to_new_row(project: &Project) -> ProjectRepositoryResult<NewProjectRow> {
    let process_steps = serde_json::to_value(project.process_steps())
        .map_err(ProjectRepositoryError::persistence)?;
    Ok(NewProjectRow {
        id: project.id().into_inner(),
        name: project.name().as_str().to_owned(),
        description: project.description().to_owned(),
        process_steps,
        created_by: project.created_by().into_inner(),
        created_at: project.created_at(),
    })
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        name,
        description,
        process_steps,
        created_by,
        created_at,
    } = row;
    let validated_name = ProjectName::new(name).map_err(ProjectRepositoryError::persistence)?;
    let steps = serde_json::from_value::<Vec<StepName>>(process_steps)
        .map_err(ProjectRepositoryError::persistence)?;
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(id),
        name: validated_name,
        description,
        process_steps: steps,
        created_by: UserId::from_uuid(created_by),
        created_at,
    }))
}
