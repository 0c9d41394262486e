//! `PostgreSQL` repository implementation for parts and process instances.

use super::{
    models::{PartRow, ProcessInstanceRow},
    schema::{parts, process_instances},
};
use crate::database::PgPool;
use crate::identity::domain::UserId;
use crate::production::{
    domain::{
        Part, PartId, PartNumber, PersistedPartData, PersistedProcessInstanceData,
        ProcessInstance, ProcessInstanceId, ProcessStatus, ScanPurpose, ScanToken,
    },
    ports::{ProductionRepository, ProductionRepositoryError, ProductionRepositoryResult},
};
use crate::project::domain::{ProjectId, StepName};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed production repository.
///
/// Plan creation and the completion cascade each run in one transaction.
/// Status transitions use `UPDATE ... WHERE status = $expected`.
#[derive(Debug, Clone)]
pub struct PostgresProductionRepository {
    pool: PgPool,
}

impl PostgresProductionRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProductionRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProductionRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(ProductionRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProductionRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProductionRepository for PostgresProductionRepository {
    async fn store_part(
        &self,
        part: &Part,
        instances: &[ProcessInstance],
    ) -> ProductionRepositoryResult<()> {
        let part_id = part.id();
        let part_row = part_to_row(part)?;
        let instance_rows = instances
            .iter()
            .map(instance_to_row)
            .collect::<ProductionRepositoryResult<Vec<_>>>()?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, ProductionRepositoryError, _>(|tx| {
                diesel::insert_into(parts::table)
                    .values(&part_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ProductionRepositoryError::DuplicatePart(part_id)
                        }
                        _ => ProductionRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(process_instances::table)
                    .values(&instance_rows)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ProductionRepositoryError::DuplicateToken
                        }
                        _ => ProductionRepositoryError::persistence(err),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn find_part(&self, id: PartId) -> ProductionRepositoryResult<Option<Part>> {
        self.run_blocking(move |connection| {
            let row = parts::table
                .filter(parts::id.eq(id.into_inner()))
                .select(PartRow::as_select())
                .first::<PartRow>(connection)
                .optional()?;
            row.map(row_to_part).transpose()
        })
        .await
    }

    async fn list_parts(
        &self,
        project_id: Option<ProjectId>,
    ) -> ProductionRepositoryResult<Vec<Part>> {
        self.run_blocking(move |connection| {
            let mut query = parts::table
                .select(PartRow::as_select())
                .order((parts::created_at.asc(), parts::id.asc()))
                .into_boxed();
            if let Some(project) = project_id {
                query = query.filter(parts::project_id.eq(project.into_inner()));
            }
            let rows = query.load::<PartRow>(connection)?;
            rows.into_iter().map(row_to_part).collect()
        })
        .await
    }

    async fn delete_part(&self, id: PartId) -> ProductionRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ProductionRepositoryError, _>(|tx| {
                diesel::delete(
                    process_instances::table
                        .filter(process_instances::part_id.eq(id.into_inner())),
                )
                .execute(tx)?;
                let removed = diesel::delete(parts::table.filter(parts::id.eq(id.into_inner())))
                    .execute(tx)?;
                Ok(removed > 0)
            })
        })
        .await
    }

    async fn delete_parts_for_project(
        &self,
        project_id: ProjectId,
    ) -> ProductionRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ProductionRepositoryError, _>(|tx| {
                let owned_parts = parts::table
                    .filter(parts::project_id.eq(project_id.into_inner()))
                    .select(parts::id);
                diesel::delete(
                    process_instances::table.filter(process_instances::part_id.eq_any(owned_parts)),
                )
                .execute(tx)?;
                let removed = diesel::delete(
                    parts::table.filter(parts::project_id.eq(project_id.into_inner())),
                )
                .execute(tx)?;
                u64::try_from(removed).map_err(ProductionRepositoryError::persistence)
            })
        })
        .await
    }

    async fn find_instance_by_token(
        &self,
        token: &ScanToken,
        purpose: ScanPurpose,
    ) -> ProductionRepositoryResult<Option<ProcessInstance>> {
        let lookup = token.as_str().to_owned();
        self.run_blocking(move |connection| {
            let query = process_instances::table
                .select(ProcessInstanceRow::as_select())
                .into_boxed();
            let filtered = match purpose {
                ScanPurpose::Start => query.filter(process_instances::start_token.eq(lookup)),
                ScanPurpose::End => query.filter(process_instances::end_token.eq(lookup)),
            };
            let row = filtered
                .first::<ProcessInstanceRow>(connection)
                .optional()?;
            row.map(row_to_instance).transpose()
        })
        .await
    }

    async fn find_instance_at(
        &self,
        part_id: PartId,
        step_index: u32,
    ) -> ProductionRepositoryResult<Option<ProcessInstance>> {
        let index = to_db_index(step_index)?;
        self.run_blocking(move |connection| {
            let row = process_instances::table
                .filter(process_instances::part_id.eq(part_id.into_inner()))
                .filter(process_instances::step_index.eq(index))
                .select(ProcessInstanceRow::as_select())
                .first::<ProcessInstanceRow>(connection)
                .optional()?;
            row.map(row_to_instance).transpose()
        })
        .await
    }

    async fn list_instances(
        &self,
        part_id: PartId,
    ) -> ProductionRepositoryResult<Vec<ProcessInstance>> {
        self.run_blocking(move |connection| {
            let rows = process_instances::table
                .filter(process_instances::part_id.eq(part_id.into_inner()))
                .order(process_instances::step_index.asc())
                .select(ProcessInstanceRow::as_select())
                .load::<ProcessInstanceRow>(connection)?;
            rows.into_iter().map(row_to_instance).collect()
        })
        .await
    }

    async fn list_completed_instances(&self) -> ProductionRepositoryResult<Vec<ProcessInstance>> {
        self.run_blocking(|connection| {
            let rows = process_instances::table
                .filter(process_instances::status.eq(ProcessStatus::Completed.as_str()))
                .filter(process_instances::start_time.is_not_null())
                .filter(process_instances::end_time.is_not_null())
                .select(ProcessInstanceRow::as_select())
                .load::<ProcessInstanceRow>(connection)?;
            rows.into_iter().map(row_to_instance).collect()
        })
        .await
    }

    async fn begin_instance(
        &self,
        instance: &ProcessInstance,
        expected: ProcessStatus,
    ) -> ProductionRepositoryResult<()> {
        let instance_id = instance.id();
        let row = instance_to_row(instance)?;
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                process_instances::table
                    .filter(process_instances::id.eq(instance_id.into_inner()))
                    .filter(process_instances::status.eq(expected.as_str())),
            )
            .set((
                process_instances::status.eq(&row.status),
                process_instances::operator_id.eq(row.operator_id),
                process_instances::start_time.eq(row.start_time),
            ))
            .execute(connection)?;
            if updated == 0 {
                return Err(transition_rejected(connection, instance_id, expected));
            }
            Ok(())
        })
        .await
    }

    async fn complete_instance(
        &self,
        instance: &ProcessInstance,
        expected: ProcessStatus,
        part: &Part,
    ) -> ProductionRepositoryResult<()> {
        let instance_id = instance.id();
        let part_id = part.id();
        let instance_row = instance_to_row(instance)?;
        let part_row = part_to_row(part)?;
        self.run_blocking(move |connection| {
            connection.transaction::<_, ProductionRepositoryError, _>(|tx| {
                let completed = diesel::update(
                    process_instances::table
                        .filter(process_instances::id.eq(instance_id.into_inner()))
                        .filter(process_instances::status.eq(expected.as_str())),
                )
                .set((
                    process_instances::status.eq(&instance_row.status),
                    process_instances::end_time.eq(instance_row.end_time),
                ))
                .execute(tx)?;
                if completed == 0 {
                    return Err(transition_rejected(tx, instance_id, expected));
                }
                let advanced = diesel::update(parts::table.filter(parts::id.eq(part_row.id)))
                    .set((
                        parts::current_step_index.eq(part_row.current_step_index),
                        parts::status.eq(&part_row.status),
                    ))
                    .execute(tx)?;
                if advanced == 0 {
                    return Err(ProductionRepositoryError::PartNotFound(part_id));
                }
                Ok(())
            })
        })
        .await
    }
}

/// Explains why a conditional status update touched no rows.
fn transition_rejected(
    connection: &mut PgConnection,
    instance_id: ProcessInstanceId,
    expected: ProcessStatus,
) -> ProductionRepositoryError {
    let stored = process_instances::table
        .filter(process_instances::id.eq(instance_id.into_inner()))
        .select(process_instances::status)
        .first::<String>(connection)
        .optional();
    match stored {
        Ok(None) => ProductionRepositoryError::InstanceNotFound(instance_id),
        Ok(Some(raw)) => match ProcessStatus::try_from(raw.as_str()) {
            Ok(actual) => ProductionRepositoryError::StatusConflict {
                instance_id,
                expected,
                actual,
            },
            Err(err) => ProductionRepositoryError::persistence(err),
        },
        Err(err) => ProductionRepositoryError::persistence(err),
    }
}

fn to_db_index(index: u32) -> ProductionRepositoryResult<i32> {
    i32::try_from(index).map_err(ProductionRepositoryError::persistence)
}

fn from_db_index(index: i32) -> ProductionRepositoryResult<u32> {
    u32::try_from(index).map_err(ProductionRepositoryError::persistence)
}

fn part_to_row(part: &Part) -> ProductionRepositoryResult<PartRow> {
    Ok(PartRow {
        id: part.id().into_inner(),
        part_number: part.part_number().as_str().to_owned(),
        project_id: part.project_id().into_inner(),
        current_step_index: to_db_index(part.current_step_index())?,
        status: part.status().as_str().to_owned(),
        created_at: part.created_at(),
    })
}

fn row_to_part(row: PartRow) -> ProductionRepositoryResult<Part> {
    let PartRow {
        id,
        part_number,
        project_id,
        current_step_index,
        status,
        created_at,
    } = row;
    Ok(Part::from_persisted(PersistedPartData {
        id: PartId::from_uuid(id),
        part_number: PartNumber::new(part_number)
            .map_err(ProductionRepositoryError::persistence)?,
        project_id: ProjectId::from_uuid(project_id),
        current_step_index: from_db_index(current_step_index)?,
        status: ProcessStatus::try_from(status.as_str())
            .map_err(ProductionRepositoryError::persistence)?,
        created_at,
    }))
}

fn instance_to_row(instance: &ProcessInstance) -> ProductionRepositoryResult<ProcessInstanceRow> {
    Ok(ProcessInstanceRow {
        id: instance.id().into_inner(),
        part_id: instance.part_id().into_inner(),
        step_name: instance.step_name().as_str().to_owned(),
        step_index: to_db_index(instance.step_index())?,
        status: instance.status().as_str().to_owned(),
        operator_id: instance.operator_id().map(UserId::into_inner),
        start_time: instance.start_time(),
        end_time: instance.end_time(),
        start_token: instance.start_token().as_str().to_owned(),
        end_token: instance.end_token().as_str().to_owned(),
    })
}

fn row_to_instance(row: ProcessInstanceRow) -> ProductionRepositoryResult<ProcessInstance> {
    let ProcessInstanceRow {
        id,
        part_id,
        step_name,
        step_index,
        status,
        operator_id,
        start_time,
        end_time,
        start_token,
        end_token,
    } = row;
    Ok(ProcessInstance::from_persisted(PersistedProcessInstanceData {
        id: ProcessInstanceId::from_uuid(id),
        part_id: PartId::from_uuid(part_id),
        step_name: StepName::new(step_name).map_err(ProductionRepositoryError::persistence)?,
        step_index: from_db_index(step_index)?,
        status: ProcessStatus::try_from(status.as_str())
            .map_err(ProductionRepositoryError::persistence)?,
        operator_id: operator_id.map(UserId::from_uuid),
        start_time,
        end_time,
        start_token: ScanToken::new(start_token),
        end_token: ScanToken::new(end_token),
    }))
}
