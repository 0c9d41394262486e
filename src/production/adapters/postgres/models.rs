//! Diesel row models for production persistence.

use super::schema::{parts, process_instances};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row for part records, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = parts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PartRow {
    /// Part identifier.
    pub id: uuid::Uuid,
    /// Work-order number.
    pub part_number: String,
    /// Referenced project.
    pub project_id: uuid::Uuid,
    /// Step pointer.
    pub current_step_index: i32,
    /// Status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Row for process instance records, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = process_instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProcessInstanceRow {
    /// Instance identifier.
    pub id: uuid::Uuid,
    /// Owning part.
    pub part_id: uuid::Uuid,
    /// Step name.
    pub step_name: String,
    /// Position within the plan.
    pub step_index: i32,
    /// Status.
    pub status: String,
    /// Operator who started the step.
    pub operator_id: Option<uuid::Uuid>,
    /// Start timestamp.
    pub start_time: Option<DateTime<Utc>>,
    /// End timestamp.
    pub end_time: Option<DateTime<Utc>>,
    /// Start token.
    pub start_token: String,
    /// End token.
    pub end_token: String,
}
