//! Diesel schema for production persistence.

diesel::table! {
    /// Parts (work orders).
    parts (id) {
        /// Part identifier.
        id -> Uuid,
        /// Operator-facing work-order number.
        #[max_length = 100]
        part_number -> Varchar,
        /// Referenced project.
        project_id -> Uuid,
        /// Zero-based pointer into the part's instances.
        current_step_index -> Int4,
        /// Part status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Process instances owned by parts.
    process_instances (id) {
        /// Instance identifier.
        id -> Uuid,
        /// Owning part.
        part_id -> Uuid,
        /// Step name.
        #[max_length = 200]
        step_name -> Varchar,
        /// Zero-based position within the part's plan.
        step_index -> Int4,
        /// Instance status.
        #[max_length = 20]
        status -> Varchar,
        /// Operator who started the step.
        operator_id -> Nullable<Uuid>,
        /// Start timestamp.
        start_time -> Nullable<Timestamptz>,
        /// End timestamp.
        end_time -> Nullable<Timestamptz>,
        /// Token that begins the step.
        #[max_length = 64]
        start_token -> Varchar,
        /// Token that completes the step.
        #[max_length = 64]
        end_token -> Varchar,
    }
}

diesel::joinable!(process_instances -> parts (part_id));
diesel::allow_tables_to_appear_in_same_query!(parts, process_instances);
