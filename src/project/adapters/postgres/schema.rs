//! Diesel schema for project persistence.

diesel::table! {
    /// Projects with their default step templates.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 200]
        name -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Ordered step template as a JSON array of strings.
        process_steps -> Jsonb,
        /// Creator of the project.
        created_by -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
