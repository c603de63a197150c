//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Deliverable credentials.
    credentials (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        username -> Varchar,
        password -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outstanding redemption codes. `value` carries a unique index.
    redemption_codes (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Normalised (trimmed, upper-case) code value.
        value -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(credentials, redemption_codes);
