//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{credentials, redemption_codes};

/// Row read from the `credentials` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = credentials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable credential; `created_at` comes from the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = credentials)]
pub(crate) struct NewCredentialRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password: &'a str,
}

/// Row read from the `redemption_codes` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = redemption_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CodeRow {
    pub id: Uuid,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable code.
///
/// `created_at` is optional so fresh codes take the column default while
/// restored codes keep their original timestamp.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = redemption_codes)]
pub(crate) struct NewCodeRow<'a> {
    pub id: Uuid,
    pub value: &'a str,
    pub created_at: Option<DateTime<Utc>>,
}
