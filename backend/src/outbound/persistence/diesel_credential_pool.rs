//! PostgreSQL-backed `CredentialPool`.
//!
//! Random selection uses `ORDER BY random() LIMIT 1`. `take_any` locks the
//! chosen row with `FOR UPDATE SKIP LOCKED` inside a transaction so two
//! concurrent takers never receive the same credential.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::ports::{CredentialPool, CredentialPoolError};
use crate::domain::{Credential, CredentialId, NewCredential};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{CredentialRow, NewCredentialRow};
use super::pool::{DbPool, PoolError};
use super::schema::credentials;

diesel::define_sql_function! {
    /// PostgreSQL `random()`.
    fn random() -> Double;
}

/// Diesel implementation of the [`CredentialPool`] port.
#[derive(Clone)]
pub struct DieselCredentialPool {
    pool: DbPool,
}

impl DieselCredentialPool {
    /// Create a store over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CredentialPoolError {
    CredentialPoolError::connection(error.into_message())
}

fn map_diesel_error(operation: &'static str) -> impl Fn(diesel::result::Error) -> CredentialPoolError {
    move |error| match classify_diesel_error(&error, operation) {
        DieselFailure::Connection(message) => CredentialPoolError::connection(message),
        DieselFailure::UniqueViolation => CredentialPoolError::query("duplicate credential id"),
        DieselFailure::Query(message) => CredentialPoolError::query(message),
    }
}

fn row_to_credential(row: CredentialRow) -> Credential {
    Credential {
        id: CredentialId::from_uuid(row.id),
        username: row.username,
        password: row.password,
        created_at: row.created_at,
    }
}

#[async_trait]
impl CredentialPool for DieselCredentialPool {
    async fn add(&self, credential: NewCredential) -> Result<Credential, CredentialPoolError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewCredentialRow {
            id: *CredentialId::random().as_uuid(),
            username: credential.username(),
            password: credential.password(),
        };

        diesel::insert_into(credentials::table)
            .values(&row)
            .returning(CredentialRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(row_to_credential)
            .map_err(map_diesel_error("add credential"))
    }

    async fn list(&self) -> Result<Vec<Credential>, CredentialPoolError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CredentialRow> = credentials::table
            .select(CredentialRow::as_select())
            .order_by((credentials::created_at.desc(), credentials::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("list credentials"))?;

        Ok(rows.into_iter().map(row_to_credential).collect())
    }

    async fn delete(&self, id: &CredentialId) -> Result<(), CredentialPoolError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(credentials::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error("delete credential"))?;

        if deleted == 0 {
            return Err(CredentialPoolError::not_found(*id));
        }
        Ok(())
    }

    async fn pick_any(&self) -> Result<Option<Credential>, CredentialPoolError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        credentials::table
            .select(CredentialRow::as_select())
            .order(random())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(row_to_credential))
            .map_err(map_diesel_error("pick credential"))
    }

    async fn take_any(&self) -> Result<Option<Credential>, CredentialPoolError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let Some(row) = credentials::table
                    .select(CredentialRow::as_select())
                    .order(random())
                    .for_update()
                    .skip_locked()
                    .first::<CredentialRow>(conn)
                    .await
                    .optional()?
                else {
                    return Ok(None);
                };

                let id: Uuid = row.id;
                diesel::delete(credentials::table.find(id))
                    .execute(conn)
                    .await?;
                Ok(Some(row_to_credential(row)))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error("take credential"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(err, CredentialPoolError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );

        let err = map_diesel_error("list credentials")(diesel_err);
        assert!(matches!(err, CredentialPoolError::Connection { .. }));
    }

    #[rstest]
    fn rows_convert_without_loss() {
        let id = Uuid::new_v4();
        let created_at = chrono::Utc::now();
        let credential = row_to_credential(CredentialRow {
            id,
            username: "alice".to_owned(),
            password: "p1".to_owned(),
            created_at,
        });

        assert_eq!(credential.id, CredentialId::from_uuid(id));
        assert_eq!(credential.username, "alice");
        assert_eq!(credential.created_at, created_at);
    }
}
