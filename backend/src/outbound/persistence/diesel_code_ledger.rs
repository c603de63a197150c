//! PostgreSQL-backed `CodeLedger`.
//!
//! `try_consume` is a single `DELETE ... WHERE value = $1 RETURNING *`. The
//! row lock it takes makes concurrent consumers of one value serialise, and
//! only the first sees the row. A unique index on `value` enforces
//! uniqueness for `add` and `restore`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CodeLedger, CodeLedgerError};
use crate::domain::{CodeId, CodeValue, RedemptionCode};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{CodeRow, NewCodeRow};
use super::pool::{DbPool, PoolError};
use super::schema::redemption_codes;

/// Diesel implementation of the [`CodeLedger`] port.
#[derive(Clone)]
pub struct DieselCodeLedger {
    pool: DbPool,
}

impl DieselCodeLedger {
    /// Create a store over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn insert(
        &self,
        row: NewCodeRow<'_>,
        value: &CodeValue,
    ) -> Result<RedemptionCode, CodeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = diesel::insert_into(redemption_codes::table)
            .values(&row)
            .returning(CodeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, "insert code", value))?;

        row_to_code(inserted)
    }
}

fn map_pool_error(error: PoolError) -> CodeLedgerError {
    CodeLedgerError::connection(error.into_message())
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &str,
    value: &CodeValue,
) -> CodeLedgerError {
    match classify_diesel_error(&error, operation) {
        DieselFailure::UniqueViolation => CodeLedgerError::duplicate_code(value.clone()),
        DieselFailure::Connection(message) => CodeLedgerError::connection(message),
        DieselFailure::Query(message) => CodeLedgerError::query(message),
    }
}

fn map_read_error(operation: &'static str) -> impl Fn(diesel::result::Error) -> CodeLedgerError {
    move |error| match classify_diesel_error(&error, operation) {
        DieselFailure::Connection(message) => CodeLedgerError::connection(message),
        DieselFailure::UniqueViolation => CodeLedgerError::query("unexpected unique violation"),
        DieselFailure::Query(message) => CodeLedgerError::query(message),
    }
}

fn row_to_code(row: CodeRow) -> Result<RedemptionCode, CodeLedgerError> {
    let value = CodeValue::parse(&row.value).map_err(|err| {
        CodeLedgerError::query(format!("corrupted code value in database: {err}"))
    })?;
    Ok(RedemptionCode {
        id: CodeId::from_uuid(row.id),
        value,
        created_at: row.created_at,
    })
}

#[async_trait]
impl CodeLedger for DieselCodeLedger {
    async fn add(&self, value: CodeValue) -> Result<RedemptionCode, CodeLedgerError> {
        let row = NewCodeRow {
            id: *CodeId::random().as_uuid(),
            value: value.as_str(),
            created_at: None,
        };
        self.insert(row, &value).await
    }

    async fn list(&self) -> Result<Vec<RedemptionCode>, CodeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CodeRow> = redemption_codes::table
            .select(CodeRow::as_select())
            .order_by((redemption_codes::created_at.desc(), redemption_codes::id))
            .load(&mut conn)
            .await
            .map_err(map_read_error("list codes"))?;

        rows.into_iter().map(row_to_code).collect()
    }

    async fn delete(&self, id: &CodeId) -> Result<(), CodeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(redemption_codes::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_read_error("delete code"))?;

        if deleted == 0 {
            return Err(CodeLedgerError::not_found(*id));
        }
        Ok(())
    }

    async fn try_consume(
        &self,
        value: &CodeValue,
    ) -> Result<Option<RedemptionCode>, CodeLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let consumed: Option<CodeRow> = diesel::delete(
            redemption_codes::table.filter(redemption_codes::value.eq(value.as_str())),
        )
        .returning(CodeRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_read_error("consume code"))?;

        consumed.map(row_to_code).transpose()
    }

    async fn restore(&self, code: &RedemptionCode) -> Result<(), CodeLedgerError> {
        let row = NewCodeRow {
            id: *code.id.as_uuid(),
            value: code.value.as_str(),
            created_at: Some(code.created_at),
        };
        self.insert(row, &code.value).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;
    use uuid::Uuid;

    fn value() -> CodeValue {
        CodeValue::parse("STEAM-AAAA").expect("valid code")
    }

    #[rstest]
    fn unique_violation_maps_to_duplicate_code() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );

        let err = map_diesel_error(diesel_err, "insert code", &value());
        assert_eq!(err, CodeLedgerError::duplicate_code(value()));
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, CodeLedgerError::Connection { .. }));
    }

    #[rstest]
    fn corrupted_rows_are_query_errors() {
        let err = row_to_code(CodeRow {
            id: Uuid::new_v4(),
            value: "   ".to_owned(),
            created_at: chrono::Utc::now(),
        })
        .expect_err("blank value");
        assert!(matches!(err, CodeLedgerError::Query { .. }));
    }

    #[rstest]
    fn rows_convert_to_normalised_codes() {
        let code = row_to_code(CodeRow {
            id: Uuid::new_v4(),
            value: "STEAM-AAAA".to_owned(),
            created_at: chrono::Utc::now(),
        })
        .expect("valid row");
        assert_eq!(code.value, value());
    }
}
