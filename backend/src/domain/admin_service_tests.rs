//! Tests for the admin service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockCodeLedger, MockCredentialPool};
use chrono::Utc;
use rstest::{fixture, rstest};

#[fixture]
fn operator() -> OperatorContext {
    OperatorContext::new(Utc::now())
}

fn make_service(
    pool: MockCredentialPool,
    ledger: MockCodeLedger,
) -> AdminService<MockCredentialPool, MockCodeLedger> {
    AdminService::new(Arc::new(pool), Arc::new(ledger))
}

#[rstest]
#[tokio::test]
async fn add_credential_trims_and_stores(operator: OperatorContext) {
    let mut pool = MockCredentialPool::new();
    pool.expect_add()
        .withf(|credential| credential.username() == "alice" && credential.password() == "p1")
        .times(1)
        .returning(|credential| Ok(credential.into_credential(CredentialId::random(), Utc::now())));

    let service = make_service(pool, MockCodeLedger::new());

    let stored = service
        .add_credential(&operator, "  alice ", " p1 ")
        .await
        .expect("credential stored");
    assert_eq!(stored.username, "alice");
}

#[rstest]
#[case("", "p1", "username")]
#[case("alice", "  ", "password")]
#[tokio::test]
async fn add_credential_rejects_blank_fields(
    operator: OperatorContext,
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let service = make_service(MockCredentialPool::new(), MockCodeLedger::new());

    let err = service
        .add_credential(&operator, username, password)
        .await
        .expect_err("invalid input");
    match err {
        AdminError::InvalidInput { field: actual, .. } => assert_eq!(actual, field),
        other => panic!("expected invalid input, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn add_code_normalises_supplied_value(operator: OperatorContext) {
    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_add()
        .withf(|value| value.as_str() == "STEAM-AAAA")
        .times(1)
        .returning(|value| Ok(RedemptionCode::new(value, Utc::now())));

    let service = make_service(MockCredentialPool::new(), ledger);

    let code = service
        .add_code(&operator, Some(" steam-aaaa ".to_owned()))
        .await
        .expect("code stored");
    assert_eq!(code.value.as_str(), "STEAM-AAAA");
}

#[rstest]
#[tokio::test]
async fn add_code_reports_duplicates(operator: OperatorContext) {
    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_add()
        .times(1)
        .returning(|value| Err(CodeLedgerError::duplicate_code(value)));

    let service = make_service(MockCredentialPool::new(), ledger);

    let err = service
        .add_code(&operator, Some("steam-aaaa".to_owned()))
        .await
        .expect_err("duplicate");
    let expected = CodeValue::parse("STEAM-AAAA").expect("valid");
    assert_eq!(err, AdminError::DuplicateCode { value: expected });
    assert_eq!(Error::from(err).code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn add_code_rejects_blank_value(operator: OperatorContext) {
    let service = make_service(MockCredentialPool::new(), MockCodeLedger::new());

    let err = service
        .add_code(&operator, Some("   ".to_owned()))
        .await
        .expect_err("blank");
    assert!(matches!(err, AdminError::InvalidInput { field: "value", .. }));
}

#[rstest]
#[tokio::test]
async fn add_code_without_value_mints_one(operator: OperatorContext) {
    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_add()
        .withf(|value| value.as_str().starts_with("STEAM-"))
        .times(1)
        .returning(|value| Ok(RedemptionCode::new(value, Utc::now())));

    let service = make_service(MockCredentialPool::new(), ledger);

    let code = service.add_code(&operator, None).await.expect("minted");
    assert_eq!(code.value.as_str().len(), "STEAM-XXXX-XXXX-XXXX-XXXX".len());
}

#[rstest]
#[tokio::test]
async fn minting_retries_on_collision_then_gives_up(operator: OperatorContext) {
    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_add()
        .times(MINT_ATTEMPTS)
        .returning(|value| Err(CodeLedgerError::duplicate_code(value)));

    let service = make_service(MockCredentialPool::new(), ledger);

    let err = service.add_code(&operator, None).await.expect_err("collisions");
    assert!(matches!(err, AdminError::DuplicateCode { .. }));
}

#[rstest]
#[tokio::test]
async fn deleting_missing_credential_is_not_found(operator: OperatorContext) {
    let id = CredentialId::random();
    let mut pool = MockCredentialPool::new();
    pool.expect_delete()
        .times(1)
        .returning(|id| Err(CredentialPoolError::not_found(*id)));

    let service = make_service(pool, MockCodeLedger::new());

    let err = service
        .delete_credential(&operator, &id)
        .await
        .expect_err("not found");
    assert_eq!(
        err,
        AdminError::NotFound {
            resource: "credential",
            id: id.to_string(),
        }
    );
    assert_eq!(Error::from(err).code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn deleting_code_delegates_to_ledger(operator: OperatorContext) {
    let id = CodeId::random();
    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_delete()
        .withf(move |requested| *requested == id)
        .times(1)
        .returning(|_| Ok(()));

    let service = make_service(MockCredentialPool::new(), ledger);

    service
        .delete_code(&operator, &id)
        .await
        .expect("code deleted");
}

#[rstest]
#[tokio::test]
async fn listing_passes_store_order_through(operator: OperatorContext) {
    let newer = RedemptionCode::new(CodeValue::parse("STEAM-BBBB").expect("valid"), Utc::now());
    let older = RedemptionCode::new(CodeValue::parse("STEAM-AAAA").expect("valid"), Utc::now());
    let listed = vec![newer.clone(), older.clone()];

    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_list()
        .times(1)
        .return_once(move || Ok(listed));

    let service = make_service(MockCredentialPool::new(), ledger);

    let codes = service.list_codes(&operator).await.expect("listed");
    assert_eq!(codes, vec![newer, older]);
}

#[rstest]
#[case(CredentialPoolError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(CredentialPoolError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn store_failures_map_to_error_codes(
    operator: OperatorContext,
    #[case] failure: CredentialPoolError,
    #[case] expected: ErrorCode,
) {
    let mut pool = MockCredentialPool::new();
    pool.expect_list().times(1).return_once(move || Err(failure));

    let service = make_service(pool, MockCodeLedger::new());

    let err = service.list_credentials(&operator).await.expect_err("failure");
    assert_eq!(Error::from(err).code(), expected);
}
