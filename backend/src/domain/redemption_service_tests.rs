//! Tests for the redemption service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockCodeLedger, MockCredentialPool};
use crate::domain::{CredentialId, NewCredential};
use chrono::Utc;
use rstest::rstest;

fn make_service(
    pool: MockCredentialPool,
    ledger: MockCodeLedger,
    mode: DeliveryMode,
) -> RedemptionService<MockCredentialPool, MockCodeLedger> {
    RedemptionService::new(Arc::new(pool), Arc::new(ledger), mode)
}

fn code(raw: &str) -> RedemptionCode {
    RedemptionCode::new(CodeValue::parse(raw).expect("valid code"), Utc::now())
}

fn credential(username: &str) -> Credential {
    NewCredential::try_new(username, "p1")
        .expect("valid credential")
        .into_credential(CredentialId::random(), Utc::now())
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn blank_input_is_rejected_before_touching_stores(#[case] raw: &str) {
    let service = make_service(
        MockCredentialPool::new(),
        MockCodeLedger::new(),
        DeliveryMode::Shared,
    );

    let err = service.redeem(raw).await.expect_err("blank input");
    assert_eq!(err, RedemptionError::InvalidInput(CodeValueError::Empty));
}

#[tokio::test]
async fn unknown_code_is_invalid_and_pool_untouched() {
    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_try_consume()
        .withf(|value| value.as_str() == "STEAM-ZZZZ")
        .times(1)
        .return_once(|_| Ok(None));

    let service = make_service(MockCredentialPool::new(), ledger, DeliveryMode::Shared);

    let err = service.redeem("steam-zzzz").await.expect_err("unknown code");
    assert_eq!(err, RedemptionError::InvalidCode);
    assert!(err.is_rejection());
}

#[tokio::test]
async fn shared_mode_picks_without_removing() {
    let consumed = code("STEAM-AAAA");
    let delivered = credential("alice");
    let expected = delivered.clone();

    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_try_consume()
        .times(1)
        .return_once(move |_| Ok(Some(consumed)));
    ledger.expect_restore().never();

    let mut pool = MockCredentialPool::new();
    pool.expect_pick_any()
        .times(1)
        .return_once(move || Ok(Some(delivered)));
    pool.expect_take_any().never();

    let service = make_service(pool, ledger, DeliveryMode::Shared);

    let credential = service.redeem("STEAM-AAAA").await.expect("redeemed");
    assert_eq!(credential, expected);
}

#[tokio::test]
async fn exclusive_mode_takes_the_credential() {
    let consumed = code("STEAM-AAAA");
    let delivered = credential("bob");

    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_try_consume()
        .times(1)
        .return_once(move |_| Ok(Some(consumed)));

    let mut pool = MockCredentialPool::new();
    pool.expect_pick_any().never();
    pool.expect_take_any()
        .times(1)
        .return_once(move || Ok(Some(delivered)));

    let service = make_service(pool, ledger, DeliveryMode::Exclusive);

    let credential = service.redeem("STEAM-AAAA").await.expect("redeemed");
    assert_eq!(credential.username, "bob");
}

#[tokio::test]
async fn empty_pool_restores_the_consumed_record() {
    let consumed = code("STEAM-BBBB");
    let consumed_id = consumed.id;
    let returned = consumed.clone();

    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_try_consume()
        .times(1)
        .return_once(move |_| Ok(Some(returned)));
    ledger
        .expect_restore()
        .withf(move |restored| restored.id == consumed_id)
        .times(1)
        .return_once(|_| Ok(()));

    let mut pool = MockCredentialPool::new();
    pool.expect_pick_any().times(1).return_once(|| Ok(None));

    let service = make_service(pool, ledger, DeliveryMode::Shared);

    let err = service.redeem("STEAM-BBBB").await.expect_err("no inventory");
    assert_eq!(err, RedemptionError::NoInventory);
}

#[tokio::test]
async fn rollback_yields_to_a_re_minted_code() {
    let consumed = code("STEAM-BBBB");
    let value = consumed.value.clone();

    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_try_consume()
        .times(1)
        .return_once(move |_| Ok(Some(consumed)));
    ledger
        .expect_restore()
        .times(1)
        .return_once(move |_| Err(CodeLedgerError::duplicate_code(value)));

    let mut pool = MockCredentialPool::new();
    pool.expect_take_any().times(1).return_once(|| Ok(None));

    let service = make_service(pool, ledger, DeliveryMode::Exclusive);

    let err = service.redeem("STEAM-BBBB").await.expect_err("no inventory");
    assert_eq!(err, RedemptionError::NoInventory);
}

#[tokio::test]
async fn failed_rollback_surfaces_as_storage_error() {
    let consumed = code("STEAM-BBBB");

    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_try_consume()
        .times(1)
        .return_once(move |_| Ok(Some(consumed)));
    ledger
        .expect_restore()
        .times(1)
        .return_once(|_| Err(CodeLedgerError::connection("database offline")));

    let mut pool = MockCredentialPool::new();
    pool.expect_pick_any().times(1).return_once(|| Ok(None));

    let service = make_service(pool, ledger, DeliveryMode::Shared);

    let err = service.redeem("STEAM-BBBB").await.expect_err("storage");
    assert!(matches!(err, RedemptionError::Storage { .. }));
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn pool_failure_restores_code_and_reports_storage_error() {
    let consumed = code("STEAM-CCCC");

    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_try_consume()
        .times(1)
        .return_once(move |_| Ok(Some(consumed)));
    ledger.expect_restore().times(1).return_once(|_| Ok(()));

    let mut pool = MockCredentialPool::new();
    pool.expect_pick_any()
        .times(1)
        .return_once(|| Err(CredentialPoolError::query("boom")));

    let service = make_service(pool, ledger, DeliveryMode::Shared);

    let err = service.redeem("STEAM-CCCC").await.expect_err("storage");
    match err {
        RedemptionError::Storage { message } => assert!(message.contains("boom")),
        other => panic!("expected storage error, got {other:?}"),
    }
}

#[tokio::test]
async fn ledger_failure_is_a_storage_error() {
    let mut ledger = MockCodeLedger::new();
    ledger
        .expect_try_consume()
        .times(1)
        .return_once(|_| Err(CodeLedgerError::connection("refused")));

    let service = make_service(MockCredentialPool::new(), ledger, DeliveryMode::Shared);

    let err = service.redeem("STEAM-AAAA").await.expect_err("storage");
    assert!(matches!(err, RedemptionError::Storage { .. }));
}

#[rstest]
#[case("shared", DeliveryMode::Shared)]
#[case(" Exclusive ", DeliveryMode::Exclusive)]
#[case("SHARED", DeliveryMode::Shared)]
fn delivery_mode_parses_case_insensitively(#[case] raw: &str, #[case] expected: DeliveryMode) {
    assert_eq!(raw.parse::<DeliveryMode>(), Ok(expected));
}

#[rstest]
fn unknown_delivery_mode_is_rejected() {
    let err = "lottery".parse::<DeliveryMode>().expect_err("unknown mode");
    assert!(err.to_string().contains("lottery"));
}

#[rstest]
fn shared_is_the_default_mode() {
    assert_eq!(DeliveryMode::default(), DeliveryMode::Shared);
}
