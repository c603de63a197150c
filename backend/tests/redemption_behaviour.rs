//! Behavioural tests for redemption over the in-memory stores.
//!
//! These exercise the full service stack: code normalisation, single-use
//! consumption under contention, rollback on an empty pool, and both
//! delivery modes.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use keyvend::domain::ports::{CodeLedger, CredentialPool};
use keyvend::domain::{
    AdminError, AdminService, CodeValue, DeliveryMode, NewCredential, OperatorContext,
    RedemptionError, RedemptionService,
};
use keyvend::outbound::memory::{InMemoryCodeLedger, InMemoryCredentialPool};
use rstest::{fixture, rstest};

type Redemption = RedemptionService<InMemoryCredentialPool, InMemoryCodeLedger>;

struct Inventory {
    pool: Arc<InMemoryCredentialPool>,
    ledger: Arc<InMemoryCodeLedger>,
}

impl Inventory {
    async fn with_credentials(self, names: &[&str]) -> Self {
        for name in names {
            self.pool
                .add(
                    NewCredential::try_new(*name, format!("{name}-pw"))
                        .expect("valid credential"),
                )
                .await
                .expect("credential stored");
        }
        self
    }

    async fn with_codes(self, codes: &[&str]) -> Self {
        for code in codes {
            self.ledger
                .add(CodeValue::parse(code).expect("valid code"))
                .await
                .expect("code stored");
        }
        self
    }

    fn redemption(&self, mode: DeliveryMode) -> Arc<Redemption> {
        Arc::new(RedemptionService::new(
            Arc::clone(&self.pool),
            Arc::clone(&self.ledger),
            mode,
        ))
    }

    fn admin(&self) -> AdminService<InMemoryCredentialPool, InMemoryCodeLedger> {
        AdminService::new(Arc::clone(&self.pool), Arc::clone(&self.ledger))
    }
}

#[fixture]
fn inventory() -> Inventory {
    Inventory {
        pool: Arc::new(InMemoryCredentialPool::default()),
        ledger: Arc::new(InMemoryCodeLedger::default()),
    }
}

#[rstest]
#[tokio::test]
async fn code_is_single_use_and_case_insensitive(inventory: Inventory) {
    let inventory = inventory
        .with_credentials(&["alice"])
        .await
        .with_codes(&["STEAM-AAAA"])
        .await;
    let service = inventory.redemption(DeliveryMode::Shared);

    let credential = service.redeem(" steam-aaaa ").await.expect("first redemption");
    assert_eq!(credential.username, "alice");
    assert_eq!(credential.password, "alice-pw");

    let second = service.redeem("STEAM-AAAA").await;
    assert_eq!(second, Err(RedemptionError::InvalidCode));

    assert!(inventory.ledger.list().await.expect("list codes").is_empty());
    assert_eq!(inventory.pool.list().await.expect("list pool").len(), 1);
}

#[rstest]
#[tokio::test]
async fn empty_pool_keeps_the_code(inventory: Inventory) {
    let inventory = inventory.with_codes(&["STEAM-BBBB"]).await;
    let service = inventory.redemption(DeliveryMode::Shared);

    let result = service.redeem("steam-bbbb").await;
    assert_eq!(result, Err(RedemptionError::NoInventory));

    let codes = inventory.ledger.list().await.expect("list codes");
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].value.as_str(), "STEAM-BBBB");

    inventory
        .pool
        .add(NewCredential::try_new("bob", "p2").expect("valid credential"))
        .await
        .expect("credential stored");
    let credential = service.redeem("STEAM-BBBB").await.expect("retry succeeds");
    assert_eq!(credential.username, "bob");
}

#[rstest]
#[case(DeliveryMode::Shared)]
#[case(DeliveryMode::Exclusive)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redemptions_of_one_code_succeed_once(
    inventory: Inventory,
    #[case] mode: DeliveryMode,
) {
    let inventory = inventory
        .with_credentials(&["alice", "bob"])
        .await
        .with_codes(&["STEAM-CCCC"])
        .await;
    let service = inventory.redemption(mode);

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.redeem("steam-cccc").await })
        })
        .collect();

    let mut delivered = 0;
    for outcome in join_all(handles).await {
        match outcome.expect("task completes") {
            Ok(_) => delivered += 1,
            Err(err) => assert_eq!(err, RedemptionError::InvalidCode),
        }
    }

    assert_eq!(delivered, 1);
    assert!(inventory.ledger.list().await.expect("list codes").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn exclusive_mode_delivers_each_credential_once(inventory: Inventory) {
    let codes = [
        "STEAM-0001",
        "STEAM-0002",
        "STEAM-0003",
        "STEAM-0004",
        "STEAM-0005",
    ];
    let inventory = inventory
        .with_credentials(&["alice", "bob", "carol"])
        .await
        .with_codes(&codes)
        .await;
    let service = inventory.redemption(DeliveryMode::Exclusive);

    let handles: Vec<_> = codes
        .iter()
        .map(|code| {
            let service = Arc::clone(&service);
            let code = (*code).to_owned();
            tokio::spawn(async move {
                let outcome = service.redeem(&code).await;
                (code, outcome)
            })
        })
        .collect();

    let mut usernames = HashSet::new();
    let mut exhausted = HashSet::new();
    for joined in join_all(handles).await {
        let (code, outcome) = joined.expect("task completes");
        match outcome {
            Ok(credential) => {
                assert!(usernames.insert(credential.username), "credential delivered twice");
            }
            Err(RedemptionError::NoInventory) => {
                exhausted.insert(CodeValue::parse(&code).expect("valid code"));
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(usernames.len(), 3);
    assert_eq!(exhausted.len(), 2);
    assert!(inventory.pool.list().await.expect("list pool").is_empty());
    let remaining: HashSet<CodeValue> = inventory
        .ledger
        .list()
        .await
        .expect("list codes")
        .into_iter()
        .map(|record| record.value)
        .collect();
    assert_eq!(remaining, exhausted);
}

#[rstest]
#[tokio::test]
async fn shared_mode_can_repeat_a_credential(inventory: Inventory) {
    let inventory = inventory
        .with_credentials(&["alice"])
        .await
        .with_codes(&["STEAM-DDDD", "STEAM-EEEE"])
        .await;
    let service = inventory.redemption(DeliveryMode::Shared);

    let first = service.redeem("STEAM-DDDD").await.expect("first");
    let second = service.redeem("STEAM-EEEE").await.expect("second");

    assert_eq!(first.id, second.id);
}

#[rstest]
#[tokio::test]
async fn admin_rejects_case_variant_duplicates(inventory: Inventory) {
    let admin = inventory.admin();
    let operator = OperatorContext::new(Utc::now());

    admin
        .add_code(&operator, Some("steam-ffff".to_owned()))
        .await
        .expect("first add");
    let duplicate = admin
        .add_code(&operator, Some("  STEAM-FFFF ".to_owned()))
        .await;

    assert!(matches!(
        duplicate,
        Err(AdminError::DuplicateCode { value }) if value.as_str() == "STEAM-FFFF"
    ));
    assert_eq!(admin.list_codes(&operator).await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test]
async fn redeemed_code_can_be_added_again(inventory: Inventory) {
    let inventory = inventory
        .with_credentials(&["alice"])
        .await
        .with_codes(&["STEAM-GGGG"])
        .await;
    let service = inventory.redemption(DeliveryMode::Shared);
    let admin = inventory.admin();
    let operator = OperatorContext::new(Utc::now());

    service.redeem("STEAM-GGGG").await.expect("redeemed");
    admin
        .add_code(&operator, Some("STEAM-GGGG".to_owned()))
        .await
        .expect("value is free again");

    service.redeem("steam-gggg").await.expect("redeemed again");
}
