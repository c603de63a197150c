//! Builders wiring stores and services into the HTTP state.

use std::sync::Arc;

use keyvend::domain::ports::{CodeLedger, CredentialPool};
use keyvend::domain::{AdminService, RedemptionService};
use keyvend::inbound::http::state::{HttpState, HttpStatePorts};
use keyvend::outbound::auth::PasswordAuthenticator;
use keyvend::outbound::memory::{InMemoryCodeLedger, InMemoryCredentialPool};
use keyvend::outbound::persistence::{DieselCodeLedger, DieselCredentialPool};
use tracing::{info, warn};

use super::ServerConfig;

/// Build HTTP state backed by PostgreSQL when a pool is configured, and by
/// process-local stores otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => {
            info!(mode = %config.delivery_mode, "using PostgreSQL inventory stores");
            wire_services(
                Arc::new(DieselCredentialPool::new(pool.clone())),
                Arc::new(DieselCodeLedger::new(pool.clone())),
                config,
            )
        }
        None => {
            warn!(mode = %config.delivery_mode, "no database configured; inventory is held in memory");
            wire_services(
                Arc::new(InMemoryCredentialPool::default()),
                Arc::new(InMemoryCodeLedger::default()),
                config,
            )
        }
    }
}

fn wire_services<P, L>(pool: Arc<P>, ledger: Arc<L>, config: &ServerConfig) -> HttpState
where
    P: CredentialPool + 'static,
    L: CodeLedger + 'static,
{
    let redemption = Arc::new(RedemptionService::new(
        Arc::clone(&pool),
        Arc::clone(&ledger),
        config.delivery_mode,
    ));
    let admin = Arc::new(AdminService::new(pool, ledger));
    let authenticator = Arc::new(PasswordAuthenticator::new(&config.admin_password));

    HttpState::new(HttpStatePorts {
        redemption,
        admin,
        authenticator,
    })
    .with_operator_session_ttl(config.operator_session_ttl)
}
