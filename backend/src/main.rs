//! Backend entry-point: loads settings, prepares the stores, and serves the
//! redemption and admin endpoints.

mod server;

use std::ffi::OsString;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use keyvend::config::AppSettings;
use ortho_config::OrthoConfig;
use keyvend::inbound::http::health::HealthState;
use keyvend::inbound::http::session_config::{BuildMode, session_settings};
use keyvend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = build_server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

async fn build_server_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let session = session_settings(settings, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let delivery_mode = settings.delivery_mode().map_err(std::io::Error::other)?;
    let admin_password = settings.admin_password().map_err(std::io::Error::other)?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        admin_password,
    )
    .with_delivery_mode(delivery_mode)
    .with_operator_session_ttl(settings.operator_session_ttl());

    let Some(database_url) = settings.database_url() else {
        return Ok(config);
    };

    let migration_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;
    info!(%bind_addr, mode = %delivery_mode, "database pool ready");
    Ok(config.with_db_pool(pool))
}
