use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use configs::{AppConfig, CorsConfig};
use migration::MigratorTrait;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use service::auth::{repo::seaorm::SeaOrmAuthRepository, AuthService};
use service::fleet::employee::ensure_bootstrap_admin;

use crate::routes::{self, auth::ServerState};

/// CORS limited to the configured origins, with cookies allowed.
pub fn build_cors(cfg: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origins = cfg
        .allowed_origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

/// Connect, migrate and seed the bootstrap admin.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    common::env::ensure_sqlite_dir(&cfg.database.url).await?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    match &cfg.auth.bootstrap_admin {
        Some(admin) => {
            ensure_bootstrap_admin(&db, admin).await?;
        }
        None => info!("no bootstrap admin configured"),
    }

    let repo = Arc::new(SeaOrmAuthRepository::new(db.clone()));
    let auth = AuthService::new(repo, Duration::from_secs(cfg.auth.session_ttl_secs), cfg.auth.session_capacity);
    Ok(ServerState { db, auth: Arc::new(auth) })
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = build_state(cfg).await?;
    let cors = build_cors(&cfg.cors)?;
    Ok(routes::build_router(state, cors))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        return std::future::pending().await;
    }
    info!("shutdown signal received");
}

/// Bind the configured address and serve until ctrl-c.
pub async fn serve(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .context("invalid server.host/server.port")?;
    info!(%addr, "starting railway backend");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}
