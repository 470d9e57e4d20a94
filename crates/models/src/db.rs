use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Connect using pool settings from `configs`.
///
/// In-memory SQLite lives inside a single connection, so the pool is pinned to one.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let in_memory = cfg.url.contains(":memory:");
    let mut opt = ConnectOptions::new(cfg.url.clone());
    opt.max_connections(if in_memory { 1 } else { cfg.max_connections })
        .min_connections(if in_memory { 1 } else { cfg.min_connections })
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    if !in_memory {
        opt.idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs));
    }
    let db = Database::connect(opt).await?;
    info!(backend = ?db.get_database_backend(), in_memory, "database connected");
    Ok(db)
}
