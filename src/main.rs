//! Order Service - REST backend for customer orders
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────┐    ┌────────────┐
//! │  Config  │───▶│ Gateway  │───▶│ OrderService │───▶│ OrderStore │
//! │  (YAML)  │    │  (axum)  │    │   (rules)    │    │ (PG / mem) │
//! └──────────┘    └──────────┘    └──────────────┘    └────────────┘
//! ```
//!
//! Flags: `--env <name>` (default `dev`), `--host <addr>`, `--port <n>`,
//! `--generate-api-key` (print a fresh key and exit).

use std::sync::Arc;

use anyhow::Context;

use order_service::config::{AppConfig, StorageKind};
use order_service::db::Database;
use order_service::gateway::{self, auth::generate_api_key, state::AppState};
use order_service::orders::{MemoryOrderStore, OrderService, OrderStore, PgOrderStore};

fn get_arg(names: &[&str]) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if names.contains(&args[i].as_str()) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }
    None
}

fn get_env() -> String {
    get_arg(&["--env", "-e"]).unwrap_or_else(|| "dev".to_string())
}

fn has_flag(name: &str) -> bool {
    std::env::args().any(|a| a == name)
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn OrderStore>> {
    match config.storage {
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage, orders are lost on restart");
            Ok(Arc::new(MemoryOrderStore::new()))
        }
        StorageKind::Postgres => {
            let db = Database::connect_with(&config.database.url, &config.database)
                .await
                .context("Failed to connect to PostgreSQL")?;
            db.health_check()
                .await
                .context("PostgreSQL health check failed")?;

            let store = PgOrderStore::new(db.pool().clone());
            store
                .init_schema()
                .await
                .context("Failed to initialize order schema")?;
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if has_flag("--generate-api-key") {
        println!("{}", generate_api_key());
        return Ok(());
    }

    let env = get_env();
    let mut app_config = AppConfig::load(&env).with_context(|| format!("loading env '{}'", env))?;

    if let Some(host) = get_arg(&["--host"]) {
        app_config.server.host = host;
    }
    if let Some(port) = get_arg(&["--port"]) {
        app_config.server.port = port
            .parse()
            .with_context(|| format!("invalid --port '{}'", port))?;
    }

    let _log_guard = order_service::logging::init_logging(&app_config);

    tracing::info!(
        "Starting order_service {} ({}) in {} mode",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_GIT_HASH"),
        env
    );

    let store = open_store(&app_config).await?;
    tracing::info!("Order storage: {}", store.name());

    let state = Arc::new(AppState::new(
        OrderService::new(store),
        app_config.api_key.clone(),
    ));

    gateway::run_server(&app_config, state).await
}
