use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with fallbacks.
fn load_bind_addr() -> Result<SocketAddr, StartupError> {
    let (host, port) = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => (cfg.server.host, cfg.server.port),
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    format!("{}:{}", host, port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}:{}: {}", host, port, e)))
}

/// Router over a migrated database.
pub fn app(db: DatabaseConnection) -> Router {
    routes::build_router(ServerState::from_db(db), build_cors())
}

/// Public entry: connect, migrate, and serve until the listener fails.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let db = models::db::connect()
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(format!("migrations failed: {}", e)))?;
    info!("migrations applied");

    let addr = load_bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "starting shopcart service");
    axum::serve(listener, app(db)).await?;
    Ok(())
}
