use std::sync::Arc;
use std::time::Duration;

use tokoku_hex::application::auth_service::AdminSeed;
use tokoku_hex::application::security::{JwtService, PasswordHasher};
use tokoku_hex::config::Config;
use tokoku_hex::inbound::http::{AppState, HttpServer, HttpServerConfig};
use tokoku_region::RegionClient;
use tokoku_repo::{build_repo, Repo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / JWT_SECRET / SERVER_PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let config = Config::from_env()?;
    let repo: Repo = build_repo(config.database_url.as_deref(), config.db_max_connections).await?;
    tracing::info!(backend = repo.backend(), "store ready");

    let regions = RegionClient::builder(&config.region_api_url)?
        .with_timeout(Duration::from_secs(config.region_api_timeout_secs))
        .build()?;

    let state = AppState::new(
        Arc::new(repo),
        Arc::new(regions),
        JwtService::new(&config.jwt_secret, config.jwt_expire_minutes),
        PasswordHasher::new(config.bcrypt_cost),
    );

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        let seed = AdminSeed::new(email.clone(), password.clone(), config.admin_phone.clone());
        state.auth.seed_admin(seed).await?;
    }

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(state, server_cfg).await?;
    http.run().await
}
