use anyhow::Context;
use tokio::net::TcpListener;

use vocab_tutor::{
    AppState,
    config::AppConfig,
    data::db,
    routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = AppConfig::from_env()?;

    // Database configuration
    let pool = db::build_pool(&config).context("Failed to create DB pool")?;
    {
        let mut conn = pool.get().context("Failed to get DB connection")?;
        db::run_migrations(&mut conn).context("Failed to create tables")?;
    }

    let bind_addr = config.bind_addr.clone();
    let app = routes::app(AppState::new(pool, config));

    // Start server
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    log::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
