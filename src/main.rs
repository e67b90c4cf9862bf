use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rentdesk::{
    app::create_router, app_state::AppState, config::Config, db, scheduler::ReminderScheduler,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = db::init_pool(&config.database).await?;

    if config.scheduler.enabled {
        let scheduler = ReminderScheduler::new(pool.clone(), config.scheduler.clone());
        tokio::spawn(scheduler.run());
    }

    let addr = config.server_addr();
    let app = create_router(AppState::new(pool, config));

    info!("Rentdesk listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
