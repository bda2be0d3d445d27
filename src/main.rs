use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heart_risk::{app, config::Config, services::auth::hash_password, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    if let Some(command) = args.next() {
        if command != "hash-password" {
            anyhow::bail!("unknown command '{}' (expected: hash-password <password>)", command);
        }
        let password = args.next().context("usage: heart-risk hash-password <password>")?;
        println!("{}", hash_password(&password)?);
        return Ok(());
    }

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config)
        .await
        .context("Failed to initialize application state")?;
    tracing::info!("✅ AppState initialized");

    let app = app::router(state);

    tracing::info!("🚀 Server listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
