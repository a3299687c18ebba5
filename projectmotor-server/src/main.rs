use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use projectmotor_axum::{AppConfig, AppContext, app_router};

mod server;

use crate::server::{listen_port, serve};

const DEFAULT_LOG_FILTER: &str = "projectmotor=debug,projectmotor_axum=debug,projectmotor_server=debug,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(origin = %config.origin, "Loaded configuration");

    let ctx = AppContext::init(config).await?;
    let app = app_router(ctx);

    serve(listen_port()?, app).await?;
    Ok(())
}
