use std::sync::Arc;

use docreader::config::Config;
use docreader::db::Database;
use docreader::routes::create_app;
use docreader::services::gateway::{Gateway, GeminiClient, OpenAiClient};
use docreader::services::state::{AppState, Gateways};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docreader=info,tower_http=debug".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("FATAL: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let db = Database::new(&config.db_path)?;
    tracing::info!(path = %config.db_path.display(), "invoice store opened");

    let gateways = Gateways {
        gemini: Arc::new(GeminiClient::new(config.gemini_api_key.clone())),
        openai: config
            .openai_api_key
            .clone()
            .map(|key| Arc::new(OpenAiClient::new(key)) as Arc<dyn Gateway>),
    };

    let app = create_app(AppState::new(db, gateways));
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    tracing::info!("API listening on {}", config.listen_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
