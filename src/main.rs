use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use readlens::config::Config;
use readlens::server;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "readlens=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "OCR endpoint {} (poll every {:?}, at most {} checks)",
        config.endpoint,
        config.poll.interval,
        config.poll.max_attempts
    );

    let (state, listener) = match server::prepare(&config).await {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::serve(state, listener).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
