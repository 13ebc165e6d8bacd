use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use enrollhook::classifier::ClassifierStrategy;
use enrollhook::config::Config;
use enrollhook::handlers;
use enrollhook::models::ProductCatalog;
use enrollhook::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "enrollhook")]
#[command(about = "Registers paying customers with assessment providers")]
struct Cli {
    /// Path to the SO-number product table (overrides PRODUCT_TABLE_PATH)
    #[arg(long)]
    products: Option<String>,

    /// Classification strategy (overrides CLASSIFIER_STRATEGY)
    #[arg(long, value_enum)]
    strategy: Option<ClassifierStrategy>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enrollhook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    if let Some(path) = cli.products {
        config.product_table_path = path;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }

    if !config.disc.is_configured() {
        tracing::warn!("DISC_CREDENTIAL not set, primary provider registrations will fail");
    }
    if !config.harrason.is_configured() {
        tracing::info!("Harrason API not configured, those purchases will not be registered");
    }
    if config.mail.api_key.is_none() {
        tracing::warn!("MAIL_API_KEY not set, access emails will not be sent");
    }

    let catalog =
        ProductCatalog::load(&config.product_table_path).expect("Failed to load product table");

    let state = AppState::new(&config, catalog);
    tracing::info!(strategy = ?state.classifier.strategy(), "Classifier ready");
    let app = handlers::app(state).layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Webhook receiver listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
