use clap::{Parser, Subcommand};
use std::sync::Arc;

use coscup_bot_server::infrastructure::adapters::http::{router, AppContext};
use coscup_bot_server::infrastructure::adapters::line::LineClient;
use coscup_bot_server::infrastructure::bot::LocalCoscupBot;
use coscup_bot_server::infrastructure::config::Config;
use coscup_bot_server::infrastructure::storage::MemoryStore;
use coscup_bot_server::BotError;

#[derive(Parser)]
#[command(name = "coscup-bot-server")]
#[command(about = "COSCUP LINE bot webhook and admin server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Show version
    Version,
    /// Load the environment configuration and print it with secrets masked
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve().await {
                tracing::error!("Server stopped: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Version => {
            println!("coscup-bot-server v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::CheckConfig => check_config(),
    }
}

/// Init logging. INFO by default, DEBUG when the `DEBUG` flag is set.
fn init_logger(debug: bool) {
    let level = if debug { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(level.into()),
        )
        .init();
}

async fn serve() -> Result<(), BotError> {
    let config = Config::from_env();
    init_logger(config.as_ref().is_ok_and(|c| c.server.debug));
    let config = config?;
    tracing::info!("Init bot use config: {}", config.summary());

    let client = LineClient::new(config.credentials.clone());
    let validator = client.signature_validator();
    let store = Arc::new(MemoryStore::new());
    let bot = Arc::new(LocalCoscupBot::new(&config, validator, Arc::new(client), store));

    let app = router(AppContext::new(&config, bot));

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BotError::Network(format!("Failed to bind {}: {}", addr, e)))?;
    tracing::info!(
        "Listening on {} (production: {})",
        addr,
        config.server.production
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BotError::Network(e.to_string()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

fn check_config() {
    match Config::from_env() {
        Ok(config) => {
            let pretty = serde_json::to_string_pretty(&config.summary())
                .unwrap_or_else(|_| config.summary().to_string());
            println!("{}", pretty);
        }
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    }
}
