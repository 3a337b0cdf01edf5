use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use survey_wizard::demo::{run_print, run_walkthrough, Cli, Command};
use survey_wizard::{core::ConfigManager, start_web_server};
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Command::Walkthrough { seed, base_url }) => run_walkthrough(seed, &base_url),
        Some(Command::Print { state }) => run_print(&state),
        Some(Command::Serve) | None => serve().await,
    }
}

async fn serve() -> Result<()> {
    // Initialize logging first
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open("/tmp/minicoach.log")
        .expect("Failed to open log file");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive("info".parse().expect("Invalid log directive")),
        )
        .init();

    let port = std::env::var("ROCKET_PORT")
        .map_err(|_| anyhow::anyhow!("ROCKET_PORT environment variable not set"))?
        .parse::<u16>()
        .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;

    let config = ConfigManager::load()?;

    info!("Starting self-assessment wizard API server");
    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    info!("Base url: {}", config.environment.base_url);
    info!("Email service: {}", config.service.email_service_url);
    info!("Server: http://0.0.0.0:{}", port);

    start_web_server(config, port).await
}
