// ABOUTME: Entry point for the promptos binary.
// ABOUTME: Parses CLI arguments, initializes tracing, and runs the server or the direct client commands.

mod desktop;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use promptos_agent::ProviderKind;
use promptos_core::ModelKey;
use promptos_server::{AppState, PromptosConfig, create_router};

#[derive(Debug, Parser)]
#[command(name = "promptos", version, about = "Turn a vague intent into prompts for Claude, GPT-4, Gemini, and Grok")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the web server (default).
    Serve {
        /// Socket address to bind, overriding PROMPTOS_BIND.
        #[arg(long)]
        bind: Option<SocketAddr>,
        /// LLM provider, overriding PROMPTOS_PROVIDER.
        #[arg(long)]
        provider: Option<ProviderKind>,
    },
    /// Generate prompts directly with the locally stored API key.
    Generate {
        /// What you want the prompts to accomplish.
        intent: String,
        /// Print only this model's prompt.
        #[arg(long)]
        only: Option<ModelKey>,
    },
    /// Manage the locally stored API key and preferences.
    Settings {
        #[command(subcommand)]
        action: desktop::SettingsAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "promptos=debug,promptos_server=debug,tower_http=debug",
                )
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve {
        bind: None,
        provider: None,
    }) {
        Command::Serve { bind, provider } => serve(bind, provider).await,
        Command::Generate { intent, only } => desktop::generate(&intent, only).await,
        Command::Settings { action } => desktop::settings(action),
    }
}

async fn serve(bind: Option<SocketAddr>, provider: Option<ProviderKind>) -> anyhow::Result<()> {
    let config = PromptosConfig::from_env()
        .and_then(|c| c.with_overrides(bind, provider))
        .context("invalid configuration")?;

    tracing::info!(
        bind = %config.bind,
        provider = %config.provider,
        auth = config.access_password.is_some(),
        "promptos starting up"
    );

    let state = Arc::new(
        AppState::from_config(&config).context("failed to create provider runtime")?,
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("listening on {}", config.public_base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("promptos shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
