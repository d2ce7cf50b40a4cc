//! chat-rs: ShadowSpeak anonymous chat server
//!
//! Serves the shared feed and enforces the anonymous post quota.

use chat_rs::{ChatConfig, ChatServer, SessionStore};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chat-rs")]
#[command(about = "Anonymous group chat with per-session message quotas", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding the configuration (e.g., 0.0.0.0:8080)
    #[arg(short, long)]
    listen: Option<String>,
}

fn init_logging(config: &ChatConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "chat_rs={level},tower_http={level}",
            level = config.logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let loaded = match cli.config {
        Some(ref path) => ChatConfig::from_file(path),
        None => Ok(ChatConfig::development()),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ChatConfig::development());
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }

    init_logging(&config);
    info!("Starting chat-rs v{}", env!("CARGO_PKG_VERSION"));
    match cli.config {
        Some(ref path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No config file specified, using development defaults"),
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    let store = Arc::new(SessionStore::new().await);
    let server = ChatServer::new(&config, store);

    if let Err(e) = server.run().await {
        error!("Chat server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
