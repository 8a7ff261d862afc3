use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rift_tracker::api::state::AppState;
use rift_tracker::cache::{CacheGateway, FileCacheGateway};
use rift_tracker::config::AppConfig;
use rift_tracker::service::StatsService;
use rift_tracker::source::{RiotClientConfig, RiotMatchSource};

#[derive(Parser)]
#[command(name = "rift-tracker")]
#[command(about = "League of Legends stats backend with incremental cache refresh")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Inspect or clear the snapshot cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached snapshot keys
    Keys,

    /// Delete one cached snapshot
    Delete { key: String },

    /// Delete every cached snapshot
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", cli.config))?
    } else {
        AppConfig::default()
    };

    // Initialize tracing; CLI flag wins over the config file.
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting rift-tracker v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            let api_key = match std::env::var(&config.riot.api_key_env) {
                Ok(key) if !key.is_empty() => key,
                _ => bail!(
                    "Riot API key not found: set the {} environment variable",
                    config.riot.api_key_env
                ),
            };

            let source = RiotMatchSource::new(RiotClientConfig {
                api_key,
                timeout: Duration::from_secs(config.riot.timeout_seconds),
                ..Default::default()
            })?;

            let cache = FileCacheGateway::new(config.cache.data_dir.clone());
            let source = Arc::new(source);
            let cache: Arc<dyn CacheGateway> = Arc::new(cache);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState {
                service: Arc::new(StatsService::new(
                    source.clone(),
                    cache.clone(),
                    config.stats.window,
                )),
                source,
                cache,
                config: Arc::new(config),
            };

            let app = rift_tracker::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Cache { action } => {
            let cache = FileCacheGateway::new(config.cache.data_dir.clone());

            match action {
                CacheAction::Keys => {
                    let keys = cache.keys().await?;
                    if keys.is_empty() {
                        println!("Cache is empty.");
                    } else {
                        for key in &keys {
                            println!("{}", key);
                        }
                        println!("\n{} cached snapshot(s)", keys.len());
                    }
                }
                CacheAction::Delete { key } => {
                    if cache.del(&key).await? {
                        println!("Deleted: {}", key);
                    } else {
                        println!("Not found: {}", key);
                    }
                }
                CacheAction::Clear => {
                    let keys = cache.keys().await?;
                    let mut deleted = 0;
                    for key in &keys {
                        if cache.del(key).await? {
                            deleted += 1;
                        }
                    }
                    println!("Deleted {} cached snapshot(s)", deleted);
                }
            }
        }
    }

    Ok(())
}
