use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryStorage, PgStorage, Storage};

#[derive(Parser)]
#[command(name = "noteful-api")]
#[command(about = "Noteful API - folders and tags REST service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT / NOTEFUL_API_PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Use an in-process store instead of PostgreSQL")]
        memory: bool,
    },

    #[command(about = "Create the folders, tags and notes tables if missing, then exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env();
    info!("Starting Noteful API in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        memory: false,
    }) {
        Commands::Serve { port, memory } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let storage: Arc<dyn Storage> = if memory {
                info!("Using in-memory storage; data is lost on exit");
                Arc::new(MemoryStorage::new())
            } else {
                Arc::new(connect(&config).await?)
            };
            crate::app::serve(config, storage).await
        }
        Commands::Migrate => {
            let storage = connect(&config).await?;
            storage.close().await;
            Ok(())
        }
    }
}

/// Open the pool and make sure the tables exist.
async fn connect(config: &AppConfig) -> anyhow::Result<PgStorage> {
    let pool = DatabaseManager::connect(&config.database).await?;
    let storage = PgStorage::new(pool);
    storage.migrate().await?;
    Ok(storage)
}
