//! DigiWorld Manager binary

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use digiworld::{DigiWorldService, ImageLookupConfig, ServiceConfig, DEFAULT_IMAGE_API_URL};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use store::database::mask_database_url;
use store::{seed_sample_data, Database, DatabaseConfig, DigimonStore};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[clap(name = "digiworld")]
#[clap(about = "DigiWorld Manager - manage a personal Digimon collection")]
struct Cli {
    #[clap(flatten)]
    database: DatabaseArgs,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DatabaseArgs {
    /// Database connection URL (MySQL, Postgres or SQLite)
    #[clap(
        long,
        global = true,
        env = "DATABASE_URL",
        default_value = "sqlite://digiworld.db?mode=rwc"
    )]
    database_url: String,

    /// Maximum database connections in pool
    #[clap(long, global = true, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    db_max_connections: u32,

    /// Log every SQL statement
    #[clap(long, global = true, env = "DATABASE_SQL_LOGGING")]
    db_sql_logging: bool,
}

impl DatabaseArgs {
    fn to_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            max_connections: self.db_max_connections,
            enable_sql_logging: self.db_sql_logging,
            ..DatabaseConfig::new(self.database_url.clone())
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Listen address for the HTTP server
        #[clap(long, default_value = "0.0.0.0:3000", env = "LISTEN_ADDR")]
        listen_addr: SocketAddr,

        /// Base URL of the Digimon artwork API
        #[clap(long, default_value = DEFAULT_IMAGE_API_URL, env = "IMAGE_API_URL")]
        image_api_url: String,

        /// Timeout for artwork API requests in seconds
        #[clap(long, default_value_t = 10, env = "IMAGE_API_TIMEOUT_SECS")]
        image_api_timeout_secs: u64,

        /// Disable the artwork lookup
        #[clap(long, env = "DISABLE_IMAGE_LOOKUP")]
        disable_image_lookup: bool,
    },

    /// Replace all records with the sample collection
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    monitoring::init_logging()?;

    info!("Database URL: {}", mask_database_url(&cli.database.database_url));

    match cli.command {
        Command::Serve {
            listen_addr,
            image_api_url,
            image_api_timeout_secs,
            disable_image_lookup,
        } => {
            monitoring::init_monitoring()?;

            let config = ServiceConfig {
                listen_addr,
                database: cli.database.to_config(),
                image_lookup: ImageLookupConfig {
                    enabled: !disable_image_lookup,
                    api_url: image_api_url,
                    timeout_secs: image_api_timeout_secs,
                },
            };

            let service = DigiWorldService::new(config)
                .await
                .context("Failed to start DigiWorld service")?;

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
                info!("Received shutdown signal");
            };

            service.run(shutdown).await?;
            info!("DigiWorld service stopped");
        }
        Command::Seed => {
            let db = Arc::new(
                Database::connect(&cli.database.to_config())
                    .await
                    .context("Failed to connect to database")?,
            );
            let store = DigimonStore::new(db.clone());

            let seeded = seed_sample_data(&store).await?;
            info!("Seeded {} digimons", seeded.len());
            println!("Seeded {} digimons", seeded.len());

            db.close().await?;
        }
    }

    Ok(())
}
