//! HTTP service wiring

use anyhow::Result;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use store::{Database, DatabaseConfig, DigimonStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{
    create_digimon, delete_digimon, get_digimon, health, list_digimons, search_image,
    update_digimon,
};
use crate::image_lookup::{DigimonApiClient, ImageLookup, NoImageLookup, DEFAULT_IMAGE_API_URL};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: DigimonStore,
    pub image_lookup: Arc<dyn ImageLookup>,
}

impl AppState {
    pub fn new(store: DigimonStore, image_lookup: Arc<dyn ImageLookup>) -> Self {
        Self {
            store,
            image_lookup,
        }
    }
}

/// Image lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageLookupConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_api_url() -> String {
    DEFAULT_IMAGE_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ImageLookupConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ImageLookupConfig {
    pub fn build(&self) -> Result<Arc<dyn ImageLookup>> {
        if !self.enabled {
            info!("Image lookup disabled");
            return Ok(Arc::new(NoImageLookup));
        }
        info!("Image lookup via {}", self.api_url);
        let client =
            DigimonApiClient::new(self.api_url.clone(), Duration::from_secs(self.timeout_secs))?;
        Ok(Arc::new(client))
    }
}

/// DigiWorld service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub database: DatabaseConfig,
    pub image_lookup: ImageLookupConfig,
}

/// Build the application router
///
/// Routes are served both at the root and under `/api`. `/metrics` sits outside
/// the request metrics layer.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/digimons", get(list_digimons).post(create_digimon))
        .route(
            "/digimons/:id",
            get(get_digimon).put(update_digimon).delete(delete_digimon),
        )
        .route("/image-search", get(search_image))
        .route("/health", get(health));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(middleware::from_fn(monitoring::track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
        .merge(monitoring::create_metrics_router())
}

/// Main DigiWorld service
pub struct DigiWorldService {
    config: ServiceConfig,
    db: Arc<Database>,
    state: AppState,
}

impl DigiWorldService {
    /// Connect the database and build the image lookup
    pub async fn new(config: ServiceConfig) -> Result<Self> {
        let db = Arc::new(Database::connect(&config.database).await?);
        let store = DigimonStore::new(db.clone());
        let image_lookup = config.image_lookup.build()?;

        Ok(Self {
            config,
            db,
            state: AppState::new(store, image_lookup),
        })
    }

    /// Serve HTTP until `shutdown` resolves, then close the database
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.listen_addr;
        let app = create_router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

        info!("Starting DigiWorld service on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        info!("Closing database connections");
        self.db.close().await?;
        Ok(())
    }

    /// Get a handle to the database
    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
