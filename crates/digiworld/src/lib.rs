//! DigiWorld Manager HTTP service
//!
//! JSON API over the Digimon record store:
//!
//! - `GET/POST /digimons`
//! - `GET/PUT/DELETE /digimons/{id}`
//! - `GET /image-search?name=` artwork lookup
//! - `GET /health` and `GET /metrics`
//!
//! Every route is also served under `/api`.

pub mod envelope;
pub mod error;
pub mod handlers;
pub mod image_lookup;
pub mod service;

pub use envelope::ApiResponse;
pub use error::ApiError;
pub use image_lookup::{DigimonApiClient, ImageLookup, NoImageLookup, DEFAULT_IMAGE_API_URL};
pub use service::{create_router, AppState, DigiWorldService, ImageLookupConfig, ServiceConfig};
