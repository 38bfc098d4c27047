//! # DigiWorld Monitoring
//!
//! Logging setup and Prometheus HTTP metrics shared by DigiWorld binaries.
//!
//! ## Logging
//!
//! `init_logging` reads `LOG_DESTINATION` ("console" or "file"), `LOG_DIR` and
//! `LOG_FILE_PREFIX`; the filter comes from `RUST_LOG`.
//!
//! ## Metrics
//!
//! - `digiworld_http_requests_total` - requests by method, route and status
//! - `digiworld_http_request_duration_seconds` - request latency histogram
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use monitoring::{init_logging, init_monitoring};
//!
//! fn main() -> Result<()> {
//!     init_logging()?;
//!     init_monitoring()?;
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, init_logging_with, LogDestination, LoggingConfig};
pub use metrics::{create_metrics_router, init_monitoring, record_http_request, track_http_metrics};
