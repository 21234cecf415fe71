pub mod config;
pub mod gateway;
pub mod models;
pub mod pipeline;

pub use gateway::client::FoundryClient;
pub use models::document::UploadedDocument;
pub use models::record::ExtractedRecord;
pub use pipeline::batch::{BatchCoordinator, BatchResult};
pub use pipeline::document::DocumentOutcome;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for embedders that do not install their own subscriber.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .ok();
}
