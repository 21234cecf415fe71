/// Application-level constants
pub const APP_NAME: &str = "Doclens";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default inference gateway (LLM Foundry proxy).
pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://llmfoundry.straive.com";

/// Default vision-understanding model (classification + field extraction).
pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-pro-latest";

/// Default text-understanding model (cross-document summary).
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_CONCURRENT_DOCUMENTS: usize = 4;
const DEFAULT_TRANSIENT_RETRIES: u32 = 2;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 250;

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "doclens=info"
}

/// Pipeline configuration: gateway endpoint, model names, and the
/// concurrency/retry knobs of the batch coordinator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub gateway_base_url: String,
    pub vision_model: String,
    pub text_model: String,
    /// Per-request timeout applied by the HTTP client.
    pub request_timeout_secs: u64,
    /// Upper bound on concurrently running document pipelines.
    pub max_concurrent_documents: usize,
    /// Retries for transient transport failures (connect/timeout).
    /// API error payloads are never retried.
    pub transient_retries: u32,
    /// Base delay for exponential backoff between transient retries.
    pub retry_base_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gateway_base_url: DEFAULT_GATEWAY_BASE_URL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_concurrent_documents: DEFAULT_MAX_CONCURRENT_DOCUMENTS,
            transient_retries: DEFAULT_TRANSIENT_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }
}

impl PipelineConfig {
    /// Config pointing at a custom gateway, keeping every other default.
    pub fn with_gateway(base_url: &str) -> Self {
        Self {
            gateway_base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}
