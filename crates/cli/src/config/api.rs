//! Storefront Service Config

use std::time::Duration;

use clap::Args;

use breakfast_app::api::HttpApiConfig;

/// Storefront service settings.
#[derive(Debug, Args)]
pub(crate) struct ApiConfig {
    /// Storefront service base URL
    #[arg(long, env = "BREAKFAST_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Per-request timeout in seconds; requests wait indefinitely when unset
    #[arg(long, env = "BREAKFAST_REQUEST_TIMEOUT_SECONDS")]
    pub request_timeout_seconds: Option<u64>,
}

impl ApiConfig {
    #[must_use]
    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }

    #[must_use]
    pub(crate) fn http_config(&self) -> HttpApiConfig {
        HttpApiConfig {
            base_url: self.api_url.clone(),
            timeout: self.timeout(),
        }
    }
}
