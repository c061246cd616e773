//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

/// Build an HTTP client with the standard Zerthia configuration.
///
/// Config: 30s connect timeout, the given request timeout, rustls TLS,
/// `zerthia/{version}` user-agent, redirect limit 10.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client(request_timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(request_timeout)
        .user_agent(concat!("zerthia/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Client with a 60s request timeout, falling back to reqwest defaults if the
/// builder fails.
#[must_use]
pub fn default_client() -> reqwest::Client {
    build_client(Duration::from_secs(60)).unwrap_or_else(|e| {
        tracing::warn!("HTTP client builder failed, using defaults: {e}");
        reqwest::Client::new()
    })
}
