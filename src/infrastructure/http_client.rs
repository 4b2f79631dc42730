// Shared HTTP client for Grafana and Graphite
use anyhow::Context;
use std::time::Duration;

/// Every request made through this client fails once `timeout_secs` elapse.
pub fn build_http_client(timeout_secs: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}
