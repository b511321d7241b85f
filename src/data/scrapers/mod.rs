//! Clients for the remote data sources

pub mod bbref;
pub mod stats_api;

use std::time::Duration;

/// Build a blocking HTTP client with the shared user agent and timeout.
pub fn build_client(timeout_secs: u64) -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .user_agent("nba-shots/0.1")
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .expect("Failed to create HTTP client")
}
