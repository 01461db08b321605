//! HTTP client factory for completion requests.
//!
//! Every client carries the Banter User-Agent, tcp_nodelay, a connect
//! timeout and an overall request timeout.

use reqwest::Client;
use std::time::Duration;

/// User-Agent string for all HTTP requests
pub const USER_AGENT: &str = concat!("banter/", env!("CARGO_PKG_VERSION"));

/// Default overall timeout for a completion request (5 minutes)
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(300);

/// Timeout for establishing the TCP/TLS connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection pool idle timeout so DNS is re-resolved periodically.
pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Creates an HTTP client with a custom overall timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client, String> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .tcp_nodelay(true)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {e}"))
}
