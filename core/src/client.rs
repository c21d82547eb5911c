//! Transport configuration and the entry points of the builder chain.
//!
//! # Design
//! `Client` owns the normalized timeouts and a `ureq::Agent` configured
//! with them once, at construction. Nothing about a `Client` changes
//! afterwards, so a single value can be shared by any number of threads;
//! each verb call starts an independent chain that only borrows it.
//!
//! Timeouts are coarse. The read deadline is fixed once when the call
//! starts and covers the response head and the whole body together; it is
//! never refreshed per read. A server that trickles bytes is cut off once
//! the deadline passes even if every single read is quick, and a head and a
//! body that each arrive inside the budget still fail if their sum does
//! not. The write deadline bounds sending the request.

use std::fmt;
use std::sync::Arc;

use ureq::Agent;

use crate::builder::PendingRequest;
use crate::config::{ClientConfig, StructuredBodyMode, Timeouts};

/// Reusable, thread-shareable HTTP client.
///
/// Cloning is cheap: clones share the same connection pool.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    timeouts: Timeouts,
    agent: Agent,
}

impl Client {
    /// Client with 3s connect, 10s read and 10s write timeouts.
    pub fn new() -> Self {
        Self::from_config(ClientConfig::default())
    }

    /// Client with the given timeouts in seconds. Any value `<= 0` falls
    /// back to its default (3 / 10 / 10).
    pub fn with_timeouts(connect_secs: i64, read_secs: i64, write_secs: i64) -> Self {
        Self::from_config(ClientConfig {
            connect_timeout_secs: connect_secs,
            read_timeout_secs: read_secs,
            write_timeout_secs: write_secs,
            ..ClientConfig::default()
        })
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let timeouts = config.timeouts();
        let agent = build_agent(&timeouts);
        tracing::debug!(
            connect = ?timeouts.connect,
            read = ?timeouts.read,
            write = ?timeouts.write,
            structured_body = ?config.structured_body,
            "http client configured"
        );
        Self {
            config: Arc::new(config),
            timeouts,
            agent,
        }
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn structured_body_mode(&self) -> StructuredBodyMode {
        self.config.structured_body
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn get(&self, url: &str) -> PendingRequest<'_> {
        self.request("GET", url)
    }

    pub fn post(&self, url: &str) -> PendingRequest<'_> {
        self.request("POST", url)
    }

    /// Stage a request with an arbitrary method. Only `GET` and `POST` are
    /// sent; anything else fails at execution with `BadMethod`.
    pub fn request(&self, method: &str, url: &str) -> PendingRequest<'_> {
        PendingRequest::new(self, method, url)
    }

    pub(crate) fn agent(&self) -> &Agent {
        &self.agent
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("timeouts", &self.timeouts)
            .field("structured_body", &self.config.structured_body)
            .finish_non_exhaustive()
    }
}

/// Map the three timeouts onto the agent.
///
/// The global timeout runs from the start of a call through the last body
/// byte, which makes it the coarse read deadline. Receive phases get no
/// budget of their own. Status codes are returned as data: a 404 or 500
/// still yields headers and body to the caller.
fn build_agent(timeouts: &Timeouts) -> Agent {
    Agent::config_builder()
        .timeout_connect(Some(timeouts.connect))
        .timeout_send_request(Some(timeouts.write))
        .timeout_send_body(Some(timeouts.write))
        .timeout_global(Some(timeouts.call_deadline()))
        .http_status_as_error(false)
        .build()
        .new_agent()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn new_uses_default_timeouts() {
        let client = Client::new();
        assert_eq!(client.timeouts(), Timeouts::default());
        assert_eq!(client.structured_body_mode(), StructuredBodyMode::Serialize);
    }

    #[test]
    fn with_timeouts_keeps_positive_values() {
        let t = Client::with_timeouts(1, 2, 4).timeouts();
        assert_eq!(t.connect, Duration::from_secs(1));
        assert_eq!(t.read, Duration::from_secs(2));
        assert_eq!(t.write, Duration::from_secs(4));
    }

    #[test]
    fn with_timeouts_replaces_non_positive_values() {
        let t = Client::with_timeouts(0, -1, 0).timeouts();
        assert_eq!(t, Timeouts::default());

        let t = Client::with_timeouts(5, 0, -3).timeouts();
        assert_eq!(t.connect, Duration::from_secs(5));
        assert_eq!(t.read, Duration::from_secs(10));
        assert_eq!(t.write, Duration::from_secs(10));
    }

    #[test]
    fn from_config_keeps_structured_body_mode() {
        let client = Client::from_config(ClientConfig {
            structured_body: StructuredBodyMode::Legacy,
            ..ClientConfig::default()
        });
        assert_eq!(client.structured_body_mode(), StructuredBodyMode::Legacy);
        assert_eq!(client.config().connect_timeout_secs, 3);
    }

    #[test]
    fn verbs_fix_the_method() {
        let client = Client::new();
        assert_eq!(client.get("http://localhost/a").method(), "GET");
        assert_eq!(client.post("http://localhost/a").method(), "POST");
        assert_eq!(client.request("PUT", "http://localhost/a").method(), "PUT");
        assert_eq!(client.get("http://localhost/a").url(), "http://localhost/a");
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }

    #[test]
    fn debug_shows_timeouts() {
        let rendered = format!("{:?}", Client::new());
        assert!(rendered.contains("timeouts"));
        assert!(rendered.contains("Serialize"));
    }
}
