//! Fluent, blocking HTTP request builder.
//!
//! # Overview
//! A request is built in stages and then executed:
//!
//! ```no_run
//! use fluent_request::Client;
//!
//! let client = Client::new();
//! let (response, body) = client
//!     .post("http://127.0.0.1:3000/inspect")
//!     .set_headers(["snk", "src"])
//!     .with_body(r#"{"name":"dan"}"#)
//!     .execute()?;
//! assert_eq!(response.status, 200);
//! # let _ = body;
//! # Ok::<(), fluent_request::RequestError>(())
//! ```
//!
//! # Design
//! - `Client` is immutable after construction and owns the timeout policy
//!   and the connection pool; share it freely across threads.
//! - Each stage borrows the previous one and returns a new value, so
//!   intermediate stages can be reused.
//! - `with_body` infers `Content-Type` from the body bytes: a JSON object is
//!   `application/json`, other non-empty content is `text/plain`.
//! - All failures come back as `RequestError`; nothing is retried.

pub mod body;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
mod executor;
pub mod http;

pub use body::Body;
pub use builder::{HeaderedRequest, PendingRequest, ReadyRequest};
pub use client::Client;
pub use config::{ClientConfig, StructuredBodyMode, Timeouts};
pub use error::RequestError;
pub use http::{HttpMethod, Response};
