//! The request builder chain.
//!
//! # Design
//! Three stage types, each produced from the previous one by a `&self`
//! method that copies the accumulated state forward:
//!
//! `Client::get/post` → `PendingRequest` → `set_headers` → `HeaderedRequest`
//! → `with_body` / `with_json` → `ReadyRequest` → `execute`.
//!
//! A stage is never changed by a later one, so a `HeaderedRequest` can be
//! reused to send several different bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::body::{infer_content_type, Body, APPLICATION_JSON, CONTENT_TYPE};
use crate::client::Client;
use crate::config::StructuredBodyMode;

/// Stage 1: method and URL. The URL is not checked until execution.
#[derive(Debug, Clone)]
pub struct PendingRequest<'a> {
    client: &'a Client,
    method: String,
    url: String,
}

impl<'a> PendingRequest<'a> {
    pub(crate) fn new(client: &'a Client, method: &str, url: &str) -> Self {
        Self {
            client,
            method: method.to_string(),
            url: url.to_string(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Read `pairs` as alternating header names and values.
    ///
    /// An odd count pads the last name with an empty value. A repeated name
    /// keeps its last value.
    pub fn set_headers<I, S>(&self, pairs: I) -> HeaderedRequest<'a>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut headers = BTreeMap::new();
        let mut pairs = pairs.into_iter().map(Into::into);
        while let Some(name) = pairs.next() {
            let value = pairs.next().unwrap_or_default();
            headers.insert(name, value);
        }
        HeaderedRequest {
            client: self.client,
            method: self.method.clone(),
            url: self.url.clone(),
            headers,
        }
    }
}

/// Stage 2: method, URL and headers.
#[derive(Debug, Clone)]
pub struct HeaderedRequest<'a> {
    client: &'a Client,
    method: String,
    url: String,
    headers: BTreeMap<String, String>,
}

impl<'a> HeaderedRequest<'a> {
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Attach a text or byte body, inferring `Content-Type` from it.
    ///
    /// No body leaves the headers alone. Otherwise a JSON object becomes
    /// `application/json`, other non-empty content `text/plain`, and empty
    /// content gets no `Content-Type`.
    pub fn with_body(&self, body: impl Into<Body>) -> ReadyRequest<'a> {
        let body = body.into().into_bytes();
        let mut headers = self.headers.clone();
        if let Some(bytes) = &body {
            if let Some(content_type) = infer_content_type(bytes) {
                tracing::debug!(content_type, len = bytes.len(), "inferred body content type");
                set_content_type(&mut headers, content_type);
            }
        }
        self.ready(headers, body, None)
    }

    /// Attach a structured value as JSON.
    ///
    /// What happens depends on the client's `StructuredBodyMode`; see its
    /// variants.
    pub fn with_json<T: Serialize + ?Sized>(&self, value: &T) -> ReadyRequest<'a> {
        let serialized = serde_json::to_vec(value);
        match (self.client.structured_body_mode(), serialized) {
            (StructuredBodyMode::Serialize, Ok(bytes)) => {
                let mut headers = self.headers.clone();
                set_content_type(&mut headers, APPLICATION_JSON);
                self.ready(headers, Some(bytes), None)
            }
            (StructuredBodyMode::Serialize, Err(e)) => {
                tracing::debug!(error = %e, "structured body did not serialize");
                self.ready(self.headers.clone(), None, Some(e.to_string()))
            }
            (StructuredBodyMode::Legacy, Ok(_)) => {
                tracing::debug!("legacy mode: serialized body dropped");
                self.ready(self.headers.clone(), None, None)
            }
            (StructuredBodyMode::Legacy, Err(e)) => {
                tracing::debug!(error = %e, "legacy mode: sending empty json body");
                let mut headers = self.headers.clone();
                set_content_type(&mut headers, APPLICATION_JSON);
                self.ready(headers, Some(Vec::new()), None)
            }
        }
    }

    fn ready(
        &self,
        headers: BTreeMap<String, String>,
        body: Option<Vec<u8>>,
        serialization_error: Option<String>,
    ) -> ReadyRequest<'a> {
        ReadyRequest {
            client: self.client,
            method: self.method.clone(),
            url: self.url.clone(),
            headers,
            body,
            serialization_error,
        }
    }
}

/// Replace any caller spelling of `Content-Type` with the inferred value.
fn set_content_type(headers: &mut BTreeMap<String, String>, value: &str) {
    headers.retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_TYPE));
    headers.insert(CONTENT_TYPE.to_string(), value.to_string());
}

/// Stage 3: everything needed to send the request.
#[derive(Debug, Clone)]
pub struct ReadyRequest<'a> {
    pub(crate) client: &'a Client,
    pub(crate) method: String,
    pub(crate) url: String,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) serialization_error: Option<String>,
}

impl ReadyRequest<'_> {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}
