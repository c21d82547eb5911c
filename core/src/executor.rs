//! Execution of a `ReadyRequest`.
//!
//! # Design
//! Validation runs in a fixed order (method, URL, deferred serialization
//! failure) before any I/O. There is no partial success: a call either
//! returns the response and its full body or an error, never both.

use std::collections::BTreeMap;

use tracing::Span;
use ureq::RequestBuilder;

use crate::builder::ReadyRequest;
use crate::error::RequestError;
use crate::http::{HttpMethod, Response};

impl ReadyRequest<'_> {
    /// Send the request and read the whole response body.
    ///
    /// Returns `BadMethod` for anything but `GET`/`POST`, `BadUrl` for an
    /// empty or unparseable URL, `Serialization` if `with_json` could not
    /// serialize its value, `Transport` when the HTTP stack fails and
    /// `BodyRead` when the body cannot be read to the end.
    #[tracing::instrument(
        name = "http_request",
        skip(self),
        fields(
            http.method = %self.method,
            http.url = %self.url,
            http.status_code = tracing::field::Empty,
        )
    )]
    pub fn execute(&self) -> Result<(Response, Vec<u8>), RequestError> {
        let result = self.dispatch();
        match &result {
            Ok((response, body)) => {
                Span::current().record("http.status_code", response.status);
                tracing::debug!(len = body.len(), "response received");
            }
            Err(e) => tracing::debug!(error = %e, "request failed"),
        }
        result
    }

    /// Same contract as `execute`, without the tracing span, for timing
    /// loops where subscriber overhead would skew the numbers.
    pub fn execute_benchmark(&self) -> Result<(Response, Vec<u8>), RequestError> {
        self.dispatch()
    }

    fn dispatch(&self) -> Result<(Response, Vec<u8>), RequestError> {
        let method: HttpMethod = self.method.parse()?;
        validate_url(&self.url)?;
        if let Some(reason) = &self.serialization_error {
            return Err(RequestError::Serialization(reason.clone()));
        }

        let agent = self.client.agent();
        let url = self.url.as_str();
        let body = self.body.as_deref().filter(|b| !b.is_empty());
        let sent = match method {
            HttpMethod::Get => {
                let request = with_headers(agent.get(url), &self.headers);
                match body {
                    Some(body) => request.force_send_body().send(body),
                    None => request.call(),
                }
            }
            HttpMethod::Post => {
                let request = with_headers(agent.post(url), &self.headers);
                match body {
                    Some(body) => request.send(body),
                    None => request.send_empty(),
                }
            }
        };
        let mut response = sent.map_err(RequestError::Transport)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(RequestError::BodyRead)?;

        Ok((Response { status, headers }, body))
    }
}

fn validate_url(url: &str) -> Result<(), RequestError> {
    if url.is_empty() {
        return Err(RequestError::BadUrl {
            url: String::new(),
            reason: "empty url".to_string(),
        });
    }
    url::Url::parse(url).map_err(|e| RequestError::BadUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Apply every staged header, replacing any default of the same name.
fn with_headers<B>(mut request: RequestBuilder<B>, headers: &BTreeMap<String, String>) -> RequestBuilder<B> {
    for (name, value) in wire_headers(headers) {
        request = request.header(name, value);
    }
    request
}

/// Collapse names that differ only by case: on the wire they are one
/// header. The entry that comes last in map order wins, spelling included.
fn wire_headers(headers: &BTreeMap<String, String>) -> Vec<(&str, &str)> {
    let mut by_name: BTreeMap<String, (&str, &str)> = BTreeMap::new();
    for (name, value) in headers {
        by_name.insert(name.to_ascii_lowercase(), (name.as_str(), value.as_str()));
    }
    by_name.into_values().collect()
}
