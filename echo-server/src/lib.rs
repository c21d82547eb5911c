use std::{collections::BTreeMap, time::Duration};

use axum::{
    body::Bytes,
    extract::Query,
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Fixed body served by `/json` and `/slow`.
pub const JSON_PAYLOAD: &str = r#"{"age":28}"#;

/// Fixed body served by `/text`.
pub const TEXT_PAYLOAD: &str = "text response";

/// What the server observed about a request, returned by `/inspect`.
///
/// Header names are lowercase; repeated headers are joined with `", "`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inspection {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Inspection {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[derive(Deserialize)]
pub struct Delay {
    #[serde(default)]
    pub ms: u64,
}

pub fn app() -> Router {
    Router::new()
        .route("/inspect", any(inspect))
        .route("/inspect/{tag}", any(inspect))
        .route("/echo", any(echo))
        .route("/json", any(json_payload))
        .route("/text", any(text_payload))
        .route("/slow", any(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn inspect(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Inspection> {
    let mut observed: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        observed
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    Json(Inspection {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: observed,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Return the request body unchanged, mirroring its `Content-Type` (or its
/// absence).
async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    let mut response = body.into_response();
    match headers.get(header::CONTENT_TYPE) {
        Some(content_type) => {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type.clone());
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }
    response
}

async fn json_payload() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], JSON_PAYLOAD)
}

async fn text_payload() -> &'static str {
    TEXT_PAYLOAD
}

async fn slow(Query(delay): Query<Delay>) -> impl IntoResponse {
    tokio::time::sleep(Duration::from_millis(delay.ms)).await;
    ([(header::CONTENT_TYPE, "application/json")], JSON_PAYLOAD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspection_serializes_to_json() {
        let inspection = Inspection {
            method: "POST".to_string(),
            path: "/inspect".to_string(),
            headers: BTreeMap::from([("snk".to_string(), "src".to_string())]),
            body: "hello".to_string(),
        };
        let json = serde_json::to_value(&inspection).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["headers"]["snk"], "src");
        assert_eq!(json["body"], "hello");
    }

    #[test]
    fn inspection_header_lookup_ignores_case() {
        let inspection = Inspection {
            method: "GET".to_string(),
            path: "/inspect".to_string(),
            headers: BTreeMap::from([("content-type".to_string(), "text/plain".to_string())]),
            body: String::new(),
        };
        assert_eq!(inspection.header("Content-Type"), Some("text/plain"));
        assert_eq!(inspection.header("x-missing"), None);
    }

    #[test]
    fn delay_defaults_to_zero() {
        let delay: Delay = serde_json::from_str("{}").unwrap();
        assert_eq!(delay.ms, 0);
    }

    #[test]
    fn json_payload_is_a_json_object() {
        let value: serde_json::Value = serde_json::from_str(JSON_PAYLOAD).unwrap();
        assert_eq!(value["age"], 28);
    }
}
