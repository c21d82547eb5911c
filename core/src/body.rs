//! Request bodies and `Content-Type` inference.

use serde_json::{Map, Value};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";

/// A request body as supplied by the caller.
///
/// Structured values are not a variant here; they go through
/// `HeaderedRequest::with_json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    None,
    Text(String),
    Bytes(Vec<u8>),
}

impl Body {
    pub(crate) fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Body::None => None,
            Body::Text(text) => Some(text.into_bytes()),
            Body::Bytes(bytes) => Some(bytes),
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&[u8]> for Body {
    fn from(bytes: &[u8]) -> Self {
        Body::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

impl<T: Into<Body>> From<Option<T>> for Body {
    fn from(body: Option<T>) -> Self {
        body.map_or(Body::None, Into::into)
    }
}

/// Pick a `Content-Type` for raw body bytes.
///
/// A JSON object is `application/json`, any other non-empty payload is
/// `text/plain`, and an empty payload gets nothing.
pub fn infer_content_type(bytes: &[u8]) -> Option<&'static str> {
    if is_json_object(bytes) {
        Some(APPLICATION_JSON)
    } else if !bytes.is_empty() {
        Some(TEXT_PLAIN)
    } else {
        None
    }
}

/// `true` if `bytes` decode into a string-keyed JSON map. The bare literal
/// `null` also decodes (into no map) and so counts.
pub fn is_json_object(bytes: &[u8]) -> bool {
    serde_json::from_slice::<Option<Map<String, Value>>>(bytes).is_ok()
}
