//! Request shapes sent to the Veil Mail API.

use reqwest::Method;
use serde_json::Value;
use std::fmt;

/// A single API call: verb, path (including any query string) and JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// A GET request without a body.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    /// A POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Query string builder that drops absent parameters.
///
/// Renders as an empty string when no parameter is present, otherwise as
/// `?key=value&...` with percent-encoded values in insertion order.
#[derive(Debug, Clone, Default)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key` when `value` is present. JSON `null` renders as `null`.
    pub fn param(mut self, key: impl Into<String>, value: Option<&Value>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key.into(), stringify(value)));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, urlencoding::encode(value))?;
        }
        Ok(())
    }
}

/// Percent-encode a value for use as a single path segment.
pub fn path_segment(value: &Value) -> String {
    urlencoding::encode(&stringify(value)).into_owned()
}

// Strings are used verbatim, everything else in its JSON text form.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
