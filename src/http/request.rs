//! Request shapes that flow through the pipeline.

use std::collections::BTreeMap;

use serde_json::Value;
use url::Url;

/// HTTP methods the TripIt API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header names to values, as produced by the signer.
pub type SignedHeaders = BTreeMap<String, String>;

/// What a caller asks for: one logical API call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Path below the base URL, optionally with a query string.
    pub endpoint: String,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            endpoint: endpoint.into(),
            body: None,
        }
    }

    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            endpoint: endpoint.into(),
            body: Some(body),
        }
    }

    /// Resolves the wire URL: GET requests carry `format=json` in the query.
    pub(crate) fn resolve_url(&self, endpoint_url: String) -> String {
        match self.method {
            Method::Get if endpoint_url.contains('?') => format!("{}&format=json", endpoint_url),
            Method::Get => format!("{}?format=json", endpoint_url),
            Method::Post => endpoint_url,
        }
    }

    /// Form body `format=json&json=<percent-encoded JSON>`. Only POST
    /// carries a body; `null` or an empty object counts as no payload.
    pub(crate) fn encode_body(&self) -> Option<String> {
        let body = self.body.as_ref().filter(|body| !is_empty_payload(body))?;
        match self.method {
            Method::Post => Some(format!(
                "format=json&json={}",
                urlencoding::encode(&body.to_string())
            )),
            Method::Get => None,
        }
    }
}

fn is_empty_payload(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// One attempt's fully formed request. Never reused across attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<String>,
    pub headers: SignedHeaders,
}
