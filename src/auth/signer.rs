//! OAuth 1.0a HMAC-SHA1 request signing.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use rand::{Rng, distributions::Alphanumeric};
use sha1::Sha1;
use url::Url;

use super::Credentials;
use crate::error::TripItError;
use crate::http::{Method, SignedHeaders};

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Produces the `Authorization` header for one request attempt.
///
/// Each call draws a fresh nonce and timestamp, so a signature is never
/// shared between attempts. The signer holds no mutable state.
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    credentials: Credentials,
}

impl OAuthSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Signs `method url` with an optional form-encoded body.
    pub fn sign(
        &self,
        method: Method,
        url: &Url,
        body: Option<&str>,
    ) -> Result<SignedHeaders, TripItError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TripItError::Signing(format!("system clock before epoch: {}", e)))?
            .as_secs();
        self.sign_with(method, url, body, &generate_nonce(), timestamp)
    }

    pub(crate) fn sign_with(
        &self,
        method: Method,
        url: &Url,
        body: Option<&str>,
        nonce: &str,
        timestamp: u64,
    ) -> Result<SignedHeaders, TripItError> {
        let timestamp = timestamp.to_string();
        let oauth_params = [
            ("oauth_consumer_key", self.credentials.consumer_key()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_token()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if let Some(body) = body {
            params.extend(
                url::form_urlencoded::parse(body.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned())),
            );
        }
        params.extend(
            oauth_params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );

        let base = signature_base_string(method, url, &params);
        let signature = self.hmac_sha1(&base)?;

        let mut header_params: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, encode(v)))
            .collect();
        header_params.push(format!("oauth_signature=\"{}\"", encode(&signature)));

        let mut headers = SignedHeaders::new();
        headers.insert(
            "Authorization".to_string(),
            format!("OAuth {}", header_params.join(", ")),
        );
        if body.is_some() {
            headers.insert("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string());
        }
        Ok(headers)
    }

    fn hmac_sha1(&self, base: &str) -> Result<String, TripItError> {
        let key = format!(
            "{}&{}",
            encode(self.credentials.consumer_secret()),
            encode(self.credentials.access_token_secret())
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| TripItError::Signing(format!("Failed to create HMAC: {}", e)))?;
        mac.update(base.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

/// RFC 3986 percent-encoding: everything but `A-Z a-z 0-9 - . _ ~`.
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

/// Scheme and host lowercased, default port dropped, no query or fragment.
fn base_string_uri(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    match url.port() {
        Some(port) => format!("{}://{}:{}{}", url.scheme(), host, port, url.path()),
        None => format!("{}://{}{}", url.scheme(), host, url.path()),
    }
}

fn signature_base_string(method: Method, url: &Url, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str(),
        encode(&base_string_uri(url)),
        encode(&normalized)
    )
}
