use std::env;

use crate::error::TripItError;

pub const ENV_CONSUMER_KEY: &str = "TRIPIT_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "TRIPIT_CONSUMER_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "TRIPIT_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "TRIPIT_ACCESS_TOKEN_SECRET";

/// OAuth 1.0a consumer and access-token pair. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_token_secret: String,
}

impl Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }

    /// Reads the four `TRIPIT_*` variables from the process environment.
    pub fn from_env() -> Result<Self, TripItError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds credentials from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TripItError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| TripItError::MissingCredential(key.to_string()))
        };

        Ok(Self::new(
            read(ENV_CONSUMER_KEY)?,
            read(ENV_CONSUMER_SECRET)?,
            read(ENV_ACCESS_TOKEN)?,
            read(ENV_ACCESS_TOKEN_SECRET)?,
        ))
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn access_token_secret(&self) -> &str {
        &self.access_token_secret
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"*********")
            .field("access_token", &mask(&self.access_token))
            .field("access_token_secret", &"*********")
            .finish()
    }
}

/// Keeps the last four characters of a token visible for debugging.
fn mask(value: &str) -> String {
    let visible: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("*********{}", visible)
}
