//! OAuth 1.0a credentials and request signing.

mod credentials;
mod signer;

pub use credentials::{
    Credentials, ENV_ACCESS_TOKEN, ENV_ACCESS_TOKEN_SECRET, ENV_CONSUMER_KEY, ENV_CONSUMER_SECRET,
};
pub use signer::{FORM_CONTENT_TYPE, OAuthSigner};
