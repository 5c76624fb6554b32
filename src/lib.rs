pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;

pub use auth::Credentials;
pub use config::ClientConfig;
pub use error::TripItError;
pub use http::{Method, TripItClient};
