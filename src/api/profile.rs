use serde_json::Value;

use crate::error::TripItError;
use crate::http::{Method, Transport, TripItClient};

impl<T: Transport> TripItClient<T> {
    /// The authenticated user's profile: name, email, settings.
    #[tracing::instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<Value, TripItError> {
        self.execute(Method::Get, "/get/profile", None).await
    }
}
