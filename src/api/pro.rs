//! Features that need a TripIt Pro subscription.

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;

use super::ObjectType;
use crate::error::TripItError;
use crate::http::{Method, Transport, TripItClient};

/// The parts of an air object the Pro helpers look at.
#[derive(Debug, Default, Deserialize)]
struct AirSummary {
    #[serde(rename = "Segment", default)]
    segments: Option<Segments>,
    #[serde(default)]
    alternate_flights_url: Option<String>,
}

/// TripIt sends a lone segment as an object rather than a one-element list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Segments {
    Many(Vec<Segment>),
    One(Segment),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(rename = "Status", default)]
    status: Option<IgnoredAny>,
}

impl AirSummary {
    /// Reads the `AirObject` inside a `get/air` response, or the response itself.
    fn from_response(response: &Value) -> Result<Self, TripItError> {
        let air = response.get("AirObject").unwrap_or(response);
        AirSummary::deserialize(air).map_err(|e| TripItError::MalformedResponse {
            status: 200,
            message: format!("unexpected air object: {}", e),
        })
    }

    fn first_segment(&self) -> Option<&Segment> {
        match self.segments.as_ref()? {
            Segments::Many(items) => items.first(),
            Segments::One(segment) => Some(segment),
            Segments::Other(_) => None,
        }
    }

    /// Live status is only populated for Pro accounts.
    fn has_flight_status(&self) -> bool {
        self.first_segment()
            .map_or(true, |segment| segment.status.is_some())
    }
}

impl<T: Transport> TripItClient<T> {
    /// Returns the air object with live `Status` per segment (delays,
    /// gates, baggage claim). Fails with [`TripItError::ProRequired`] when
    /// the account does not get status data.
    #[tracing::instrument(skip(self))]
    pub async fn get_flight_status(&self, air_id: &str) -> Result<Value, TripItError> {
        let result = self.get_object(ObjectType::Air, air_id).await?;

        if !AirSummary::from_response(&result)?.has_flight_status() {
            return Err(TripItError::ProRequired(
                "Flight status requires TripIt Pro subscription".to_string(),
            ));
        }
        Ok(result)
    }

    /// Loyalty and points programs.
    #[tracing::instrument(skip(self))]
    pub async fn list_points_programs(&self) -> Result<Value, TripItError> {
        self.execute(Method::Get, "/list/points_program", None)
            .await
    }

    /// Rebooking link for a flight, when TripIt offers one.
    #[tracing::instrument(skip(self))]
    pub async fn get_alternate_flights(&self, air_id: &str) -> Result<Option<String>, TripItError> {
        let result = self.get_object(ObjectType::Air, air_id).await?;
        Ok(AirSummary::from_response(&result)?.alternate_flights_url)
    }
}
