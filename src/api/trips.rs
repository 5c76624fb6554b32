//! Trip endpoints.

use std::str::FromStr;

use anyhow::anyhow;
use serde_json::{Map, Value};

use super::{DEFAULT_PAGE_SIZE, paginate};
use crate::error::TripItError;
use crate::http::{Method, Transport, TripItClient};

/// Whose trips to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traveler {
    /// Trips where the user travels.
    True,
    /// Trips the user plans for others.
    False,
    All,
}

impl Traveler {
    pub const ALL: [Traveler; 3] = [Traveler::True, Traveler::False, Traveler::All];

    pub fn as_str(&self) -> &'static str {
        match self {
            Traveler::True => "true",
            Traveler::False => "false",
            Traveler::All => "all",
        }
    }
}

impl std::fmt::Display for Traveler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Traveler {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Traveler::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown traveler filter '{}' (expected true, false or all)", s))
    }
}

/// Filters for `/list/trip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTripsParams {
    /// Completed trips instead of upcoming ones.
    pub past: bool,
    /// Only trips modified after this timestamp, for incremental sync.
    pub modified_since: Option<String>,
    /// Embed travel objects in the response.
    pub include_objects: bool,
    pub traveler: Option<Traveler>,
    pub page_num: u32,
    pub page_size: u32,
}

impl Default for ListTripsParams {
    fn default() -> Self {
        Self {
            past: false,
            modified_since: None,
            include_objects: false,
            traveler: None,
            page_num: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListTripsParams {
    fn to_query(&self) -> String {
        let mut params = Vec::new();
        if self.past {
            params.push("past=true".to_string());
        }
        if let Some(since) = &self.modified_since {
            params.push(format!("modified_since={}", urlencoding::encode(since)));
        }
        if self.include_objects {
            params.push("include_objects=true".to_string());
        }
        if let Some(traveler) = self.traveler {
            params.push(format!("traveler={}", traveler.as_str()));
        }
        paginate(&mut params, self.page_num, self.page_size);
        params.join("&")
    }
}

fn trip_body(trip_data: Map<String, Value>) -> Value {
    let mut body = Map::new();
    body.insert("Trip".to_string(), Value::Object(trip_data));
    Value::Object(body)
}

impl<T: Transport> TripItClient<T> {
    #[tracing::instrument(skip(self))]
    pub async fn list_trips(&self, params: &ListTripsParams) -> Result<Value, TripItError> {
        let endpoint = format!("/list/trip?{}", params.to_query());
        self.execute(Method::Get, &endpoint, None).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_trip(&self, trip_id: &str, include_objects: bool) -> Result<Value, TripItError> {
        let mut endpoint = format!("/get/trip/id/{}", trip_id);
        if include_objects {
            endpoint.push_str("?include_objects=true");
        }
        self.execute(Method::Get, &endpoint, None).await
    }

    /// Creates a trip from `display_name`, `start_date`, `end_date`,
    /// `primary_location` and friends.
    #[tracing::instrument(skip(self, trip_data))]
    pub async fn create_trip(&self, trip_data: Map<String, Value>) -> Result<Value, TripItError> {
        self.execute(Method::Post, "/create", Some(trip_body(trip_data)))
            .await
    }

    /// Full replacement, not a partial update.
    #[tracing::instrument(skip(self, trip_data))]
    pub async fn update_trip(
        &self,
        trip_id: &str,
        trip_data: Map<String, Value>,
    ) -> Result<Value, TripItError> {
        let endpoint = format!("/replace/trip/id/{}", trip_id);
        self.execute(Method::Post, &endpoint, Some(trip_body(trip_data)))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_trip(&self, trip_id: &str) -> Result<Value, TripItError> {
        let endpoint = format!("/delete/trip/id/{}", trip_id);
        self.execute(Method::Get, &endpoint, None).await
    }

    /// Full-text search over trips.
    #[tracing::instrument(skip(self))]
    pub async fn search_trips(
        &self,
        query: &str,
        past: bool,
        page_num: u32,
        page_size: u32,
    ) -> Result<Value, TripItError> {
        let mut params = vec![format!("search_text={}", urlencoding::encode(query))];
        if past {
            params.push("past=true".to_string());
        }
        paginate(&mut params, page_num, page_size);

        let endpoint = format!("/list/trip?{}", params.join("&"));
        self.execute(Method::Get, &endpoint, None).await
    }
}
