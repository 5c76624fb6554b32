//! Travel object endpoints (flights, lodging, cars, ...).

use std::str::FromStr;

use anyhow::anyhow;
use serde_json::{Map, Value};

use super::paginate;
use crate::error::TripItError;
use crate::http::{Method, Transport, TripItClient};

/// Kinds of TripIt objects addressable under `/list/{type}` and
/// `/get/{type}/id/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Air,
    Activity,
    Car,
    Parking,
    Cruise,
    Directions,
    Lodging,
    Map,
    Note,
    PointsProgram,
    Profile,
    Rail,
    Restaurant,
    Transport,
    Trip,
    Weather,
}

impl ObjectType {
    pub const ALL: [ObjectType; 16] = [
        ObjectType::Air,
        ObjectType::Activity,
        ObjectType::Car,
        ObjectType::Parking,
        ObjectType::Cruise,
        ObjectType::Directions,
        ObjectType::Lodging,
        ObjectType::Map,
        ObjectType::Note,
        ObjectType::PointsProgram,
        ObjectType::Profile,
        ObjectType::Rail,
        ObjectType::Restaurant,
        ObjectType::Transport,
        ObjectType::Trip,
        ObjectType::Weather,
    ];

    /// Path segment used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Air => "air",
            ObjectType::Activity => "activity",
            ObjectType::Car => "car",
            ObjectType::Parking => "parking",
            ObjectType::Cruise => "cruise",
            ObjectType::Directions => "directions",
            ObjectType::Lodging => "lodging",
            ObjectType::Map => "map",
            ObjectType::Note => "note",
            ObjectType::PointsProgram => "points_program",
            ObjectType::Profile => "profile",
            ObjectType::Rail => "rail",
            ObjectType::Restaurant => "restaurant",
            ObjectType::Transport => "transport",
            ObjectType::Trip => "trip",
            ObjectType::Weather => "weather",
        }
    }

    /// Top-level payload key for create/replace requests. `None` for kinds
    /// that cannot be written through the object endpoints.
    pub fn payload_key(&self) -> Option<&'static str> {
        match self {
            ObjectType::Air => Some("AirObject"),
            ObjectType::Lodging => Some("LodgingObject"),
            ObjectType::Car => Some("CarObject"),
            ObjectType::Rail => Some("RailObject"),
            ObjectType::Restaurant => Some("RestaurantObject"),
            ObjectType::Activity => Some("ActivityObject"),
            ObjectType::Note => Some("NoteObject"),
            ObjectType::Directions => Some("DirectionsObject"),
            ObjectType::Cruise => Some("CruiseObject"),
            ObjectType::Transport => Some("TransportObject"),
            ObjectType::Map => Some("MapObject"),
            ObjectType::Parking => Some("ParkingObject"),
            ObjectType::PointsProgram
            | ObjectType::Profile
            | ObjectType::Trip
            | ObjectType::Weather => None,
        }
    }

    fn writable_key(&self) -> Result<&'static str, TripItError> {
        self.payload_key()
            .ok_or_else(|| TripItError::UnsupportedObjectType(self.as_str().to_string()))
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown object type '{}'", s))
    }
}

impl<T: Transport> TripItClient<T> {
    /// Lists objects of one type, optionally restricted to a trip.
    #[tracing::instrument(skip(self))]
    pub async fn list_objects(
        &self,
        object_type: ObjectType,
        trip_id: Option<&str>,
        past: bool,
        page_num: u32,
        page_size: u32,
    ) -> Result<Value, TripItError> {
        let mut params = Vec::new();
        if let Some(trip_id) = trip_id {
            params.push(format!("trip_id={}", trip_id));
        }
        if past {
            params.push("past=true".to_string());
        }
        paginate(&mut params, page_num, page_size);

        let endpoint = format!("/list/{}?{}", object_type, params.join("&"));
        self.execute(Method::Get, &endpoint, None).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_object(
        &self,
        object_type: ObjectType,
        object_id: &str,
    ) -> Result<Value, TripItError> {
        let endpoint = format!("/get/{}/id/{}", object_type, object_id);
        self.execute(Method::Get, &endpoint, None).await
    }

    /// Creates an object, assigning it to `trip_id` when given.
    #[tracing::instrument(skip(self, object_data))]
    pub async fn create_object(
        &self,
        object_type: ObjectType,
        mut object_data: Map<String, Value>,
        trip_id: Option<&str>,
    ) -> Result<Value, TripItError> {
        let key = object_type.writable_key()?;
        if let Some(trip_id) = trip_id {
            object_data.insert("trip_id".to_string(), Value::String(trip_id.to_string()));
        }

        let mut body = Map::new();
        body.insert(key.to_string(), Value::Object(object_data));
        self.execute(Method::Post, "/create", Some(Value::Object(body)))
            .await
    }

    /// Replaces an object wholesale; TripIt has no partial update.
    #[tracing::instrument(skip(self, object_data))]
    pub async fn update_object(
        &self,
        object_type: ObjectType,
        object_id: &str,
        object_data: Map<String, Value>,
    ) -> Result<Value, TripItError> {
        let key = object_type.writable_key()?;

        let mut body = Map::new();
        body.insert(key.to_string(), Value::Object(object_data));
        let endpoint = format!("/replace/{}/id/{}", object_type, object_id);
        self.execute(Method::Post, &endpoint, Some(Value::Object(body)))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_object(
        &self,
        object_type: ObjectType,
        object_id: &str,
    ) -> Result<Value, TripItError> {
        let endpoint = format!("/delete/{}/id/{}", object_type, object_id);
        self.execute(Method::Get, &endpoint, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_client;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_object_type_round_trips_through_str() {
        for kind in ObjectType::ALL {
            assert_eq!(kind.as_str().parse::<ObjectType>().unwrap(), kind);
        }
        assert!("spaceship".parse::<ObjectType>().is_err());
    }

    #[test]
    fn test_payload_keys() {
        assert_eq!(ObjectType::Air.payload_key(), Some("AirObject"));
        assert_eq!(ObjectType::Lodging.payload_key(), Some("LodgingObject"));
        assert_eq!(ObjectType::Parking.payload_key(), Some("ParkingObject"));
        assert_eq!(ObjectType::Weather.payload_key(), None);
        assert_eq!(ObjectType::Trip.payload_key(), None);
        assert_eq!(
            ObjectType::ALL
                .iter()
                .filter(|t| t.payload_key().is_some())
                .count(),
            12
        );
    }

    #[tokio::test]
    async fn test_list_objects() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/list/air")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("trip_id".into(), "99".into()),
                Matcher::UrlEncoded("past".into(), "true".into()),
                Matcher::UrlEncoded("page_num".into(), "2".into()),
                Matcher::UrlEncoded("page_size".into(), "10".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"AirObject":[]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client
            .list_objects(ObjectType::Air, Some("99"), true, 2, 10)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, json!({"AirObject": []}));
    }

    #[tokio::test]
    async fn test_get_object() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/get/lodging/id/7")
            .match_query(Matcher::UrlEncoded("format".into(), "json".into()))
            .with_status(200)
            .with_body(r#"{"LodgingObject":{"id":"7"}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client.get_object(ObjectType::Lodging, "7").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result["LodgingObject"]["id"], "7");
    }

    #[tokio::test]
    async fn test_create_object_injects_trip_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/create")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded(
                    "json".into(),
                    json!({"CarObject": {"display_name": "Rental", "trip_id": "5"}}).to_string(),
                ),
            ]))
            .with_status(200)
            .with_body(r#"{"CarObject":{"id":"1"}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let data = json!({"display_name": "Rental"})
            .as_object()
            .cloned()
            .unwrap();
        let result = client
            .create_object(ObjectType::Car, data, Some("5"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result["CarObject"]["id"], "1");
    }

    #[tokio::test]
    async fn test_create_unsupported_type_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/create")
            .expect(0)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .create_object(ObjectType::Weather, Map::new(), None)
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err, TripItError::UnsupportedObjectType("weather".to_string()));
    }

    #[tokio::test]
    async fn test_update_object() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/replace/note/id/3")
            .match_body(Matcher::UrlEncoded(
                "json".into(),
                json!({"NoteObject": {"text": "hi"}}).to_string(),
            ))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let data = json!({"text": "hi"}).as_object().cloned().unwrap();
        client
            .update_object(ObjectType::Note, "3", data)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_unsupported_type() {
        let client = test_client("http://127.0.0.1:9");
        let err = client
            .update_object(ObjectType::Profile, "1", Map::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TripItError::UnsupportedObjectType(_)));
    }

    #[tokio::test]
    async fn test_delete_object_uses_get() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/delete/rail/id/12")
            .match_query(Matcher::UrlEncoded("format".into(), "json".into()))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = test_client(&server.url());
        client.delete_object(ObjectType::Rail, "12").await.unwrap();

        mock.assert_async().await;
    }
}
