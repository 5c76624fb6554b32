use mockito::{Matcher, Server};
use serde_json::json;
use std::time::{Duration, Instant};
use tripit_client::{ClientConfig, Credentials, Method, TripItClient, TripItError};

fn client(base_url: &str, base_delay: Duration, min_interval: Duration) -> TripItClient {
    let credentials = Credentials::new("ck", "cs", "tok", "ts");
    let config = ClientConfig::default()
        .with_base_url(base_url)
        .with_base_delay(base_delay)
        .with_min_request_interval(min_interval)
        .with_timeout(Duration::from_secs(5));
    TripItClient::new(credentials, config).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_success_is_a_single_signed_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/list/trip")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("past".into(), "true".into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
        ]))
        .match_header(
            "authorization",
            Matcher::AllOf(vec![
                Matcher::Regex(r#"oauth_consumer_key="ck""#.into()),
                Matcher::Regex(r#"oauth_token="tok""#.into()),
                Matcher::Regex(r#"oauth_signature_method="HMAC-SHA1""#.into()),
            ]),
        )
        .with_status(200)
        .with_body(r#"{"Trip":[]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client(&server.url(), Duration::from_millis(10), Duration::ZERO);
    let body = client
        .execute(Method::Get, "/list/trip?past=true", None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(body, json!({"Trip": []}));
    client.shutdown().await;
}

#[test_log::test(tokio::test)]
async fn test_auth_failure_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/get/profile")
        .match_query(Matcher::Any)
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let client = client(&server.url(), Duration::from_millis(10), Duration::ZERO);
    let err = client.execute(Method::Get, "/get/profile", None).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err, TripItError::AuthExpired);
}

#[test_log::test(tokio::test)]
async fn test_rate_limited_responses_back_off_until_exhausted() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/list/trip")
        .match_query(Matcher::Any)
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let base = Duration::from_millis(100);
    let client = client(&server.url(), base, Duration::ZERO);

    let started = Instant::now();
    let err = client.execute(Method::Get, "/list/trip", None).await.unwrap_err();

    mock.assert_async().await;
    assert_eq!(err, TripItError::RetriesExhausted { attempts: 3 });
    assert!(started.elapsed() >= base * 3);
}

#[test_log::test(tokio::test)]
async fn test_post_sends_form_encoded_json() {
    let mut server = Server::new_async().await;
    let trip = json!({"Trip": {"display_name": "Kyoto & Osaka"}});
    let mock = server
        .mock("POST", "/create")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("format".into(), "json".into()),
            Matcher::UrlEncoded("json".into(), trip.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"Trip":{"id":"1"}}"#)
        .create_async()
        .await;

    let client = client(&server.url(), Duration::from_millis(10), Duration::ZERO);
    let body = client
        .execute(Method::Post, "/create", Some(trip))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(body["Trip"]["id"], "1");
}

#[test_log::test(tokio::test)]
async fn test_sequential_requests_respect_min_interval() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/get/profile")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .expect(3)
        .create_async()
        .await;

    let interval = Duration::from_millis(150);
    let client = client(&server.url(), Duration::from_millis(10), interval);

    let started = Instant::now();
    for _ in 0..3 {
        client.execute(Method::Get, "/get/profile", None).await.unwrap();
    }

    mock.assert_async().await;
    assert!(started.elapsed() >= interval * 2);
}

#[test_log::test(tokio::test)]
async fn test_client_reopens_after_shutdown() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/get/profile")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{}")
        .expect(2)
        .create_async()
        .await;

    let client = client(&server.url(), Duration::from_millis(10), Duration::ZERO);
    client.execute(Method::Get, "/get/profile", None).await.unwrap();
    client.shutdown().await;
    client.shutdown().await;
    client.execute(Method::Get, "/get/profile", None).await.unwrap();

    mock.assert_async().await;
}
