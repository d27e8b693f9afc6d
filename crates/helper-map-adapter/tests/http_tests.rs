/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for HTTP client
[POS]:    Integration tests - HTTP endpoints
[UPDATE]: When HTTP endpoints change
*/

mod common;

use std::time::Duration;

use common::{client_for, setup_mock_server, task_json};
use helper_map_adapter::{AcceptTaskRequest, ClientConfig, Coordinate, HelperClient, HelperError};
use tokio_test::assert_ok;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let client = assert_ok!(HelperClient::new());
    assert_eq!(client.base_url().as_str(), "http://127.0.0.1:5000/");
}

#[test]
fn test_client_with_config() {
    let config = ClientConfig::default();
    let _client = assert_ok!(HelperClient::with_config(config));
}

#[tokio::test]
async fn test_nearby_then_accept_first_task() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby"))
        .and(query_param("lat", "40.7"))
        .and(query_param("lng", "-74"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tasks": [task_json(1, 40.71, -74.01), task_json(2, 40.69, -73.99)]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/accept_task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "accepted"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let nearby = assert_ok!(client.nearby(Coordinate::new(40.7, -74.0)).await);
    assert_eq!(nearby.tasks.len(), 2);

    let request = AcceptTaskRequest::from(&nearby.tasks[0]);
    assert_eq!(request.id, 1);
    let ack = assert_ok!(client.accept_task(&request).await);
    assert!(ack.status.is_success());
}

#[tokio::test]
async fn test_nearby_without_tasks_field() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/nearby"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let nearby = assert_ok!(client_for(&server).nearby(Coordinate::new(0.0, 0.0)).await);
    assert!(nearby.tasks.is_empty());
}

#[tokio::test]
async fn test_slow_response_maps_to_timeout() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/geolocate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"lat": 1.0, "lng": 2.0}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        timeout: Duration::from_millis(200),
        connect_timeout: Duration::from_millis(200),
    };
    let client = assert_ok!(HelperClient::with_config_and_base_url(config, &server.uri()));
    let err = client.geolocate().await.expect_err("should time out");
    assert!(matches!(err, HelperError::Timeout { .. }));
    assert!(err.is_network());
}
