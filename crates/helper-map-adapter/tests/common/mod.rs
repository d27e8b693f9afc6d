/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for helper-map-adapter tests

use helper_map_adapter::{ClientConfig, HelperClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> HelperClient {
    HelperClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// A nearby task as the backend serializes it
pub fn task_json(id: i64, lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": "Lift Heavy Boxes",
        "reward": 15,
        "description": "Help move 5 boxes to the garage.",
        "lat": lat,
        "lng": lng,
        "type": "task"
    })
}
