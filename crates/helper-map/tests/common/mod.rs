/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for helper-map tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use helper_map::{DefaultView, LocalStorage, MapSession, MemoryMap};
use helper_map_adapter::{ClientConfig, HelperClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn client_for(server: &MockServer) -> HelperClient {
    HelperClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Client that gives up quickly, for exercising network failures.
pub fn impatient_client_for(server: &MockServer) -> HelperClient {
    let config = ClientConfig {
        timeout: Duration::from_millis(200),
        connect_timeout: Duration::from_millis(200),
    };
    HelperClient::with_config_and_base_url(config, &server.uri()).expect("client init")
}

pub async fn open_storage(dir: &tempfile::TempDir) -> Arc<LocalStorage> {
    Arc::new(LocalStorage::open(dir.path()).await.expect("storage"))
}

pub async fn session_with(
    client: HelperClient,
    storage: Arc<LocalStorage>,
) -> MapSession<MemoryMap> {
    MapSession::new(client, storage, MemoryMap::new(), DefaultView::default())
}

pub fn task_json(id: i64, title: &str, lat: f64, lng: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "reward": 20,
        "description": "...",
        "lat": lat,
        "lng": lng,
        "type": "task"
    })
}

/// Serve `tasks` for `/api/nearby?lat={lat}&lng={lng}`.
pub async fn mount_nearby(server: &MockServer, lat: &str, lng: &str, tasks: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/api/nearby"))
        .and(query_param("lat", lat))
        .and(query_param("lng", lng))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "tasks": tasks })))
        .mount(server)
        .await;
}

pub async fn mount_store_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/store_available_tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(server)
        .await;
}
