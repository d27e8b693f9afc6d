/*
[INPUT]:  User coordinate and the current nearby task set
[OUTPUT]: Nearby tasks, coarse server-side location, assistant task mirror
[POS]:    HTTP layer - location-scoped endpoints
[UPDATE]: When adding new location endpoints or changing response format
*/

use crate::http::{Result, HelperClient};
use crate::types::{Coordinate, NearbyResponse, StoreAvailableTasksRequest, Task};
use reqwest::Method;

impl HelperClient {
    /// Query open tasks around a coordinate
    ///
    /// GET /api/nearby?lat={lat}&lng={lng}
    pub async fn nearby(&self, at: Coordinate) -> Result<NearbyResponse> {
        let endpoint = format!("/api/nearby?lat={}&lng={}", at.latitude, at.longitude);
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }

    /// Coarse (IP based) location of the caller
    ///
    /// GET /api/geolocate
    pub async fn geolocate(&self) -> Result<Coordinate> {
        let builder = self.request(Method::GET, "/api/geolocate")?;
        self.send_json(builder).await
    }

    /// Mirror the rendered task set for the assistant
    ///
    /// POST /api/store_available_tasks
    pub async fn store_available_tasks(&self, tasks: &[Task]) -> Result<()> {
        let body = StoreAvailableTasksRequest {
            tasks: tasks.to_vec(),
        };
        let builder = self
            .request(Method::POST, "/api/store_available_tasks")?
            .json(&body);
        self.send_empty(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, HelperClient, HelperError};
    use crate::types::{Coordinate, Task};
    use rust_decimal::Decimal;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HelperClient {
        HelperClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
    }

    #[tokio::test]
    async fn test_nearby() {
        let server = MockServer::start().await;
        let mock_response = r#"{
            "tasks": [
                {
                    "id": 1,
                    "title": "Mow lawn",
                    "reward": 20,
                    "description": "Front and back garden.",
                    "lat": 51.5,
                    "lng": -0.09,
                    "type": "task"
                }
            ]
        }"#;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/nearby"))
            .and(query_param("lat", "51.505"))
            .and(query_param("lng", "-0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(mock_response, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .nearby(Coordinate::new(51.505, -0.1))
            .await
            .expect("nearby failed");

        let expected = vec![Task {
            id: 1,
            title: "Mow lawn".to_string(),
            description: "Front and back garden.".to_string(),
            reward: Decimal::from(20),
            lat: 51.5,
            lng: -0.09,
        }];
        assert_eq!(response.tasks, expected);
    }

    #[tokio::test]
    async fn test_nearby_bad_request_maps_to_api_error() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/api/nearby"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "Invalid coordinates"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .nearby(Coordinate::new(0.0, 0.0))
            .await
            .expect_err("400 should fail");

        match err {
            HelperError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "Invalid coordinates");
            }
            other => panic!("Expected Api error variant, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_geolocate() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/api/geolocate"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"lat": 40.7, "lng": -74.0})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let coordinate = client_for(&server).geolocate().await.expect("geolocate");
        assert_eq!(coordinate, Coordinate::new(40.7, -74.0));
    }

    #[tokio::test]
    async fn test_store_available_tasks_posts_task_list() {
        let server = MockServer::start().await;
        let task = Task {
            id: 7,
            title: "Car Wash".to_string(),
            description: "Wash my sedan in the driveway.".to_string(),
            reward: Decimal::from(20),
            lat: 40.71,
            lng: -74.01,
        };

        let _mock = Mock::given(method("POST"))
            .and(path("/api/store_available_tasks"))
            .and(body_json(serde_json::json!({
                "tasks": [{
                    "id": 7,
                    "title": "Car Wash",
                    "description": "Wash my sedan in the driveway.",
                    "reward": 20.0,
                    "lat": 40.71,
                    "lng": -74.01
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .store_available_tasks(&[task])
            .await
            .expect("store_available_tasks");
    }
}
