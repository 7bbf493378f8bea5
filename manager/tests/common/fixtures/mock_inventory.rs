//! Mock HTTP inventory server for testing
//!
//! Speaks the JSON API `HttpInventoryClient` expects without a real
//! inventory service running.

use serde_json::{json, Value};
use snapshot_manager::config::InventoryConfig;
use wiremock::{
    matchers::{method, path, path_regex, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub struct MockInventoryServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockInventoryServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    /// Client config pointing at this server
    pub fn inventory_config(&self) -> InventoryConfig {
        InventoryConfig {
            endpoint: self.base_url.clone(),
            ..Default::default()
        }
    }

    /// Mock the volume listing for the default eligibility filter
    pub async fn mock_volumes(&self, volumes: Value) {
        Mock::given(method("GET"))
            .and(path("/volumes"))
            .and(query_param("tag_key", "snapshotbackup"))
            .and(query_param("tag_value", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "volumes": volumes })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_snapshots(&self, volume_id: &str, snapshots: Value) {
        Mock::given(method("GET"))
            .and(path("/snapshots"))
            .and(query_param("volume_id", volume_id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshots": snapshots })))
            .mount(&self.server)
            .await;
    }

    /// Snapshot creation that must be called exactly `times` times
    pub async fn expect_create_snapshot(&self, snapshot: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path("/snapshots"))
            .respond_with(ResponseTemplate::new(200).set_body_json(snapshot))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn expect_create_tags(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    pub async fn expect_delete_snapshot(&self, snapshot_id: &str, times: u64) {
        Mock::given(method("DELETE"))
            .and(path(format!("/snapshots/{}", snapshot_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// No deletion of any snapshot may happen
    pub async fn forbid_deletes(&self) {
        Mock::given(method("DELETE"))
            .and(path_regex(r"^/snapshots/.+$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// Service error for every request to `endpoint` with `http_method`
    pub async fn mock_error(&self, http_method: &str, endpoint: &str, status_code: u16, error_msg: &str) {
        Mock::given(method(http_method))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(json!({
                "error": error_msg
            })))
            .mount(&self.server)
            .await;
    }
}
