use serde::Serialize;
use serde_json::{json, Value};

use crate::adapters::object_store::MapArchive;
use crate::handlers::gateway::{request_method, request_path, ApiGatewayResponse};
use crate::runtime::routes::{resolve_worlds_route, WorldsRoute};
use crate::runtime::storage_keys::{
    map_manifest_key, world_index_key, world_manifest_key, WORLD_INDEX_FILE,
};
use crate::runtime::worlds::{
    enrich_map_manifest, enrich_world_index, enrich_world_manifest, ProjectionError,
};

#[derive(Debug, Clone)]
pub struct WorldsHandlerConfig {
    /// Public URL the bucket contents are served under, without a
    /// trailing slash.
    pub base_url: String,
    /// Key prefix of the map archive, with its trailing slash.
    pub map_prefix: String,
    pub cors_origin: String,
}

pub fn handle_worlds_event(
    event: &Value,
    config: &WorldsHandlerConfig,
    archive: &dyn MapArchive,
) -> ApiGatewayResponse {
    let method = request_method(event);
    let path = request_path(event);

    match resolve_worlds_route(method, path) {
        WorldsRoute::Preflight => success_response(config, 200, json!({})),
        WorldsRoute::Index => serve_manifest(
            config,
            archive,
            &world_index_key(&config.map_prefix),
            format!("{WORLD_INDEX_FILE} not found"),
            |manifest| enrich_world_index(manifest, &config.base_url, &config.map_prefix),
        ),
        WorldsRoute::World { world } => serve_manifest(
            config,
            archive,
            &world_manifest_key(&config.map_prefix, &world),
            format!("World '{world}' not found"),
            |manifest| {
                enrich_world_manifest(manifest, &world, &config.base_url, &config.map_prefix)
            },
        ),
        WorldsRoute::Map { world, map } => serve_manifest(
            config,
            archive,
            &map_manifest_key(&config.map_prefix, &world, &map),
            format!("Map '{map}' not found"),
            |manifest| {
                enrich_map_manifest(manifest, &world, &map, &config.base_url, &config.map_prefix)
            },
        ),
        WorldsRoute::Unknown => error_response(config, 404, json!({"error": "Not found"})),
    }
}

fn serve_manifest(
    config: &WorldsHandlerConfig,
    archive: &dyn MapArchive,
    key: &str,
    missing_message: String,
    enrich: impl FnOnce(Value) -> Result<Value, ProjectionError>,
) -> ApiGatewayResponse {
    let manifest = match read_manifest(archive, key) {
        Ok(Some(manifest)) => manifest,
        Ok(None) => return error_response(config, 404, json!({"error": missing_message})),
        Err(failure) => return archive_failure(config, key, failure),
    };

    match enrich(manifest) {
        Ok(enriched) => success_response(config, 200, enriched),
        Err(error) => archive_failure(config, key, error.message().to_string()),
    }
}

fn read_manifest(archive: &dyn MapArchive, key: &str) -> Result<Option<Value>, String> {
    let Some(bytes) = archive.read_object(key)? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|error| format!("object at '{key}' is not valid JSON: {error}"))
}

fn response_headers(config: &WorldsHandlerConfig) -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": config.cors_origin,
        "Access-Control-Allow-Methods": "GET,OPTIONS",
    })
}

fn success_response(
    config: &WorldsHandlerConfig,
    status_code: u16,
    payload: impl Serialize,
) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: response_headers(config),
        body: serde_json::to_string(&payload).expect("response payload should serialize"),
    }
}

fn error_response(
    config: &WorldsHandlerConfig,
    status_code: u16,
    payload: Value,
) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: response_headers(config),
        body: payload.to_string(),
    }
}

fn archive_failure(
    config: &WorldsHandlerConfig,
    key: &str,
    failure: String,
) -> ApiGatewayResponse {
    log_worlds_error(
        "manifest_read_failed",
        json!({"key": key, "reason": failure}),
    );
    error_response(config, 500, json!({"error": "Internal Server Error"}))
}

fn log_worlds_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "worlds_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct FakeArchive {
        objects: HashMap<String, Vec<u8>>,
        fail_reads: bool,
    }

    impl FakeArchive {
        fn new() -> Self {
            Self {
                objects: HashMap::new(),
                fail_reads: false,
            }
        }

        fn unreachable() -> Self {
            Self {
                fail_reads: true,
                ..Self::new()
            }
        }

        fn with_manifest(mut self, key: &str, manifest: &Value) -> Self {
            self.objects
                .insert(key.to_string(), manifest.to_string().into_bytes());
            self
        }

        fn with_raw_object(mut self, key: &str, body: &[u8]) -> Self {
            self.objects.insert(key.to_string(), body.to_vec());
            self
        }
    }

    impl MapArchive for FakeArchive {
        fn read_object(&self, key: &str) -> Result<Option<Vec<u8>>, String> {
            if self.fail_reads {
                return Err("bucket is unreachable".to_string());
            }
            Ok(self.objects.get(key).cloned())
        }
    }

    fn config() -> WorldsHandlerConfig {
        WorldsHandlerConfig {
            base_url: "https://maps.example.com".to_string(),
            map_prefix: "maps/".to_string(),
            cors_origin: "*".to_string(),
        }
    }

    fn http_event(method: &str, path: &str) -> Value {
        json!({
            "rawPath": path,
            "requestContext": {"http": {"method": method}},
        })
    }

    fn body_json(response: &ApiGatewayResponse) -> Value {
        serde_json::from_str(&response.body).expect("response body should be JSON")
    }

    #[test]
    fn preflight_requests_succeed_with_cors_headers() {
        let archive = FakeArchive::new();

        let response =
            handle_worlds_event(&http_event("OPTIONS", "/api/worlds"), &config(), &archive);

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            response.headers["Access-Control-Allow-Methods"],
            "GET,OPTIONS"
        );
    }

    #[test]
    fn lists_worlds_with_projected_urls() {
        let archive = FakeArchive::new().with_manifest(
            "maps/world_manifest.json",
            &json!([
                {"world": "survival", "name": "Survival World"},
                {"world": "creative", "name": "Creative World", "preview": "creative/custom.png"},
            ]),
        );

        let response = handle_worlds_event(&http_event("GET", "/api/worlds"), &config(), &archive);

        assert_eq!(response.status_code, 200);
        let body = body_json(&response);
        assert_eq!(body.as_array().map(Vec::len), Some(2));
        assert_eq!(body[0]["world"], "survival");
        assert_eq!(
            body[0]["previewUrl"],
            "https://maps.example.com/maps/survival/preview.png"
        );
        assert_eq!(body[0]["mapUrl"], "https://maps.example.com/maps/survival/");
        assert_eq!(
            body[1]["previewUrl"],
            "https://maps.example.com/maps/creative/custom.png"
        );
    }

    #[test]
    fn missing_world_index_is_a_404() {
        let archive = FakeArchive::new();

        let response = handle_worlds_event(&http_event("GET", "/api/worlds"), &config(), &archive);

        assert_eq!(response.status_code, 404);
        assert_eq!(
            body_json(&response),
            json!({"error": "world_manifest.json not found"})
        );
    }

    #[test]
    fn serves_one_world_with_per_map_urls() {
        let archive = FakeArchive::new().with_manifest(
            "maps/survival/manifest.json",
            &json!({
                "name": "Survival World",
                "maps": [
                    {"name": "overworld", "dimension": "minecraft:overworld"},
                    {"name": "nether", "dimension": "minecraft:the_nether"},
                ],
            }),
        );

        let response =
            handle_worlds_event(&http_event("GET", "/api/worlds/survival"), &config(), &archive);

        assert_eq!(response.status_code, 200);
        let body = body_json(&response);
        assert_eq!(body["name"], "Survival World");
        assert_eq!(
            body["previewUrl"],
            "https://maps.example.com/maps/survival/preview.png"
        );
        assert_eq!(
            body["maps"][0]["previewUrl"],
            "https://maps.example.com/maps/survival/overworld/preview.png"
        );
        assert_eq!(
            body["maps"][0]["mapUrl"],
            "https://maps.example.com/maps/survival/overworld/"
        );
    }

    #[test]
    fn missing_world_is_a_404_naming_the_world() {
        let archive = FakeArchive::new();

        let response = handle_worlds_event(
            &http_event("GET", "/api/worlds/nonexistent"),
            &config(),
            &archive,
        );

        assert_eq!(response.status_code, 404);
        assert_eq!(
            body_json(&response),
            json!({"error": "World 'nonexistent' not found"})
        );
    }

    #[test]
    fn serves_one_map_manifest() {
        let archive = FakeArchive::new().with_manifest(
            "maps/survival/overworld/manifest.json",
            &json!({
                "name": "overworld",
                "dimension": "minecraft:overworld",
                "center": [0, 0],
            }),
        );

        let response = handle_worlds_event(
            &http_event("GET", "/api/worlds/survival/overworld"),
            &config(),
            &archive,
        );

        assert_eq!(response.status_code, 200);
        let body = body_json(&response);
        assert_eq!(body["dimension"], "minecraft:overworld");
        assert_eq!(
            body["previewUrl"],
            "https://maps.example.com/maps/survival/overworld/preview.png"
        );
        assert_eq!(
            body["mapUrl"],
            "https://maps.example.com/maps/survival/overworld/"
        );
    }

    #[test]
    fn missing_map_is_a_404_naming_the_map() {
        let archive = FakeArchive::new();

        let response = handle_worlds_event(
            &http_event("GET", "/api/worlds/survival/nonexistent"),
            &config(),
            &archive,
        );

        assert_eq!(response.status_code, 404);
        assert_eq!(
            body_json(&response),
            json!({"error": "Map 'nonexistent' not found"})
        );
    }

    #[test]
    fn unknown_paths_are_a_404() {
        let archive = FakeArchive::new();

        let response = handle_worlds_event(&http_event("GET", "/api/unknown"), &config(), &archive);

        assert_eq!(response.status_code, 404);
    }

    #[test]
    fn legacy_event_shapes_are_supported() {
        let archive = FakeArchive::new()
            .with_manifest("maps/world_manifest.json", &json!([{"world": "test"}]));
        let event = json!({"path": "/api/worlds", "httpMethod": "GET"});

        let response = handle_worlds_event(&event, &config(), &archive);

        assert_eq!(response.status_code, 200);
    }

    #[test]
    fn archive_failures_surface_as_500_with_a_generic_body() {
        let archive = FakeArchive::unreachable();

        let response = handle_worlds_event(&http_event("GET", "/api/worlds"), &config(), &archive);

        assert_eq!(response.status_code, 500);
        assert_eq!(
            body_json(&response),
            json!({"error": "Internal Server Error"})
        );
    }

    #[test]
    fn corrupt_manifests_surface_as_500() {
        let archive =
            FakeArchive::new().with_raw_object("maps/world_manifest.json", b"not json at all");

        let response = handle_worlds_event(&http_event("GET", "/api/worlds"), &config(), &archive);

        assert_eq!(response.status_code, 500);
    }
}
