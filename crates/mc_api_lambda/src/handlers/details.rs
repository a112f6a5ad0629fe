use serde::Serialize;
use serde_json::{json, Value};

use crate::adapters::status_probe::{ProbeError, StatusProbe};
use crate::handlers::gateway::{query_param, request_method, ApiGatewayResponse};
use crate::runtime::contract::{MSG_MISSING_HOSTNAME, MSG_SERVER_TIMEOUT};
use crate::runtime::ping::ServerAddress;

#[derive(Debug, Clone)]
pub struct DetailsHandlerConfig {
    pub cors_origin: String,
}

/// Queries the named game server and passes its status document through
/// unchanged. The route is single-purpose, so dispatch is on the method
/// and the `hostname` query parameter only.
pub fn handle_details_event(
    event: &Value,
    config: &DetailsHandlerConfig,
    probe: &dyn StatusProbe,
) -> ApiGatewayResponse {
    if request_method(event) == "OPTIONS" {
        return success_response(config, 200, json!({}));
    }

    let Some(hostname) = query_param(event, "hostname").filter(|hostname| !hostname.is_empty())
    else {
        return error_response(config, 400, json!({"message": MSG_MISSING_HOSTNAME}));
    };

    let address = match ServerAddress::parse(hostname) {
        Ok(address) => address,
        Err(error) => return probe_failure(config, hostname, error.message().to_string()),
    };

    match probe.query_status(&address) {
        Ok(status) => success_response(config, 200, status),
        Err(ProbeError::Timeout) => {
            log_details_warn("probe_timed_out", json!({"hostname": hostname}));
            error_response(config, 503, json!({"message": MSG_SERVER_TIMEOUT}))
        }
        Err(ProbeError::Failed(reason)) => probe_failure(config, hostname, reason),
    }
}

fn probe_failure(
    config: &DetailsHandlerConfig,
    hostname: &str,
    reason: String,
) -> ApiGatewayResponse {
    log_details_error("probe_failed", json!({"hostname": hostname, "reason": reason}));
    error_response(config, 500, json!({"message": format!("Error: {reason}")}))
}

fn response_headers(config: &DetailsHandlerConfig) -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": config.cors_origin,
        "Access-Control-Allow-Headers": "content-type,x-api-key",
        "Access-Control-Allow-Methods": "GET,OPTIONS",
    })
}

fn success_response(
    config: &DetailsHandlerConfig,
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
    config: &DetailsHandlerConfig,
    status_code: u16,
    payload: Value,
) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: response_headers(config),
        body: payload.to_string(),
    }
}

fn log_details_warn(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "details_handler",
            "level": "warning",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_details_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "details_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct FixedProbe {
        status: Value,
    }

    impl StatusProbe for FixedProbe {
        fn query_status(&self, _address: &ServerAddress) -> Result<Value, ProbeError> {
            Ok(self.status.clone())
        }
    }

    struct TimedOutProbe;

    impl StatusProbe for TimedOutProbe {
        fn query_status(&self, _address: &ServerAddress) -> Result<Value, ProbeError> {
            Err(ProbeError::Timeout)
        }
    }

    struct FailingProbe;

    impl StatusProbe for FailingProbe {
        fn query_status(&self, _address: &ServerAddress) -> Result<Value, ProbeError> {
            Err(ProbeError::Failed("connection refused".to_string()))
        }
    }

    struct CapturingProbe {
        addresses: Mutex<Vec<ServerAddress>>,
    }

    impl CapturingProbe {
        fn new() -> Self {
            Self {
                addresses: Mutex::new(Vec::new()),
            }
        }

        fn addresses(&self) -> Vec<ServerAddress> {
            self.addresses.lock().expect("poisoned mutex").clone()
        }
    }

    impl StatusProbe for CapturingProbe {
        fn query_status(&self, address: &ServerAddress) -> Result<Value, ProbeError> {
            self.addresses
                .lock()
                .expect("poisoned mutex")
                .push(address.clone());
            Ok(json!({}))
        }
    }

    fn config() -> DetailsHandlerConfig {
        DetailsHandlerConfig {
            cors_origin: "*".to_string(),
        }
    }

    fn query_event(hostname: Option<&str>) -> Value {
        match hostname {
            Some(hostname) => json!({
                "rawPath": "/details",
                "requestContext": {"http": {"method": "GET"}},
                "queryStringParameters": {"hostname": hostname},
            }),
            None => json!({
                "rawPath": "/details",
                "requestContext": {"http": {"method": "GET"}},
            }),
        }
    }

    fn body_json(response: &ApiGatewayResponse) -> Value {
        serde_json::from_str(&response.body).expect("response body should be JSON")
    }

    #[test]
    fn passes_the_status_document_through_unchanged() {
        let status = json!({
            "version": {"name": "1.21", "protocol": 767},
            "players": {"max": 20, "online": 3},
            "description": {"text": "A Minecraft Server"},
            "favicon": "data:image/png;base64,AAAA",
        });
        let probe = FixedProbe {
            status: status.clone(),
        };

        let response =
            handle_details_event(&query_event(Some("mc.example.com")), &config(), &probe);

        assert_eq!(response.status_code, 200);
        assert_eq!(body_json(&response), status);
    }

    #[test]
    fn missing_or_empty_hostname_is_a_400() {
        let probe = FixedProbe { status: json!({}) };

        let missing = handle_details_event(&query_event(None), &config(), &probe);
        assert_eq!(missing.status_code, 400);
        assert_eq!(body_json(&missing), json!({"message": "Missing ?hostname"}));

        let empty = handle_details_event(&query_event(Some("")), &config(), &probe);
        assert_eq!(empty.status_code, 400);
    }

    #[test]
    fn timeouts_map_to_503() {
        let response = handle_details_event(
            &query_event(Some("mc.example.com")),
            &config(),
            &TimedOutProbe,
        );

        assert_eq!(response.status_code, 503);
        assert_eq!(body_json(&response), json!({"message": "Server Timeout"}));
    }

    #[test]
    fn probe_failures_map_to_500_with_the_reason() {
        let response = handle_details_event(
            &query_event(Some("mc.example.com")),
            &config(),
            &FailingProbe,
        );

        assert_eq!(response.status_code, 500);
        assert_eq!(
            body_json(&response),
            json!({"message": "Error: connection refused"})
        );
    }

    #[test]
    fn hostname_port_suffix_overrides_the_default() {
        let probe = CapturingProbe::new();

        handle_details_event(&query_event(Some("mc.example.com")), &config(), &probe);
        handle_details_event(&query_event(Some("mc.example.com:1234")), &config(), &probe);

        let addresses = probe.addresses();
        assert_eq!(addresses[0].port, 25565);
        assert_eq!(addresses[1].port, 1234);
        assert_eq!(addresses[1].host, "mc.example.com");
    }

    #[test]
    fn invalid_ports_are_reported_as_failures() {
        let probe = CapturingProbe::new();

        let response =
            handle_details_event(&query_event(Some("mc.example.com:notaport")), &config(), &probe);

        assert_eq!(response.status_code, 500);
        assert_eq!(
            body_json(&response),
            json!({"message": "Error: invalid port 'notaport'"})
        );
        assert!(probe.addresses().is_empty());
    }

    #[test]
    fn preflight_requests_succeed_with_cors_headers() {
        let probe = FixedProbe { status: json!({}) };
        let event = json!({
            "rawPath": "/details",
            "requestContext": {"http": {"method": "OPTIONS"}},
        });

        let response = handle_details_event(&event, &config(), &probe);

        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.headers["Access-Control-Allow-Headers"],
            "content-type,x-api-key"
        );
        assert_eq!(
            response.headers["Access-Control-Allow-Methods"],
            "GET,OPTIONS"
        );
    }
}
