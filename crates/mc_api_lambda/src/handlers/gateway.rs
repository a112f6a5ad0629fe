use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// HTTP method of an API Gateway event. Reads the HTTP API v2 shape
/// (`requestContext.http.method`) first, then the legacy REST shape
/// (`httpMethod`).
pub fn request_method(event: &Value) -> &str {
    event
        .pointer("/requestContext/http/method")
        .and_then(Value::as_str)
        .or_else(|| event.get("httpMethod").and_then(Value::as_str))
        .unwrap_or("GET")
}

/// Request path, preferring the v2 `rawPath` over the legacy `path`.
/// Empty strings count as absent.
pub fn request_path(event: &Value) -> &str {
    event
        .get("rawPath")
        .and_then(Value::as_str)
        .filter(|path| !path.is_empty())
        .or_else(|| {
            event
                .get("path")
                .and_then(Value::as_str)
                .filter(|path| !path.is_empty())
        })
        .unwrap_or("/")
}

pub fn query_param<'a>(event: &'a Value, name: &str) -> Option<&'a str> {
    event
        .get("queryStringParameters")
        .and_then(|params| params.get(name))
        .and_then(Value::as_str)
}
