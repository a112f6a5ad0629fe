use serde::{Deserialize, Serialize};

pub const SERVICE_BANNER: &str = "Minecraft Server API";

pub const MSG_SUCCESS: &str = "Success";
pub const MSG_DNS_NOT_CONFIGURED: &str = "DNS not configured";
pub const MSG_MISSING_HOSTNAME: &str = "Missing ?hostname";
pub const MSG_SERVER_TIMEOUT: &str = "Server Timeout";

/// Instance description as observed from the compute provider. The provider
/// owns both fields; this system never mutates them directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceObservation {
    pub state: String,
    pub public_ip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceView {
    pub state: String,
    pub ip_address: Option<String>,
}

/// DNS half of the status document. All-null is a valid value: it stands in
/// for "no record configured or lookup degraded", never for a failed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DnsRecordView {
    pub name: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
}

impl DnsRecordView {
    pub fn absent() -> Self {
        Self {
            name: None,
            value: None,
            record_type: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub instance: InstanceView,
    pub dns_record: DnsRecordView,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn dns_record_view_serializes_with_renamed_type_key() {
        let view = DnsRecordView {
            name: Some("mc.example.com.".to_string()),
            value: Some("203.0.113.5".to_string()),
            record_type: Some("A".to_string()),
        };

        let serialized = serde_json::to_value(&view).expect("view should serialize");
        assert_eq!(
            serialized,
            json!({
                "name": "mc.example.com.",
                "value": "203.0.113.5",
                "type": "A",
            })
        );
    }

    #[test]
    fn absent_record_keeps_all_keys_as_null() {
        let serialized =
            serde_json::to_value(DnsRecordView::absent()).expect("view should serialize");
        assert_eq!(
            serialized,
            json!({"name": null, "value": null, "type": null})
        );
    }

    #[test]
    fn status_response_nests_instance_and_record() {
        let status = StatusResponse {
            instance: InstanceView {
                state: "running".to_string(),
                ip_address: Some("203.0.113.5".to_string()),
            },
            dns_record: DnsRecordView::absent(),
        };

        let serialized = serde_json::to_value(&status).expect("status should serialize");
        assert_eq!(serialized["instance"]["state"], "running");
        assert_eq!(serialized["instance"]["ip_address"], "203.0.113.5");
        assert_eq!(serialized["dns_record"]["type"], serde_json::Value::Null);
    }
}
