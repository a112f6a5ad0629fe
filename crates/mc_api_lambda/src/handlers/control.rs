use serde::Serialize;
use serde_json::{json, Value};

use crate::adapters::compute::InstanceControl;
use crate::adapters::dns::DnsStore;
use crate::handlers::gateway::{request_method, request_path, ApiGatewayResponse};
use crate::runtime::contract::{
    DnsRecordView, InstanceView, MessageResponse, StatusResponse, MSG_DNS_NOT_CONFIGURED,
    MSG_SUCCESS, SERVICE_BANNER,
};
use crate::runtime::dns::{
    record_matches, record_value, RecordChange, RecordObservation, SyncOutcome, RECORD_TYPE_A,
};
use crate::runtime::routes::{resolve_control_route, ControlRoute};

#[derive(Debug, Clone)]
pub struct ControlHandlerConfig {
    /// Record name the instance address is published under. Empty means
    /// DNS synchronization is not configured for this deployment.
    pub dns_name: String,
    /// Hosted zone override. When absent, the first zone the provider
    /// lists is used.
    pub zone_id: Option<String>,
    pub cors_origin: String,
}

pub fn handle_control_event(
    event: &Value,
    config: &ControlHandlerConfig,
    compute: &dyn InstanceControl,
    dns: &dyn DnsStore,
) -> ApiGatewayResponse {
    let method = request_method(event);
    let path = request_path(event);

    match resolve_control_route(method, path) {
        ControlRoute::Preflight => success_response(config, 200, json!({})),
        ControlRoute::Banner => {
            success_response(config, 200, MessageResponse::new(SERVICE_BANNER))
        }
        ControlRoute::Status => match describe_status(config, compute, dns) {
            Ok(status) => success_response(config, 200, status),
            Err(failure) => provider_failure(config, "status_failed", failure),
        },
        ControlRoute::Start => match compute.start_instance() {
            Ok(()) => success_response(config, 200, MessageResponse::new(MSG_SUCCESS)),
            Err(failure) => provider_failure(config, "start_instance_failed", failure),
        },
        ControlRoute::Stop => match compute.stop_instance() {
            Ok(()) => success_response(config, 200, MessageResponse::new(MSG_SUCCESS)),
            Err(failure) => provider_failure(config, "stop_instance_failed", failure),
        },
        ControlRoute::SyncDns => {
            if config.dns_name.is_empty() {
                return success_response(
                    config,
                    200,
                    MessageResponse::new(MSG_DNS_NOT_CONFIGURED),
                );
            }
            match sync_dns(config, compute, dns) {
                Ok(outcome) => {
                    success_response(config, 200, MessageResponse::new(outcome.message()))
                }
                Err(failure) => provider_failure(config, "dns_sync_failed", failure),
            }
        }
        ControlRoute::Unknown => error_response(config, 404, json!({"error": "Not found"})),
    }
}

/// Combined instance and DNS state. The instance lookup must succeed; the
/// DNS lookup is best-effort and degrades to an all-null record view.
fn describe_status(
    config: &ControlHandlerConfig,
    compute: &dyn InstanceControl,
    dns: &dyn DnsStore,
) -> Result<StatusResponse, String> {
    let observation = compute.describe_instance()?;
    let dns_record = match dns_record_view(config, dns) {
        Ok(view) => view,
        Err(failure) => {
            log_control_warn("dns_lookup_skipped", json!({"reason": failure}));
            DnsRecordView::absent()
        }
    };

    Ok(StatusResponse {
        instance: InstanceView {
            state: observation.state,
            ip_address: observation.public_ip,
        },
        dns_record,
    })
}

fn dns_record_view(
    config: &ControlHandlerConfig,
    dns: &dyn DnsStore,
) -> Result<DnsRecordView, String> {
    if config.dns_name.is_empty() {
        return Ok(DnsRecordView::absent());
    }
    let Some(zone_id) = resolve_zone_id(config.zone_id.as_deref(), dns)? else {
        return Ok(DnsRecordView::absent());
    };
    let Some(record) = find_record(dns, &zone_id, &config.dns_name, RECORD_TYPE_A)? else {
        return Ok(DnsRecordView::absent());
    };

    let value = record_value(&record).map(str::to_string);
    Ok(DnsRecordView {
        name: Some(record.name),
        value,
        record_type: Some(record.record_type),
    })
}

fn sync_dns(
    config: &ControlHandlerConfig,
    compute: &dyn InstanceControl,
    dns: &dyn DnsStore,
) -> Result<SyncOutcome, String> {
    let observation = compute.describe_instance()?;
    let Some(public_ip) = observation.public_ip.filter(|ip| !ip.is_empty()) else {
        return Ok(SyncOutcome::NoPublicAddress);
    };
    let Some(zone_id) = resolve_zone_id(config.zone_id.as_deref(), dns)? else {
        return Ok(SyncOutcome::NoHostedZone);
    };

    dns.upsert_record(
        &zone_id,
        &RecordChange::a_record(config.dns_name.as_str(), public_ip),
    )?;
    Ok(SyncOutcome::Synced)
}

/// A configured zone id resolves without touching the provider. The
/// first-zone fallback is best-effort only: with several zones in the
/// account it picks whichever the provider lists first.
fn resolve_zone_id(explicit: Option<&str>, dns: &dyn DnsStore) -> Result<Option<String>, String> {
    if let Some(zone_id) = explicit.filter(|zone_id| !zone_id.is_empty()) {
        return Ok(Some(zone_id.to_string()));
    }
    Ok(dns.list_hosted_zone_ids()?.into_iter().next())
}

fn find_record(
    dns: &dyn DnsStore,
    zone_id: &str,
    record_name: &str,
    record_type: &str,
) -> Result<Option<RecordObservation>, String> {
    Ok(dns
        .first_record_from(zone_id, record_name, record_type)?
        .filter(|record| record_matches(record, record_name, record_type)))
}

fn response_headers(config: &ControlHandlerConfig) -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": config.cors_origin,
        "Access-Control-Allow-Methods": "GET,POST,OPTIONS",
    })
}

fn success_response(
    config: &ControlHandlerConfig,
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
    config: &ControlHandlerConfig,
    status_code: u16,
    payload: Value,
) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: response_headers(config),
        body: payload.to_string(),
    }
}

fn provider_failure(
    config: &ControlHandlerConfig,
    event: &str,
    failure: String,
) -> ApiGatewayResponse {
    log_control_error(event, json!({"reason": failure}));
    error_response(config, 500, json!({"message": "Internal Server Error"}))
}

fn log_control_warn(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "control_handler",
            "level": "warning",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

fn log_control_error(event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "control_handler",
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
