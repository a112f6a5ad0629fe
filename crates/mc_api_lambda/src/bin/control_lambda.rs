use aws_config::Region;
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use mc_api_core::contract::InstanceObservation;
use mc_api_core::dns::{RecordChange, RecordObservation, CHANGE_COMMENT};
use mc_api_lambda::adapters::compute::InstanceControl;
use mc_api_lambda::adapters::dns::DnsStore;
use mc_api_lambda::handlers::control::{handle_control_event, ControlHandlerConfig};
use mc_api_lambda::handlers::gateway::ApiGatewayResponse;
use serde_json::Value;

const DEFAULT_REGION: &str = "us-east-2";
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

struct Ec2InstanceControl {
    ec2_client: aws_sdk_ec2::Client,
    instance_id: String,
}

impl InstanceControl for Ec2InstanceControl {
    fn describe_instance(&self) -> Result<InstanceObservation, String> {
        let client = self.ec2_client.clone();
        let instance_id = self.instance_id.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .describe_instances()
                    .instance_ids(instance_id)
                    .send()
                    .await
                    .map_err(|error| format!("failed to describe instance: {error}"))?;

                let instance = output
                    .reservations()
                    .first()
                    .and_then(|reservation| reservation.instances().first())
                    .ok_or_else(|| "instance description came back empty".to_string())?;

                Ok(InstanceObservation {
                    state: instance
                        .state()
                        .and_then(|state| state.name())
                        .map(|name| name.as_str().to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                    public_ip: instance.public_ip_address().map(str::to_string),
                })
            })
        })
    }

    fn start_instance(&self) -> Result<(), String> {
        let client = self.ec2_client.clone();
        let instance_id = self.instance_id.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .start_instances()
                    .instance_ids(instance_id)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to start instance: {error}"))
            })
        })
    }

    fn stop_instance(&self) -> Result<(), String> {
        let client = self.ec2_client.clone();
        let instance_id = self.instance_id.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .stop_instances()
                    .instance_ids(instance_id)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to stop instance: {error}"))
            })
        })
    }
}

struct Route53DnsStore {
    route53_client: aws_sdk_route53::Client,
}

impl DnsStore for Route53DnsStore {
    fn list_hosted_zone_ids(&self) -> Result<Vec<String>, String> {
        let client = self.route53_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .list_hosted_zones()
                    .send()
                    .await
                    .map_err(|error| format!("failed to list hosted zones: {error}"))?;

                Ok(output
                    .hosted_zones()
                    .iter()
                    .map(|zone| zone.id().to_string())
                    .collect())
            })
        })
    }

    fn first_record_from(
        &self,
        zone_id: &str,
        record_name: &str,
        record_type: &str,
    ) -> Result<Option<RecordObservation>, String> {
        let client = self.route53_client.clone();
        let zone_id = zone_id.to_string();
        let record_name = record_name.to_string();
        let record_type = record_type.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = client
                    .list_resource_record_sets()
                    .hosted_zone_id(zone_id)
                    .start_record_name(record_name)
                    .start_record_type(RrType::from(record_type.as_str()))
                    .max_items(1)
                    .send()
                    .await
                    .map_err(|error| format!("failed to list record sets: {error}"))?;

                Ok(output
                    .resource_record_sets()
                    .first()
                    .map(|record_set| RecordObservation {
                        name: record_set.name().to_string(),
                        record_type: record_set.r#type().as_str().to_string(),
                        values: record_set
                            .resource_records()
                            .iter()
                            .map(|record| record.value().to_string())
                            .collect(),
                    }))
            })
        })
    }

    fn upsert_record(&self, zone_id: &str, change: &RecordChange) -> Result<(), String> {
        let client = self.route53_client.clone();
        let zone_id = zone_id.to_string();
        let change = change.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let resource_record = ResourceRecord::builder()
                    .value(change.value)
                    .build()
                    .map_err(|error| format!("failed to build resource record: {error}"))?;
                let record_set = ResourceRecordSet::builder()
                    .name(change.name)
                    .r#type(RrType::from(change.record_type.as_str()))
                    .ttl(change.ttl_seconds)
                    .resource_records(resource_record)
                    .build()
                    .map_err(|error| format!("failed to build record set: {error}"))?;
                let record_change = Change::builder()
                    .action(ChangeAction::Upsert)
                    .resource_record_set(record_set)
                    .build()
                    .map_err(|error| format!("failed to build record change: {error}"))?;
                let change_batch = ChangeBatch::builder()
                    .comment(CHANGE_COMMENT)
                    .changes(record_change)
                    .build()
                    .map_err(|error| format!("failed to build change batch: {error}"))?;

                client
                    .change_resource_record_sets()
                    .hosted_zone_id(zone_id)
                    .change_batch(change_batch)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| format!("failed to update record set: {error}"))
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let instance_id =
        std::env::var("INSTANCE_ID").map_err(|_| Error::from("INSTANCE_ID must be configured"))?;
    let region = std::env::var("REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());
    let dns_name = std::env::var("DNS_NAME").unwrap_or_default();
    let zone_id = std::env::var("ZONE_ID")
        .ok()
        .filter(|zone_id| !zone_id.is_empty());
    let cors_origin = std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());
    let aws_local = std::env::var("AWS_LOCAL").map(|flag| flag == "1").unwrap_or(false);

    let mut loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(Region::new(region));
    if aws_local {
        loader = loader.endpoint_url(LOCALSTACK_ENDPOINT);
    }
    let aws_config = loader.load().await;

    let compute = Ec2InstanceControl {
        ec2_client: aws_sdk_ec2::Client::new(&aws_config),
        instance_id,
    };
    let dns = Route53DnsStore {
        route53_client: aws_sdk_route53::Client::new(&aws_config),
    };
    let config = ControlHandlerConfig {
        dns_name,
        zone_id,
        cors_origin,
    };

    Ok(handle_control_event(&event.payload, &config, &compute, &dns))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
