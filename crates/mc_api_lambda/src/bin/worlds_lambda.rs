use lambda_runtime::{service_fn, Error, LambdaEvent};
use mc_api_lambda::adapters::object_store::MapArchive;
use mc_api_lambda::handlers::gateway::ApiGatewayResponse;
use mc_api_lambda::handlers::worlds::{handle_worlds_event, WorldsHandlerConfig};
use serde_json::Value;

const DEFAULT_REGION: &str = "us-east-2";

struct S3MapArchive {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl MapArchive for S3MapArchive {
    fn read_object(&self, key: &str) -> Result<Option<Vec<u8>>, String> {
        let bucket = self.bucket.clone();
        let object_key = key.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let output = match client
                    .get_object()
                    .bucket(bucket)
                    .key(object_key)
                    .send()
                    .await
                {
                    Ok(output) => output,
                    Err(error) => {
                        if error
                            .as_service_error()
                            .is_some_and(|service| service.is_no_such_key())
                        {
                            return Ok(None);
                        }
                        return Err(format!("failed to read object from s3: {error}"));
                    }
                };

                let body = output
                    .body
                    .collect()
                    .await
                    .map_err(|error| format!("failed to read object body: {error}"))?;
                Ok(Some(body.into_bytes().to_vec()))
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let bucket =
        std::env::var("MAPS_BUCKET").map_err(|_| Error::from("MAPS_BUCKET must be configured"))?;
    let map_prefix = std::env::var("MAP_PREFIX").unwrap_or_else(|_| "maps/".to_string());
    let region = std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());
    let base_url = std::env::var("BASE_URL")
        .ok()
        .filter(|base_url| !base_url.is_empty())
        .unwrap_or_else(|| format!("https://{bucket}.s3.{region}.amazonaws.com"));
    let cors_origin = std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let archive = S3MapArchive {
        bucket,
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };
    let config = WorldsHandlerConfig {
        base_url,
        map_prefix,
        cors_origin,
    };

    Ok(handle_worlds_event(&event.payload, &config, &archive))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
