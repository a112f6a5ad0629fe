use lambda_runtime::{service_fn, Error, LambdaEvent};
use mc_api_lambda::adapters::status_probe::TcpStatusProbe;
use mc_api_lambda::handlers::details::{handle_details_event, DetailsHandlerConfig};
use mc_api_lambda::handlers::gateway::ApiGatewayResponse;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let cors_origin = std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());

    let config = DetailsHandlerConfig { cors_origin };
    let probe = TcpStatusProbe::new();

    Ok(handle_details_event(&event.payload, &config, &probe))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
