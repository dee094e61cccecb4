use crate::domain::model::Flags;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_ssm::Client as SsmClient;

/// Loads the shared AWS configuration (credentials chain, region, endpoint).
pub async fn load_sdk_config(flags: &Flags) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &flags.aws_region {
        loader = loader.region(Region::new(region.clone()));
    }
    if let Some(endpoint) = &flags.aws_endpoint_url {
        loader = loader.endpoint_url(endpoint.clone());
    }

    let config = loader.load().await;
    tracing::info!(
        region = ?config.region(),
        endpoint = ?flags.aws_endpoint_url,
        "Loaded AWS configuration"
    );
    config
}

pub fn s3_client(config: &SdkConfig, force_path_style: bool) -> S3Client {
    let config = aws_sdk_s3::config::Builder::from(config)
        .force_path_style(force_path_style)
        .build();
    S3Client::from_conf(config)
}

pub fn ssm_client(config: &SdkConfig) -> SsmClient {
    SsmClient::new(config)
}
