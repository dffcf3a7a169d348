use aws_sdk_s3::Client;

/// Load the shared AWS configuration, optionally pinned to a region.
pub async fn load_sdk_config(region: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }
    loader.load().await
}

pub fn build_client(config: &aws_config::SdkConfig) -> Client {
    Client::new(config)
}
