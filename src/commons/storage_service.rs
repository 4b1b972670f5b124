use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    presigning::PresigningConfig,
    Client,
};
use std::time::Duration;
use thiserror::Error;

use crate::config::StorageConfig;

/// A fully resolved upload: where the object goes, what it is, and how long
/// the signed URL stays valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub expires_in: Duration,
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid presigning config: {0}")]
    Config(String),
    #[error("failed to presign upload: {0}")]
    Sdk(String),
}

/// Produces a URL that authorizes a single upload of `target.key` into
/// `target.bucket`, constrained to `target.content_type`.
#[async_trait]
pub trait UploadUrlSigner: Send + Sync {
    async fn presign_upload(&self, target: &UploadTarget) -> Result<String, SigningError>;
}

#[derive(Clone)]
pub struct S3UploadSigner {
    client: Client,
}

impl S3UploadSigner {
    pub async fn new(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None,
                None,
                "static",
            ));
        }
        if let Some(endpoint) = &config.endpoint {
            // Ensure endpoint doesn't end with slash
            let endpoint = endpoint.trim_end_matches('/');
            tracing::info!(endpoint, "using custom storage endpoint");
            loader = loader.endpoint_url(endpoint);
        }

        let shared_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(config.force_path_style)
            .build();

        Self::from_client(Client::from_conf(s3_config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UploadUrlSigner for S3UploadSigner {
    async fn presign_upload(&self, target: &UploadTarget) -> Result<String, SigningError> {
        let presigned_config = PresigningConfig::expires_in(target.expires_in)
            .map_err(|e| SigningError::Config(e.to_string()))?;

        let presigned_request = self
            .client
            .put_object()
            .bucket(&target.bucket)
            .key(&target.key)
            .content_type(&target.content_type)
            .presigned(presigned_config)
            .await
            .map_err(|e| SigningError::Sdk(DisplayErrorContext(&e).to_string()))?;

        log::debug!("Generated presigned upload URL for {}/{}", target.bucket, target.key);

        Ok(presigned_request.uri().to_string())
    }
}
