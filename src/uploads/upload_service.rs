use std::{collections::HashMap, sync::Arc};
use tracing::{error, info};

use crate::{
    commons::storage_service::{SigningError, UploadUrlSigner},
    config::UploadDefaults,
    services::metrics_service::MetricsService,
    uploads::dto::{upload_url_request::UploadUrlQuery, upload_url_response::UploadUrlResponse},
};

pub struct UploadService {
    signer: Arc<dyn UploadUrlSigner>,
    defaults: UploadDefaults,
    metrics: MetricsService,
}

impl UploadService {
    pub fn new(signer: Arc<dyn UploadUrlSigner>, defaults: UploadDefaults, metrics: MetricsService) -> Self {
        Self {
            signer,
            defaults,
            metrics,
        }
    }

    pub async fn issue_upload_url(&self, query: UploadUrlQuery) -> Result<UploadUrlResponse, SigningError> {
        let start = std::time::Instant::now();
        let mut tags = HashMap::new();
        tags.insert("endpoint".to_string(), "presigned_url".to_string());

        let target = query.resolve(&self.defaults);

        let result = self.signer.presign_upload(&target).await;
        self.metrics.timing("presigned_url.duration", start.elapsed(), Some(&tags));

        match result {
            Ok(url) => {
                self.metrics.increment("presigned_url.success", Some(&tags));
                info!(
                    bucket = %target.bucket,
                    key = %target.key,
                    content_type = %target.content_type,
                    expires_in = target.expires_in.as_secs(),
                    "issued presigned upload url"
                );
                Ok(UploadUrlResponse { url })
            }
            Err(e) => {
                self.metrics.increment("presigned_url.failed", Some(&tags));
                error!(
                    error = %e,
                    bucket = %target.bucket,
                    key = %target.key,
                    "failed to generate presigned upload url"
                );
                Err(e)
            }
        }
    }
}
