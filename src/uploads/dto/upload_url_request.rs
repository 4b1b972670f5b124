use serde::Deserialize;
use std::time::Duration;

use crate::{commons::storage_service::UploadTarget, config::UploadDefaults};

/// Query string of `GET /presigned-url`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct UploadUrlQuery {
    pub file_name: Option<String>,
    pub bucket_name: Option<String>,
    pub content_type: Option<String>,
    pub expires: Option<String>,
}

impl UploadUrlQuery {
    /// Fills every missing or unusable field from `defaults`.
    ///
    /// Empty strings count as missing. `expires` falls back to the default
    /// unless it parses as a positive whole number of seconds.
    pub fn resolve(self, defaults: &UploadDefaults) -> UploadTarget {
        let expiry_seconds = self
            .expires
            .as_deref()
            .and_then(|expires| expires.trim().parse::<u64>().ok())
            .filter(|seconds| *seconds > 0)
            .unwrap_or(defaults.default_expiry_seconds);

        UploadTarget {
            bucket: non_empty(self.bucket_name).unwrap_or_else(|| defaults.default_bucket.clone()),
            key: non_empty(self.file_name).unwrap_or_else(|| defaults.default_key.clone()),
            content_type: non_empty(self.content_type)
                .unwrap_or_else(|| defaults.default_content_type.clone()),
            expires_in: Duration::from_secs(expiry_seconds),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
