use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub url: String,
}
