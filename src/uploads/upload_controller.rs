use actix_web::{web, HttpResponse};
use tracing::warn;

use crate::uploads::{dto::upload_url_request::UploadUrlQuery, upload_service::UploadService};

pub const SIGNING_FAILED_MESSAGE: &str = "Error generating pre-signed URL";

#[actix_web::get("/presigned-url")]
pub async fn presigned_url(
    upload_service: web::Data<UploadService>,
    query: Result<web::Query<UploadUrlQuery>, actix_web::Error>,
) -> HttpResponse {
    // Missing or undecodable parameters fall back to defaults, never a 4xx.
    let query = match query {
        Ok(q) => q.into_inner(),
        Err(e) => {
            warn!(error = %e, "ignoring undecodable presigned-url query");
            UploadUrlQuery::default()
        }
    };

    match upload_service.issue_upload_url(query).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(_) => HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body(SIGNING_FAILED_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use actix_web::{dev::ServiceResponse, http::header, http::StatusCode, test, App};
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::{
        commons::storage_service::{tests::local_signer, SigningError, UploadTarget, UploadUrlSigner},
        config::UploadDefaults,
        services::metrics_service::MetricsService,
    };

    #[derive(Default)]
    struct RecordingSigner {
        calls: Mutex<Vec<UploadTarget>>,
    }

    #[async_trait]
    impl UploadUrlSigner for RecordingSigner {
        async fn presign_upload(&self, target: &UploadTarget) -> Result<String, SigningError> {
            self.calls.lock().unwrap().push(target.clone());
            Ok(format!("https://storage.test/{}/{}", target.bucket, target.key))
        }
    }

    struct FailingSigner;

    #[async_trait]
    impl UploadUrlSigner for FailingSigner {
        async fn presign_upload(&self, _target: &UploadTarget) -> Result<String, SigningError> {
            Err(SigningError::Sdk(
                "AccessDenied: arn:aws:iam::123456789012:role/uploader is not authorized".to_string(),
            ))
        }
    }

    fn defaults() -> UploadDefaults {
        UploadDefaults {
            default_bucket: "audio-bucket".to_string(),
            default_key: "default-file".to_string(),
            default_content_type: "multipart/form-data".to_string(),
            default_expiry_seconds: 60,
        }
    }

    async fn get(signer: Arc<dyn UploadUrlSigner>, uri: &str) -> ServiceResponse {
        let service = UploadService::new(signer, defaults(), MetricsService::disabled());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .service(presigned_url),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await
    }

    async fn recorded(uri: &str) -> (StatusCode, UploadTarget) {
        let signer = Arc::new(RecordingSigner::default());
        let resp = get(signer.clone(), uri).await;
        let status = resp.status();
        let calls = signer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "one signing call per request");
        (status, calls[0].clone())
    }

    #[actix_web::test]
    async fn returns_signed_url_for_full_query() {
        let resp = get(
            Arc::new(local_signer()),
            "/presigned-url?file_name=test.jpg&bucket_name=your-bucket-name&content_type=image/jpeg&expires=60",
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let url = body["url"].as_str().unwrap();
        assert!(!url.is_empty());
        assert!(url.contains("/your-bucket-name/test.jpg?"));
        assert!(url.contains("X-Amz-Expires=60"));
    }

    #[actix_web::test]
    async fn returns_signed_url_without_any_parameters() {
        let resp = get(Arc::new(local_signer()), "/presigned-url").await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let url = body["url"].as_str().unwrap();
        assert!(url.contains("/audio-bucket/default-file?"));
    }

    #[actix_web::test]
    async fn response_body_holds_only_the_url() {
        let resp = get(Arc::new(RecordingSigner::default()), "/presigned-url?file_name=a.mp3").await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!({ "url": "https://storage.test/audio-bucket/a.mp3" }));
    }

    #[actix_web::test]
    async fn any_subset_of_parameters_is_accepted() {
        for uri in [
            "/presigned-url?file_name=a.mp3",
            "/presigned-url?bucket_name=other",
            "/presigned-url?content_type=audio/wav",
            "/presigned-url?expires=30",
            "/presigned-url?file_name=a.mp3&expires=30",
            "/presigned-url?bucket_name=other&content_type=audio/wav",
        ] {
            let (status, _) = recorded(uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
        }
    }

    #[actix_web::test]
    async fn missing_fields_are_defaulted() {
        let (status, target) = recorded("/presigned-url?file_name=clip.mp3").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(target.key, "clip.mp3");
        assert_eq!(target.bucket, "audio-bucket");
        assert_eq!(target.content_type, "multipart/form-data");
        assert_eq!(target.expires_in, Duration::from_secs(60));
    }

    #[actix_web::test]
    async fn non_numeric_expires_matches_absent_expires() {
        let (_, absent) = recorded("/presigned-url?file_name=a.mp3").await;
        let (status, garbage) = recorded("/presigned-url?file_name=a.mp3&expires=soon").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(garbage, absent);
    }

    #[actix_web::test]
    async fn undecodable_query_falls_back_to_defaults() {
        let (status, target) = recorded("/presigned-url?expires=10&expires=20").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(target.expires_in, Duration::from_secs(60));
    }

    #[actix_web::test]
    async fn signing_failure_is_an_opaque_500() {
        let resp = get(Arc::new(FailingSigner), "/presigned-url?file_name=a.mp3").await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = test::read_body(resp).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert_eq!(body, SIGNING_FAILED_MESSAGE);
        assert!(!body.contains("AccessDenied"));
        assert!(!body.contains("url"));
    }

    #[actix_web::test]
    async fn expiry_rejected_by_signer_is_a_500() {
        let resp = get(Arc::new(local_signer()), "/presigned-url?expires=999999999").await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
