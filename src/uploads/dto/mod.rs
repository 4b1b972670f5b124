pub mod upload_url_request;
pub mod upload_url_response;
