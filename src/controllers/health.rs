use actix_web::HttpResponse;

pub const LIVENESS_MESSAGE: &str = "audio upload backend is running";
pub const SMOKE_TEST_MESSAGE: &str = "test route ok";

#[actix_web::get("/")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(LIVENESS_MESSAGE)
}

#[actix_web::get("/test")]
pub async fn smoke_test() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(SMOKE_TEST_MESSAGE)
}
