use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    commons::storage_service::S3UploadSigner,
    config::Config,
    services::metrics_service::MetricsService,
    uploads::upload_service::UploadService,
};

mod commons;
mod config;
mod controllers;
mod services;
mod uploads;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing with JSON format
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env()?;

    let metrics = match &config.statsd {
        Some(statsd) => MetricsService::new(statsd)?,
        None => MetricsService::disabled(),
    };

    let signer = S3UploadSigner::new(&config.storage).await;
    let upload_service = web::Data::new(UploadService::new(
        Arc::new(signer),
        config.upload_defaults.clone(),
        metrics,
    ));

    info!(
        host = %config.host,
        port = config.port,
        default_bucket = %config.upload_defaults.default_bucket,
        "starting audio upload backend"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(upload_service.clone())
            .service(controllers::health::liveness)
            .service(controllers::health::smoke_test)
            .service(uploads::upload_controller::presigned_url)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
