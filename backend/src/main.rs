use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use backend::analytics::{AnalyticsSink, InMemoryAnalytics};
use backend::config::AppConfig;
use backend::model::load_model;
use backend::routes::{UploadLimit, configure_routes};
use backend::service::PredictionService;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let model = load_model(&config.model).map_err(|e| {
        log::error!("Failed to load model at startup: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, format!("Model loading failed: {}", e))
    })?;

    let analytics: Arc<dyn AnalyticsSink> = Arc::new(InMemoryAnalytics::new());
    let service = PredictionService::new(
        model,
        analytics.clone(),
        config.gate.clone(),
        config.scorer.clone(),
    );
    let upload_limit = UploadLimit(config.server.max_upload_bytes);
    let static_dir = config.server.static_dir.display().to_string();

    let bind_address = config.bind_address();
    log::info!("Serving static assets from {}", static_dir);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(service.clone()))
            .app_data(web::Data::new(analytics.clone()))
            .app_data(web::Data::new(upload_limit))
            .configure(|cfg| configure_routes(cfg, static_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
