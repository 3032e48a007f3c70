use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};
use serde_json::json;
use shared::{PredictionOutcome, PredictionResult};
use std::collections::HashMap;
use std::sync::Arc;

use crate::analytics::AnalyticsSink;
use crate::error::PredictionError;
use crate::model::TabularFeatures;
use crate::service::{PredictionInput, PredictionService};
use crate::views::{PageView, render_page};

const IMAGE_FIELD: &str = "image";
const TABULAR_TRIGGER_FIELD: &str = "fixed_acidity";

/// Per-request cap on uploaded bytes across all multipart fields.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: String) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/predict").route(web::post().to(predict_form)))
        .service(web::resource("/api/predict").route(web::post().to(predict_api)))
        .service(web::resource("/api/analytics").route(web::get().to(analytics)))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(Files::new("/static", static_dir));
}

struct SubmittedForm {
    fields: HashMap<String, String>,
    image: Option<Vec<u8>>,
}

async fn read_form(mut payload: Multipart, limit: usize) -> Result<SubmittedForm, PredictionError> {
    let mut fields = HashMap::new();
    let mut image = None;
    let mut received = 0usize;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| PredictionError::Form(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let has_filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .is_some_and(|filename| !filename.is_empty());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| PredictionError::Form(e.to_string()))?;
            received += chunk.len();
            if received > limit {
                return Err(PredictionError::UploadTooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        if name == IMAGE_FIELD {
            if has_filename && !data.is_empty() {
                image = Some(data);
            }
        } else {
            fields.insert(name, String::from_utf8_lossy(&data).into_owned());
        }
    }

    Ok(SubmittedForm { fields, image })
}

fn to_input(form: SubmittedForm) -> Result<PredictionInput, PredictionError> {
    let wants_tabular = form
        .fields
        .get(TABULAR_TRIGGER_FIELD)
        .is_some_and(|value| !value.trim().is_empty());

    let features = if wants_tabular {
        Some(TabularFeatures::from_form(&form.fields)?)
    } else {
        None
    };

    Ok(PredictionInput {
        features,
        image: form.image,
    })
}

async fn run_prediction(
    service: &PredictionService,
    payload: Multipart,
    limit: usize,
) -> Result<PredictionResult, PredictionError> {
    let input = to_input(read_form(payload, limit).await?)?;
    let service = service.clone();
    // Decoding and edge detection are CPU-bound.
    web::block(move || service.predict(input))
        .await
        .map_err(|e| PredictionError::Worker(e.to_string()))?
}

fn log_failure(route: &str, err: &PredictionError) {
    if err.is_internal() {
        error!("{} failed: {}", route, err);
    } else {
        warn!("{} rejected: {}", route, err);
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(&PageView::Blank))
}

async fn predict_form(
    service: web::Data<PredictionService>,
    limit: web::Data<UploadLimit>,
    payload: Multipart,
) -> HttpResponse {
    let page = match run_prediction(&service, payload, limit.0).await {
        Ok(result) => {
            info!(
                "Prediction: {} ({}) via {}",
                result.final_quality, result.label, result.mode
            );
            render_page(&PageView::Result(&result))
        }
        Err(e) => {
            log_failure("/predict", &e);
            render_page(&PageView::Error(&e.user_message()))
        }
    };

    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(page)
}

async fn predict_api(
    service: web::Data<PredictionService>,
    limit: web::Data<UploadLimit>,
    payload: Multipart,
) -> HttpResponse {
    match run_prediction(&service, payload, limit.0).await {
        Ok(result) => {
            info!(
                "API prediction: {} ({}) via {}",
                result.final_quality, result.label, result.mode
            );
            HttpResponse::Ok().json(PredictionOutcome::success(result))
        }
        Err(e) => {
            log_failure("/api/predict", &e);
            let body = PredictionOutcome::error(e.user_message());
            if e.is_internal() {
                HttpResponse::InternalServerError().json(body)
            } else {
                HttpResponse::UnprocessableEntity().json(body)
            }
        }
    }
}

async fn analytics(analytics: web::Data<Arc<dyn AnalyticsSink>>) -> HttpResponse {
    HttpResponse::Ok().json(analytics.snapshot())
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
