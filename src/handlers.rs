// src/handlers.rs
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::TryStreamExt;
use log::{info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::errors::LeafscanError;
use crate::models::UploadedImage;
use crate::services::{image_codec, parser, prompt};

/// File selection: read the uploaded image, start an attempt and run the
/// encode -> prompt -> send -> parse chain to completion.
pub async fn identify(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, LeafscanError> {
    let mut filename = String::new();
    let mut declared_type: Option<String> = None;
    let mut image_data = Vec::new();

    // One image per request; the first file field wins.
    if let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| LeafscanError::Encoding(e.to_string()))?
    {
        filename = field
            .content_disposition()
            .get_filename()
            .unwrap_or("upload")
            .to_string();
        declared_type = field.content_type().map(|ct| ct.to_string());

        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| LeafscanError::Encoding(e.to_string()))?
        {
            image_data.extend_from_slice(&chunk);
        }
    }

    if image_data.is_empty() {
        return Err(LeafscanError::Validation(
            "No image file in request".to_string(),
        ));
    }

    let image = UploadedImage {
        id: Uuid::new_v4(),
        filename,
        content_type: image_codec::resolve_mime(declared_type.as_deref(), &image_data),
        size: image_data.len(),
        data: image_data,
        uploaded_at: chrono::Utc::now(),
    };

    info!(
        "Identifying {} ({}, {} bytes)",
        image.filename, image.content_type, image.size
    );

    let attempt = data.sessions.begin(image.clone());
    run_attempt(&data, &image, attempt).await;

    Ok(HttpResponse::Ok().json(data.sessions.view()))
}

/// Explicit retry: rerun the chain with the image already held by the
/// session. 400 when there is nothing to retry.
pub async fn retry(data: web::Data<AppState>) -> Result<HttpResponse, LeafscanError> {
    let (attempt, image) = data.sessions.begin_retry()?;
    info!("Retrying identification of {}", image.filename);
    run_attempt(&data, &image, attempt).await;
    Ok(HttpResponse::Ok().json(data.sessions.view()))
}

/// Discard image, result and error together.
pub async fn reset(data: web::Data<AppState>) -> HttpResponse {
    data.sessions.reset();
    HttpResponse::Ok().json(data.sessions.view())
}

pub async fn get_state(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data.sessions.view())
}

/// One identification attempt. Every failure kind collapses to a single
/// user-visible message in the session; nothing here is fatal.
async fn run_attempt(state: &AppState, image: &UploadedImage, attempt: u64) {
    let encoded = image_codec::encode(&image.data);
    let body = prompt::build_request(&encoded, &image.content_type);

    let outcome = match state.model.generate(body).await {
        Ok(completion) => parser::parse_identification(&completion),
        Err(e) => Err(e),
    };

    if let Err(e) = &outcome {
        warn!("Identification attempt {} failed: {}", attempt, e);
    }

    state
        .sessions
        .settle(attempt, outcome.map_err(|e| e.to_string()));
}
