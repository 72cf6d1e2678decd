// src/main.rs
use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use log::{info, warn};
use std::sync::Arc;

mod errors;
mod handlers;
mod models;
mod services;
mod session;

use crate::handlers::{get_state, identify, reset, retry};
use crate::services::{GeminiClient, VisionModel};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<SessionStore>,
    model: Arc<dyn VisionModel>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Leafscan service...");

    // The credential is checked per identification attempt, not at startup:
    // a missing key surfaces as a configuration error in the UI instead of
    // refusing to boot.
    let model = GeminiClient::from_env();
    if std::env::var("GEMINI_API_KEY").map_or(true, |k| k.is_empty()) {
        warn!("GEMINI_API_KEY is not set; identification attempts will fail");
    }

    let app_state = AppState {
        sessions: Arc::new(SessionStore::new()),
        model: Arc::new(model),
    };

    info!("Starting HTTP server on 0.0.0.0:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/api/v1")
                    .route("/identify", web::post().to(identify))
                    .route("/retry", web::post().to(retry))
                    .route("/reset", web::post().to(reset))
                    .route("/state", web::get().to(get_state)),
            )
            .route("/health", web::get().to(health_check))
            .service(Files::new("/", "./static").index_file("index.html"))
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "leafscan",
        "version": "0.1.0"
    }))
}
