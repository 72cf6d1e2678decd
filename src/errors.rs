// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeafscanError {
    #[error("Missing API credential: {0}")]
    Configuration(String),

    #[error("Could not read image: {0}")]
    Encoding(String),

    #[error("Identification service error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("The identification service returned no text")]
    EmptyResponse,

    #[error("Could not parse identification response: {0}")]
    MalformedResponse(String),

    #[error("Identification response is missing required fields: {0}")]
    IncompleteData(String),

    // Domain-level "could not identify" outcome; carries the model's own
    // message verbatim.
    #[error("{0}")]
    Unidentified(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ResponseError for LeafscanError {
    fn error_response(&self) -> HttpResponse {
        match self {
            LeafscanError::Configuration(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Configuration error",
                    "message": self.to_string()
                }))
            }
            LeafscanError::Encoding(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Image error",
                "message": self.to_string()
            })),
            LeafscanError::Upstream { .. } => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Identification service error",
                "message": self.to_string()
            })),
            LeafscanError::EmptyResponse
            | LeafscanError::MalformedResponse(_)
            | LeafscanError::IncompleteData(_) => {
                HttpResponse::BadGateway().json(serde_json::json!({
                    "error": "Unusable identification response",
                    "message": self.to_string()
                }))
            }
            LeafscanError::Unidentified(_) => HttpResponse::UnprocessableEntity().json(serde_json::json!({
                "error": "Could not identify",
                "message": self.to_string()
            })),
            LeafscanError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "message": self.to_string()
            })),
        }
    }
}
