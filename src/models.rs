// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    pub data: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareGuide {
    pub light: String,
    pub water: String,
    pub humidity: String,
    pub temperature: String,
    pub soil: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantIdentification {
    pub name: String,
    pub common_names: Vec<String>,
    pub scientific_name: String,
    pub family: String,
    pub description: String,
    pub care: CareGuide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<String>,
    /// `None` means the model reported the plant as non-toxic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toxicity: Option<String>,
    /// 0-100 when the model reported one; omitted otherwise, never defaulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

/// Image metadata exposed to the UI; the raw bytes stay server-side, the
/// preview data URI is enough to render the thumbnail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    pub preview: String,
    pub uploaded_at: DateTime<Utc>,
}

/// What every state-changing endpoint returns: the session as the UI
/// should render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateView {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PlantIdentification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
