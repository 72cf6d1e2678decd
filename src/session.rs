// src/session.rs
//
// The identification session: one selected image, one outcome. All UI
// state lives here as an explicit state machine; handlers only drive
// transitions and never mutate state directly.
use std::sync::Mutex;

use crate::errors::LeafscanError;
use crate::models::{ImageView, PlantIdentification, StateView, UploadedImage};
use crate::services::image_codec;

#[derive(Debug, Clone)]
pub enum ViewState {
    Empty,
    Identifying,
    Succeeded(PlantIdentification),
    Failed(String),
}

impl ViewState {
    fn status(&self) -> &'static str {
        match self {
            ViewState::Empty => "empty",
            ViewState::Identifying => "identifying",
            ViewState::Succeeded(_) => "succeeded",
            ViewState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug)]
struct Session {
    image: Option<UploadedImage>,
    state: ViewState,
    // Monotonically increasing attempt id. A settled outcome is applied
    // only if its id still matches; a superseding upload or a reset bumps
    // the id so late completions are dropped.
    attempt: u64,
}

pub struct SessionStore {
    inner: Mutex<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Session {
                image: None,
                state: ViewState::Empty,
                attempt: 0,
            }),
        }
    }

    /// New file selection: replace any held image and start an attempt.
    /// Returns the attempt id the eventual outcome must present.
    pub fn begin(&self, image: UploadedImage) -> u64 {
        let mut session = self.inner.lock().unwrap();
        session.image = Some(image);
        session.state = ViewState::Identifying;
        session.attempt += 1;
        session.attempt
    }

    /// Explicit retry: reuse the held image, no re-upload required.
    pub fn begin_retry(&self) -> Result<(u64, UploadedImage), LeafscanError> {
        let mut session = self.inner.lock().unwrap();
        let image = session
            .image
            .clone()
            .ok_or_else(|| LeafscanError::Validation("No image to retry".to_string()))?;
        session.state = ViewState::Identifying;
        session.attempt += 1;
        Ok((session.attempt, image))
    }

    /// Apply an attempt's outcome. Stale outcomes (the session moved on to
    /// a newer attempt or was reset) are ignored.
    pub fn settle(&self, attempt: u64, outcome: Result<PlantIdentification, String>) {
        let mut session = self.inner.lock().unwrap();
        if session.attempt != attempt || !matches!(session.state, ViewState::Identifying) {
            log::debug!("Ignoring stale outcome for attempt {}", attempt);
            return;
        }
        session.state = match outcome {
            Ok(result) => ViewState::Succeeded(result),
            Err(message) => ViewState::Failed(message),
        };
    }

    /// Discard image, result and error together.
    pub fn reset(&self) {
        let mut session = self.inner.lock().unwrap();
        session.image = None;
        session.state = ViewState::Empty;
        session.attempt += 1;
    }

    pub fn view(&self) -> StateView {
        let session = self.inner.lock().unwrap();
        let image = session.image.as_ref().map(|img| ImageView {
            id: img.id,
            filename: img.filename.clone(),
            content_type: img.content_type.clone(),
            size: img.size,
            preview: image_codec::preview_uri(&img.content_type, &img.data),
            uploaded_at: img.uploaded_at,
        });
        let (result, error) = match &session.state {
            ViewState::Succeeded(result) => (Some(result.clone()), None),
            ViewState::Failed(message) => (None, Some(message.clone())),
            _ => (None, None),
        };
        StateView {
            status: session.state.status().to_string(),
            image,
            result,
            error,
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
