//! High-level speech recognition engine facade.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use crate::backend::{load_backend, LoadRequest, Recognizer};
use crate::error::AppError;

/// One loaded backend shared across requests. The mutex makes load a
/// single-writer operation and serializes transcription against it, so two
/// concurrent load clicks cannot race and a failed request cannot corrupt
/// the handle.
#[derive(Default)]
pub struct SpeechEngine {
    backend: Mutex<Option<Box<dyn Recognizer>>>,
}

impl SpeechEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.backend.lock().map(|g| g.is_some()).unwrap_or(false)
    }

    /// Builds a backend for `request` and installs it. Loading again with a
    /// different model replaces the previous handle.
    pub fn load(&self, request: &LoadRequest) -> Result<(), AppError> {
        let start = Instant::now();
        let backend = load_backend(request)?;

        let mut guard = self
            .backend
            .lock()
            .map_err(|_| AppError::Load("the speech engine is busy; try again".to_string()))?;
        log::info!(
            "Recognition backend '{}' ready for {} in {:?}",
            backend.name(),
            request.model,
            start.elapsed()
        );
        *guard = Some(backend);
        Ok(())
    }

    /// Transcribes one audio file through the loaded backend and returns the
    /// first result segment's text.
    pub fn transcribe_file(&self, audio: &Path) -> Result<String, AppError> {
        if !audio.is_file() {
            return Err(AppError::Input(format!(
                "audio file not found: {}",
                audio.display()
            )));
        }

        let mut guard = self
            .backend
            .lock()
            .map_err(|_| AppError::Inference("the speech engine is busy; try again".to_string()))?;
        let backend = guard
            .as_mut()
            .ok_or_else(|| AppError::Load("no model loaded yet; load a model first".to_string()))?;

        let start = Instant::now();
        let segments = backend.transcribe(audio)?;
        log::info!("Transcription completed in {:?}", start.elapsed());

        match segments.into_iter().next() {
            Some(segment) => Ok(segment.text),
            None => Err(AppError::Inference(
                "the backend returned no result".to_string(),
            )),
        }
    }
}
