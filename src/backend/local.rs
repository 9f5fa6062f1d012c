use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::model::missing_model_files;

use super::{LoadRequest, Recognizer, Segment};

/// Snapshot-validating stand-in for the in-process inference engine.
///
/// Always compiled, so the downloader, gate, web UI, and CLIs run end to end
/// without a heavy ML dependency; a real engine replaces this behind the same
/// trait. Load enforces the snapshot contract, transcribe enforces the input
/// contract, and the transcript itself is canned.
#[derive(Debug)]
pub struct LocalRecognizer {
    model_dir: PathBuf,
}

impl LocalRecognizer {
    pub fn load(request: &LoadRequest) -> Result<Self, AppError> {
        let model_dir = PathBuf::from(&request.model);
        if !model_dir.is_dir() {
            return Err(AppError::Load(format!(
                "model directory not found: {}",
                model_dir.display()
            )));
        }

        let missing = missing_model_files(&model_dir);
        if !missing.is_empty() {
            return Err(AppError::Load(format!(
                "model snapshot at {} is missing {}",
                model_dir.display(),
                missing.join(", ")
            )));
        }

        log::info!(
            "Loaded model snapshot from {} (device {:?}, vad {}, punc {})",
            model_dir.display(),
            request.device,
            request.aux.vad_model,
            request.aux.punc_model
        );
        Ok(Self { model_dir })
    }
}

impl Recognizer for LocalRecognizer {
    fn transcribe(&mut self, audio: &Path) -> Result<Vec<Segment>, AppError> {
        let bytes = std::fs::read(audio)
            .map_err(|e| AppError::Input(format!("{}: {e}", audio.display())))?;
        if bytes.is_empty() {
            return Err(AppError::Input(format!(
                "{}: empty audio file",
                audio.display()
            )));
        }

        log::debug!(
            "Stand-in transcription of {} ({} bytes) against {}",
            audio.display(),
            bytes.len(),
            self.model_dir.display()
        );
        Ok(vec![Segment {
            text: format!(
                "[stand-in backend: received {} bytes of audio; configure SENSEVOICE_BACKEND=http \
                 to use a real inference server]",
                bytes.len()
            ),
        }])
    }

    fn name(&self) -> &str {
        "local"
    }
}
