//! Recognition backend contract. The engine talks to whatever implements
//! [`Recognizer`]; everything upstream of that call is orchestration.

mod http;
mod local;

pub use http::{HttpRecognizer, HTTP_URL_ENV};
pub use local::LocalRecognizer;

use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Selects the backend implementation (`local` or `http`).
pub const BACKEND_ENV: &str = "SENSEVOICE_BACKEND";

/// One recognition result. The backend returns them in order; an empty
/// sequence means it produced no result for the input.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeDevice {
    Cpu,
    Gpu,
}

/// Companion models the engine loads alongside the main one.
#[derive(Debug, Clone)]
pub struct AuxiliaryModels {
    pub vad_model: String,
    pub punc_model: String,
}

impl Default for AuxiliaryModels {
    fn default() -> Self {
        Self {
            vad_model: "fsmn-vad".to_string(),
            punc_model: "ct-punc".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Local snapshot directory, or a hub identifier when none is on disk.
    pub model: String,
    pub device: ComputeDevice,
    pub aux: AuxiliaryModels,
}

impl LoadRequest {
    pub fn local(path: &Path) -> Self {
        Self {
            model: path.display().to_string(),
            device: ComputeDevice::Cpu,
            aux: AuxiliaryModels::default(),
        }
    }

    pub fn remote(identifier: &str) -> Self {
        Self {
            model: identifier.to_string(),
            device: ComputeDevice::Cpu,
            aux: AuxiliaryModels::default(),
        }
    }
}

pub trait Recognizer: Send + std::fmt::Debug {
    /// Transcribes one audio file into ordered segments.
    fn transcribe(&mut self, audio: &Path) -> Result<Vec<Segment>, AppError>;

    fn name(&self) -> &str;
}

/// Builds the backend named by `SENSEVOICE_BACKEND` (default `local`).
pub fn load_backend(request: &LoadRequest) -> Result<Box<dyn Recognizer>, AppError> {
    let selected = std::env::var(BACKEND_ENV).unwrap_or_else(|_| "local".to_string());
    match selected.as_str() {
        "local" => Ok(Box::new(LocalRecognizer::load(request)?)),
        "http" => Ok(Box::new(HttpRecognizer::connect(request)?)),
        other => Err(AppError::Load(format!(
            "unknown backend '{other}' (valid: local, http)"
        ))),
    }
}
