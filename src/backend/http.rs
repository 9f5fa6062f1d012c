use std::path::Path;
use std::time::Duration;

use crate::error::AppError;
use crate::model::REQUEST_TIMEOUT_SECS;

use super::{LoadRequest, Recognizer, Segment};

/// Base URL of the inference sidecar, e.g. `http://127.0.0.1:5200`.
pub const HTTP_URL_ENV: &str = "SENSEVOICE_HTTP_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5200";

/// Delegates transcription to a local inference server speaking the
/// OpenAI-style `/v1/audio/transcriptions` multipart contract.
#[derive(Debug)]
pub struct HttpRecognizer {
    agent: ureq::Agent,
    base_url: String,
    model: String,
}

impl HttpRecognizer {
    pub fn connect(request: &LoadRequest) -> Result<Self, AppError> {
        let base_url =
            std::env::var(HTTP_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        // A hung sidecar must not pin a worker thread forever.
        let config = ureq::config::Config::builder()
            .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
            .build();
        let recognizer = Self {
            agent: ureq::Agent::new_with_config(config),
            base_url,
            model: request.model.clone(),
        };

        if !recognizer.is_healthy() {
            return Err(AppError::Load(format!(
                "no inference server responding at {}",
                recognizer.base_url
            )));
        }
        log::info!(
            "Using inference server at {} for model {}",
            recognizer.base_url,
            recognizer.model
        );
        Ok(recognizer)
    }

    fn is_healthy(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        matches!(self.agent.get(&url).call(), Ok(resp) if resp.status() == 200)
    }

    fn multipart_body(&self, audio_bytes: &[u8]) -> (String, Vec<u8>) {
        let boundary = "----SenseVoiceBoundary";
        let mut body = Vec::new();

        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"audio.wav\"\r\nContent-Type: audio/wav\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(audio_bytes);
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"model\"\r\n\r\n{}\r\n",
                self.model
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }
}

impl Recognizer for HttpRecognizer {
    fn transcribe(&mut self, audio: &Path) -> Result<Vec<Segment>, AppError> {
        let audio_bytes = std::fs::read(audio)
            .map_err(|e| AppError::Input(format!("{}: {e}", audio.display())))?;

        let (content_type, body) = self.multipart_body(&audio_bytes);
        let url = format!("{}/v1/audio/transcriptions", self.base_url);

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", &content_type)
            .send(&body[..])
            .map_err(|e| AppError::Inference(format!("POST {url}: {e}")))?;

        let json: serde_json::Value = response
            .into_body()
            .read_json()
            .map_err(|e| AppError::Inference(format!("{url}: bad response: {e}")))?;

        let text = json
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .trim()
            .to_string();

        if text.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![Segment { text }])
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
