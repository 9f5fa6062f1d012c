//! Web front end: one embedded page plus a small JSON API around the engine.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::backend::LoadRequest;
use crate::engine::SpeechEngine;
use crate::error::AppError;
use crate::model::{locate_model, ModelSize, DEFAULT_CACHE_DIR};

pub const BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 7860);
pub const SERVICE_URL: &str = "http://localhost:7860";

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Clone)]
struct AppState {
    engine: Arc<SpeechEngine>,
}

pub fn router(engine: Arc<SpeechEngine>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/status", get(api_status))
        .route("/api/load", post(api_load))
        .route("/api/transcribe", post(api_transcribe))
        .with_state(AppState { engine })
}

/// Binds the fixed local address and serves until Ctrl-C.
pub async fn serve(engine: Arc<SpeechEngine>) -> std::io::Result<()> {
    let addr = SocketAddr::from(BIND_ADDR);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Web UI listening on http://{addr}");

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Interrupt received; shutting down");
        })
        .await
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn api_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "ready": state.engine.is_ready() }))
}

#[derive(Deserialize)]
struct LoadParams {
    model: Option<String>,
    model_dir: Option<String>,
}

/// Load errors surface as a status string here; this boundary has no other
/// renderer for them.
async fn api_load(State(state): State<AppState>, Json(params): Json<LoadParams>) -> Json<Value> {
    let engine = state.engine.clone();
    let joined = tokio::task::spawn_blocking(move || load_for_ui(&engine, &params)).await;

    match joined {
        Ok(Ok(status)) => Json(json!({ "ok": true, "status": status })),
        Ok(Err(err)) => {
            log::error!("Model load failed: {err}");
            Json(json!({ "ok": false, "status": format!("Model load failed: {}", err.user_message()) }))
        }
        Err(err) => Json(json!({ "ok": false, "status": format!("load task failed: {err}") })),
    }
}

fn load_for_ui(engine: &SpeechEngine, params: &LoadParams) -> Result<String, AppError> {
    let size: ModelSize = params.model.as_deref().unwrap_or("small").parse()?;

    let request = match params
        .model_dir
        .as_deref()
        .filter(|dir| Path::new(dir).is_dir())
    {
        Some(dir) => LoadRequest::local(Path::new(dir)),
        None => match locate_model(size, Path::new(DEFAULT_CACHE_DIR)) {
            Some(path) => LoadRequest::local(&path),
            None => LoadRequest::remote(size.remote_identifier()),
        },
    };

    engine.load(&request)?;
    Ok(format!("Model '{size}' loaded"))
}

#[derive(Deserialize)]
struct UploadParams {
    name: Option<String>,
}

async fn api_transcribe(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Json<Value> {
    if body.is_empty() {
        return Json(json!({
            "ok": false,
            "error": "no audio payload; record a clip or choose a file first"
        }));
    }

    let engine = state.engine.clone();
    let name = params.name.unwrap_or_else(|| "recording.wav".to_string());
    let joined = tokio::task::spawn_blocking(move || transcribe_upload(&engine, &name, &body)).await;

    match joined {
        Ok(Ok(text)) => Json(json!({ "ok": true, "text": text })),
        // Raw error detail goes to the page; there is no other debug channel.
        Ok(Err(err)) => Json(json!({ "ok": false, "error": err.to_string() })),
        Err(err) => Json(json!({ "ok": false, "error": format!("transcription task failed: {err}") })),
    }
}

fn transcribe_upload(engine: &SpeechEngine, name: &str, body: &[u8]) -> Result<String, AppError> {
    let spooled = spool_upload(name, body)?;
    let result = engine.transcribe_file(&spooled);
    let _ = std::fs::remove_file(&spooled);
    result
}

fn spool_upload(name: &str, body: &[u8]) -> Result<PathBuf, AppError> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("wav");
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    let path = std::env::temp_dir().join(format!("sensevoice_upload_{stamp}.{ext}"));
    std::fs::write(&path, body)?;
    Ok(path)
}
