use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sensevoice_webui::backend::LoadRequest;
use sensevoice_webui::engine::SpeechEngine;
use sensevoice_webui::error::AppError;
use sensevoice_webui::model::MODEL_FILES;

fn complete_snapshot(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "sensevoice_engine_{tag}_{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    for file in MODEL_FILES {
        std::fs::write(dir.join(file), b"stub").expect("write should succeed");
    }
    dir
}

#[test]
fn transcribe_without_a_loaded_model_is_a_load_error() {
    let engine = SpeechEngine::new();
    assert!(!engine.is_ready());

    // Missing path short-circuits as an input error before the handle check.
    let err = engine.transcribe_file(Path::new("whatever.wav")).unwrap_err();
    assert!(matches!(err, AppError::Input(_)), "got {err:?}");

    let snapshot = complete_snapshot("unloaded");
    let clip = snapshot.join("clip.wav");
    std::fs::write(&clip, b"RIFFfakewavdata").unwrap();
    let err = engine.transcribe_file(&clip).unwrap_err();
    assert!(matches!(err, AppError::Load(_)), "got {err:?}");

    let _ = std::fs::remove_dir_all(&snapshot);
}

#[test]
fn load_rejects_an_incomplete_snapshot() {
    let snapshot = complete_snapshot("incomplete");
    std::fs::remove_file(snapshot.join("model.pt")).unwrap();

    let engine = SpeechEngine::new();
    let err = engine.load(&LoadRequest::local(&snapshot)).unwrap_err();

    match err {
        AppError::Load(detail) => assert!(detail.contains("model.pt"), "got {detail}"),
        other => panic!("expected Load, got {other:?}"),
    }
    assert!(!engine.is_ready());

    let _ = std::fs::remove_dir_all(&snapshot);
}

#[test]
fn load_rejects_a_missing_directory() {
    let engine = SpeechEngine::new();
    let err = engine
        .load(&LoadRequest::remote("iic/SenseVoiceSmall"))
        .unwrap_err();
    assert!(matches!(err, AppError::Load(_)));
}

#[test]
fn failed_request_leaves_the_engine_usable() {
    let snapshot = complete_snapshot("recovers");
    let engine = SpeechEngine::new();
    engine
        .load(&LoadRequest::local(&snapshot))
        .expect("complete snapshot should load");
    assert!(engine.is_ready());

    // A missing audio path is an input error, not state corruption.
    let err = engine
        .transcribe_file(&snapshot.join("no_such_clip.wav"))
        .unwrap_err();
    assert!(matches!(err, AppError::Input(_)), "got {err:?}");
    assert!(engine.is_ready());

    let clip = snapshot.join("clip.wav");
    std::fs::write(&clip, b"RIFFfakewavdata").unwrap();
    let text = engine
        .transcribe_file(&clip)
        .expect("subsequent requests should still work");
    assert!(!text.is_empty());

    let _ = std::fs::remove_dir_all(&snapshot);
}

#[test]
fn reload_replaces_the_previous_handle() {
    let first = complete_snapshot("first");
    let second = complete_snapshot("second");

    let engine = SpeechEngine::new();
    engine.load(&LoadRequest::local(&first)).unwrap();
    engine.load(&LoadRequest::local(&second)).unwrap();
    assert!(engine.is_ready());

    let _ = std::fs::remove_dir_all(&first);
    let _ = std::fs::remove_dir_all(&second);
}
