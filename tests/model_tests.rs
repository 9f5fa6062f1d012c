use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sensevoice_webui::error::AppError;
use sensevoice_webui::model::{
    fetch_model, locate_model, missing_model_files, ModelSize, MODEL_FILES, WEIGHTS_FILE,
};

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "sensevoice_{tag}_{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

#[test]
fn descriptors_are_deterministic() {
    for &size in ModelSize::ALL {
        assert_eq!(size.remote_identifier(), size.remote_identifier());
        assert_eq!(
            size.local_path(Path::new("./models")),
            size.local_path(Path::new("./models"))
        );
    }

    assert_eq!(ModelSize::Small.remote_identifier(), "iic/SenseVoiceSmall");
    assert_eq!(ModelSize::Medium.remote_identifier(), "iic/SenseVoiceMedium");
    assert_eq!(
        ModelSize::Small.local_path(Path::new("./models")),
        PathBuf::from("./models").join("iic/SenseVoiceSmall")
    );
}

#[test]
fn unsupported_size_is_a_validation_error() {
    for name in ["large", "tiny", "SMALL", ""] {
        let err = name.parse::<ModelSize>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
        assert!(err.to_string().contains("small, medium"));
    }

    assert_eq!("small".parse::<ModelSize>().unwrap(), ModelSize::Small);
    assert_eq!("medium".parse::<ModelSize>().unwrap(), ModelSize::Medium);
}

#[test]
fn locate_reports_absent_without_a_snapshot() {
    let cache = scratch_dir("locate_absent");

    assert_eq!(locate_model(ModelSize::Small, &cache), None);

    // Directory alone is not enough; the weights file is the proof.
    let snapshot = ModelSize::Small.local_path(&cache);
    std::fs::create_dir_all(&snapshot).unwrap();
    assert_eq!(locate_model(ModelSize::Small, &cache), None);

    let _ = std::fs::remove_dir_all(&cache);
}

#[test]
fn locate_reports_present_with_weights_on_disk() {
    let cache = scratch_dir("locate_present");
    let snapshot = ModelSize::Small.local_path(&cache);
    std::fs::create_dir_all(&snapshot).unwrap();
    std::fs::write(snapshot.join(WEIGHTS_FILE), b"weights").unwrap();

    assert_eq!(locate_model(ModelSize::Small, &cache), Some(snapshot));

    let _ = std::fs::remove_dir_all(&cache);
}

#[test]
fn fetch_folds_filesystem_errors_into_a_failure_outcome() {
    let cache = scratch_dir("fetch_blocked");
    // A regular file where the cache directory should be makes every
    // snapshot path uncreatable before any request goes out.
    let blocker = cache.join("not_a_dir");
    std::fs::write(&blocker, b"plain file").unwrap();

    let outcome = fetch_model(ModelSize::Small, &blocker, false);

    assert!(!outcome.success);
    assert!(outcome.resolved_path.is_none());
    let detail = outcome.error_detail.expect("failure must carry detail");
    assert!(!detail.is_empty());

    let _ = std::fs::remove_dir_all(&cache);
}

#[test]
fn missing_model_files_detects_incomplete_snapshot() {
    let snapshot = scratch_dir("manifest");

    let initial = missing_model_files(&snapshot);
    assert_eq!(initial.len(), MODEL_FILES.len());
    assert!(initial.contains(&WEIGHTS_FILE.to_string()));

    for file in &initial {
        std::fs::write(snapshot.join(file), b"ok").unwrap();
    }
    assert!(missing_model_files(&snapshot).is_empty());

    let _ = std::fs::remove_dir_all(&snapshot);
}
