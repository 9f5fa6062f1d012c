use std::path::{Path, PathBuf};

use super::{ModelSize, MODEL_FILES, WEIGHTS_FILE};

/// Returns the snapshot directory for `size` under `cache_dir` when a usable
/// local copy exists: the directory is present and carries the weights file.
///
/// Purely a filesystem check. Never touches the network, and any filesystem
/// access failure counts as absent.
pub fn locate_model(size: ModelSize, cache_dir: &Path) -> Option<PathBuf> {
    let dir = size.local_path(cache_dir);
    if dir.is_dir() && dir.join(WEIGHTS_FILE).is_file() {
        log::debug!("Found local model snapshot at {}", dir.display());
        Some(dir)
    } else {
        log::debug!("No usable model snapshot at {}", dir.display());
        None
    }
}

/// Names of manifest files not present in `snapshot_dir`.
pub fn missing_model_files(snapshot_dir: &Path) -> Vec<String> {
    MODEL_FILES
        .iter()
        .filter(|file| !snapshot_dir.join(file).exists())
        .map(|file| (*file).to_string())
        .collect()
}
