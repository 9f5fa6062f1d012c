use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;

use super::locate::missing_model_files;
use super::{
    ModelSize, DEFAULT_REVISION, HUB_ENDPOINT, HUB_ENVIRONMENT_ENV, MAX_RETRIES, MIRROR_ENDPOINT,
    MIRROR_ENV, REQUEST_TIMEOUT_SECS, RETRY_BACKOFF_SECS,
};

/// Result of one acquisition attempt, consumed once by the readiness gate.
#[derive(Debug, Clone)]
pub struct AcquisitionOutcome {
    pub success: bool,
    pub resolved_path: Option<PathBuf>,
    pub error_detail: Option<String>,
}

impl AcquisitionOutcome {
    fn fetched(path: PathBuf) -> Self {
        Self {
            success: true,
            resolved_path: Some(path),
            error_detail: None,
        }
    }

    fn failed(detail: String) -> Self {
        Self {
            success: false,
            resolved_path: None,
            error_detail: Some(detail),
        }
    }
}

/// Fetches the snapshot for `size` into `cache_dir`, skipping files already
/// on disk. This blocks for as long as the downloads take.
///
/// Network and storage failures are folded into the outcome; the raw error
/// never crosses this boundary.
pub fn fetch_model(size: ModelSize, cache_dir: &Path, mirror: bool) -> AcquisitionOutcome {
    let endpoint = resolve_endpoint(mirror);
    let dest = size.local_path(cache_dir);

    log::info!(
        "Downloading {} (revision {DEFAULT_REVISION}) from {endpoint} into {}",
        size.remote_identifier(),
        dest.display()
    );

    match download_snapshot(endpoint, size, &dest) {
        Ok(()) => {
            log::info!("Model download complete: {}", dest.display());
            AcquisitionOutcome::fetched(dest)
        }
        Err(err) => {
            log::error!("Model download failed: {err}");
            AcquisitionOutcome::failed(err.to_string())
        }
    }
}

/// Mirror mode comes from the explicit flag or from `MODELSCOPE_MIRROR` being
/// set at all. Enabling it tells the hub SDKs on the same machine to use the
/// mirrored domain too.
fn resolve_endpoint(mirror_flag: bool) -> &'static str {
    if mirror_flag || std::env::var_os(MIRROR_ENV).is_some() {
        std::env::set_var(HUB_ENVIRONMENT_ENV, "cn");
        log::info!("Mirror mode enabled; fetching from {MIRROR_ENDPOINT}");
        MIRROR_ENDPOINT
    } else {
        HUB_ENDPOINT
    }
}

fn file_url(endpoint: &str, size: ModelSize, file: &str) -> String {
    format!(
        "{endpoint}/api/v1/models/{}/repo?Revision={DEFAULT_REVISION}&FilePath={file}",
        size.remote_identifier()
    )
}

fn download_snapshot(endpoint: &str, size: ModelSize, dest: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dest)?;

    let missing = missing_model_files(dest);
    if missing.is_empty() {
        return Ok(());
    }

    let config = ureq::config::Config::builder()
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    for file in &missing {
        download_asset(&agent, &file_url(endpoint, size, file), &dest.join(file))?;
    }
    Ok(())
}

fn download_asset(agent: &ureq::Agent, url: &str, dest: &Path) -> Result<(), AppError> {
    let tmp = dest.with_extension("download");
    let mut last_err = None;

    for attempt in 1..=MAX_RETRIES {
        log::info!(
            "Downloading {} (attempt {attempt}/{MAX_RETRIES})",
            dest.display()
        );
        match transfer_resumable(agent, url, &tmp, dest) {
            Ok(()) => return Ok(()),
            Err(err) => {
                log::warn!("Download attempt {attempt} failed: {err}");
                last_err = Some(err);
                if attempt < MAX_RETRIES {
                    std::thread::sleep(Duration::from_secs(RETRY_BACKOFF_SECS * attempt as u64));
                }
            }
        }
    }

    Err(last_err.unwrap_or_else(|| AppError::Network(format!("{url}: failed to download"))))
}

/// One transfer into `tmp`, resuming a previous partial file when the server
/// honors the Range header, then an atomic rename onto `dest`.
fn transfer_resumable(
    agent: &ureq::Agent,
    url: &str,
    tmp: &Path,
    dest: &Path,
) -> Result<(), AppError> {
    let resume_from = fs::metadata(tmp).map(|m| m.len()).unwrap_or(0);

    let mut request = agent.get(url);
    if resume_from > 0 {
        request = request.header("Range", &format!("bytes={resume_from}-"));
    }

    let response = request
        .call()
        .map_err(|e| AppError::Network(format!("{url}: request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Network(format!("{url}: unexpected status {status}")));
    }

    let resuming = status == 206;
    let content_len = response
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);
    let expected = if resuming {
        resume_from + content_len
    } else {
        content_len
    };

    let mut file = if resuming {
        log::debug!("Resuming {url} from byte {resume_from}");
        fs::OpenOptions::new().append(true).open(tmp)?
    } else {
        if resume_from > 0 {
            log::warn!("Server ignored the Range header (status {status}); restarting download");
        }
        fs::File::create(tmp)?
    };

    let mut written = if resuming { resume_from } else { 0 };
    let mut reader = response.into_body().into_reader();
    let mut buffer = [0u8; 8192];
    loop {
        let n = reader
            .read(&mut buffer)
            .map_err(|e| AppError::Network(format!("{url}: read failed: {e}")))?;
        if n == 0 {
            break;
        }
        file.write_all(&buffer[..n])?;
        written += n as u64;
    }

    if expected > 0 && written != expected {
        return Err(AppError::Network(format!(
            "{url}: incomplete download, expected {expected} bytes, got {written}"
        )));
    }

    fs::rename(tmp, dest)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_urls_carry_revision_and_path() {
        let url = file_url(HUB_ENDPOINT, ModelSize::Small, "model.pt");
        assert_eq!(
            url,
            "https://modelscope.ai/api/v1/models/iic/SenseVoiceSmall/repo?Revision=master&FilePath=model.pt"
        );
    }

    #[test]
    fn failed_outcome_keeps_the_detail() {
        let outcome = AcquisitionOutcome::failed("connection reset".into());
        assert!(!outcome.success);
        assert!(outcome.resolved_path.is_none());
        assert_eq!(outcome.error_detail.as_deref(), Some("connection reset"));
    }
}
