//! Model descriptors plus the locate/acquire pair around the local cache.

mod acquire;
mod locate;

pub use acquire::{fetch_model, AcquisitionOutcome};
pub use locate::{locate_model, missing_model_files};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::AppError;

pub const DEFAULT_CACHE_DIR: &str = "./models";
pub const DEFAULT_REVISION: &str = "master";

/// The file the locator treats as proof of a usable snapshot.
pub const WEIGHTS_FILE: &str = "model.pt";

/// Files a complete snapshot carries.
pub const MODEL_FILES: &[&str] = &[
    "model.pt",
    "config.yaml",
    "configuration.json",
    "am.mvn",
    "chn_jpn_yue_eng_ko_spectok.bpe.model",
];

/// Presence of this variable (value unread) enables mirror mode.
pub const MIRROR_ENV: &str = "MODELSCOPE_MIRROR";

pub(crate) const HUB_ENVIRONMENT_ENV: &str = "MODELSCOPE_ENVIRONMENT";
pub(crate) const HUB_ENDPOINT: &str = "https://modelscope.ai";
pub(crate) const MIRROR_ENDPOINT: &str = "https://modelscope.cn";

pub(crate) const MAX_RETRIES: usize = 3;
pub(crate) const RETRY_BACKOFF_SECS: u64 = 2;
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Which pretrained SenseVoice variant to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSize {
    Small,
    Medium,
}

impl ModelSize {
    pub const ALL: &'static [ModelSize] = &[ModelSize::Small, ModelSize::Medium];

    /// Hub identifier for this size. Fixed table, stable across calls.
    pub fn remote_identifier(self) -> &'static str {
        match self {
            ModelSize::Small => "iic/SenseVoiceSmall",
            ModelSize::Medium => "iic/SenseVoiceMedium",
        }
    }

    /// Conventional on-disk location of this size's snapshot under `cache_dir`.
    pub fn local_path(self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(self.remote_identifier())
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSize::Small => write!(f, "small"),
            ModelSize::Medium => write!(f, "medium"),
        }
    }
}

impl FromStr for ModelSize {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            other => Err(AppError::Validation(format!(
                "'{other}' (valid choices: small, medium)"
            ))),
        }
    }
}
