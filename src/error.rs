use thiserror::Error;

/// Unified app errors, one variant per failure surface.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported model size: {0}")]
    Validation(String),

    #[error("Model download failed: {0}")]
    Network(String),

    #[error("Recognition backend failed to load: {0}")]
    Load(String),

    #[error("Audio input: {0}")]
    Input(String),

    #[error("Transcription failed: {0}")]
    Inference(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Unsupported model size. Valid choices: small, medium.",
            Self::Network(_) => {
                "Could not download the speech model. Check your internet connection, \
                 try --mirror if the hub is unreachable, and make sure there is enough disk space."
            }
            Self::Load(_) => {
                "The recognition backend failed to initialize. Check the model path, \
                 or download the model again if files are missing."
            }
            Self::Input(_) => {
                "Could not read the audio input. Check that the file exists and is a supported format."
            }
            Self::Inference(_) => {
                "The recognition backend failed while transcribing. See the log for details."
            }
            Self::Io(_) => {
                "The app could not read or write its local files. Check disk space and permissions."
            }
        }
    }
}
