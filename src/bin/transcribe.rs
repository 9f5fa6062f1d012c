//! One-shot transcription of an audio file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sensevoice_webui::backend::LoadRequest;
use sensevoice_webui::engine::SpeechEngine;
use sensevoice_webui::error::AppError;
use sensevoice_webui::model::{ModelSize, DEFAULT_CACHE_DIR};
use sensevoice_webui::readiness::{run_gate, AutoConfirm, GateState, HubModelStore};

#[derive(Parser, Debug)]
#[command(version, about = "Transcribe an audio file with SenseVoice")]
struct Opt {
    /// Audio file to transcribe
    #[arg(long)]
    audio_path: PathBuf,

    /// Local model directory (resolved from the cache, downloading on demand, when omitted)
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Model size (small or medium)
    #[arg(long, default_value = "small")]
    model: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opt = Opt::parse();

    match run(&opt) {
        Ok(text) => {
            println!("{}", "=".repeat(50));
            println!("{text}");
            println!("{}", "=".repeat(50));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(opt: &Opt) -> Result<String, AppError> {
    let size: ModelSize = opt.model.parse()?;

    let model_dir = match &opt.model_dir {
        Some(dir) if dir.is_dir() => dir.clone(),
        Some(dir) => {
            return Err(AppError::Load(format!(
                "model directory not found: {}",
                dir.display()
            )))
        }
        None => {
            let mut store = HubModelStore {
                cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
                mirror: false,
            };
            match run_gate(size, &mut store, &mut AutoConfirm) {
                GateState::Ready(path) => path,
                GateState::Failed(detail) => return Err(AppError::Network(detail)),
                other => {
                    return Err(AppError::Network(format!(
                        "unexpected gate state: {other:?}"
                    )))
                }
            }
        }
    };

    let engine = SpeechEngine::new();
    engine.load(&LoadRequest::local(&model_dir))?;
    engine.transcribe_file(&opt.audio_path)
}
