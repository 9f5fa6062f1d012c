//! Downloads a SenseVoice model snapshot from the hub.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sensevoice_webui::model::{fetch_model, locate_model, ModelSize, DEFAULT_CACHE_DIR};

#[derive(Parser, Debug)]
#[command(version, about = "Download a SenseVoice model from the ModelScope hub")]
struct Opt {
    /// Model size to download (small or medium)
    #[arg(long, default_value = "small")]
    model: String,

    /// Model cache directory
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Fetch through the mirrored hub endpoint
    #[arg(long)]
    mirror: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::parse();

    let size: ModelSize = match opt.model.parse() {
        Ok(size) => size,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = locate_model(size, &opt.cache_dir) {
        println!("Model already present at {}", path.display());
        return ExitCode::SUCCESS;
    }

    println!(
        "Downloading {} into {}. This can take a few minutes, please wait...",
        size.remote_identifier(),
        opt.cache_dir.display()
    );

    let outcome = fetch_model(size, &opt.cache_dir, opt.mirror);
    if outcome.success {
        if let Some(path) = outcome.resolved_path {
            println!("\nModel downloaded to {}", path.display());
        }
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "\nDownload failed: {}",
            outcome.error_detail.unwrap_or_default()
        );
        eprintln!("Hints:");
        eprintln!("  1. Check your network connection");
        eprintln!("  2. Re-run with --mirror (or set MODELSCOPE_MIRROR) if the hub is unreachable");
        eprintln!("  3. Make sure there is enough disk space");
        ExitCode::FAILURE
    }
}
