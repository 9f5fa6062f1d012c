//! Launcher: checks model presence, fetches on demand, then serves the web UI.

use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use sensevoice_webui::backend::LoadRequest;
use sensevoice_webui::engine::SpeechEngine;
use sensevoice_webui::error::AppError;
use sensevoice_webui::model::{ModelSize, DEFAULT_CACHE_DIR};
use sensevoice_webui::readiness::{run_gate, GateState, HubModelStore, OperatorPrompt};
use sensevoice_webui::server;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("============================================");
    println!(" SenseVoice speech recognition demo");
    println!("============================================");
    println!();

    let gate = tokio::task::spawn_blocking(|| {
        let mut store = HubModelStore {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            mirror: false,
        };
        run_gate(ModelSize::Small, &mut store, &mut OperatorPrompt)
    })
    .await
    .unwrap_or_else(|err| GateState::Failed(format!("startup task failed: {err}")));

    let model_path = match gate {
        GateState::Ready(path) => path,
        GateState::Failed(detail) => {
            eprintln!("\nCannot start: {detail}");
            eprintln!("Check your network connection and re-run the launcher.");
            pause_before_exit();
            return ExitCode::FAILURE;
        }
        other => {
            eprintln!("\nCannot start: unexpected gate state {other:?}");
            return ExitCode::FAILURE;
        }
    };

    println!("Model ready: {}", model_path.display());

    let engine = Arc::new(SpeechEngine::new());
    let load = {
        let engine = engine.clone();
        let request = LoadRequest::local(&model_path);
        tokio::task::spawn_blocking(move || engine.load(&request))
            .await
            .unwrap_or_else(|err| Err(AppError::Load(format!("load task failed: {err}"))))
    };
    if let Err(err) = load {
        eprintln!("\nCannot start: {err}");
        eprintln!("{}", err.user_message());
        pause_before_exit();
        return ExitCode::FAILURE;
    }

    tokio::spawn(open_browser_later());

    println!();
    println!("Serving at {} (press Ctrl+C to stop)", server::SERVICE_URL);
    println!("If no browser opens, navigate there manually.");
    println!();

    if let Err(err) = server::serve(engine).await {
        eprintln!("\nServer error: {err}");
        pause_before_exit();
        return ExitCode::FAILURE;
    }

    println!("\nStopped.");
    ExitCode::SUCCESS
}

/// Gives the service a moment to bind, then points the default browser at it.
/// Failure is only logged; the page stays reachable by hand.
async fn open_browser_later() {
    tokio::time::sleep(Duration::from_secs(3)).await;
    match webbrowser::open(server::SERVICE_URL) {
        Ok(()) => log::info!("Opened {} in the default browser", server::SERVICE_URL),
        Err(err) => log::warn!(
            "Could not open a browser ({err}); navigate to {} manually",
            server::SERVICE_URL
        ),
    }
}

/// Keeps a double-clicked console window open long enough to read the error.
fn pause_before_exit() {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return;
    }
    eprintln!("\nPress Enter to exit...");
    let mut line = String::new();
    let _ = stdin.lock().read_line(&mut line);
}
