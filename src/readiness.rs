//! Startup gate: decides whether the selected model must be fetched before
//! the service can start, and runs the fetch when the operator agrees.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use crate::model::{fetch_model, locate_model, AcquisitionOutcome, ModelSize};

/// Locate/acquire pair the gate runs against. Split out so every transition
/// can be exercised with scripted stores.
pub trait ModelStore {
    fn locate(&mut self, size: ModelSize) -> Option<PathBuf>;
    fn acquire(&mut self, size: ModelSize) -> AcquisitionOutcome;
}

/// Filesystem- and hub-backed store used by the binaries.
pub struct HubModelStore {
    pub cache_dir: PathBuf,
    pub mirror: bool,
}

impl ModelStore for HubModelStore {
    fn locate(&mut self, size: ModelSize) -> Option<PathBuf> {
        locate_model(size, &self.cache_dir)
    }

    fn acquire(&mut self, size: ModelSize) -> AcquisitionOutcome {
        fetch_model(size, &self.cache_dir, self.mirror)
    }
}

/// Where the fetch decision comes from when the model is absent.
pub trait FetchDecision {
    fn confirm_fetch(&mut self, size: ModelSize) -> bool;
}

/// Asks on an attached terminal, treating empty input as yes. Without a
/// terminal it affirms automatically: a double-clicked packaged binary has no
/// one to answer the prompt, and declining would leave it unable to start.
pub struct OperatorPrompt;

impl FetchDecision for OperatorPrompt {
    fn confirm_fetch(&mut self, size: ModelSize) -> bool {
        let stdin = std::io::stdin();
        if !stdin.is_terminal() {
            log::info!("No interactive console; starting the model download automatically");
            return true;
        }

        print!("Model '{size}' is not downloaded yet (~900 MB). Download now? [Y/n] ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() {
            return true;
        }
        matches!(line.trim().to_ascii_lowercase().as_str(), "" | "y" | "yes")
    }
}

/// Always affirms. For tools whose whole point is to end up with the model.
pub struct AutoConfirm;

impl FetchDecision for AutoConfirm {
    fn confirm_fetch(&mut self, _size: ModelSize) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Fetching,
    Ready(PathBuf),
    Failed(String),
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GateState::Ready(_) | GateState::Failed(_))
    }
}

/// One transition of the readiness state machine.
///
/// `Checking` consults the store first and only falls through to the fetch
/// decision when nothing usable is on disk, so a present model never causes
/// an acquire call. Terminal states return themselves.
pub fn advance(
    state: GateState,
    size: ModelSize,
    store: &mut dyn ModelStore,
    decision: &mut dyn FetchDecision,
) -> GateState {
    match state {
        GateState::Checking => match store.locate(size) {
            Some(path) => GateState::Ready(path),
            None if decision.confirm_fetch(size) => GateState::Fetching,
            None => GateState::Failed(format!(
                "model '{size}' is required to run; re-run the launcher and confirm the download"
            )),
        },
        GateState::Fetching => {
            let outcome = store.acquire(size);
            match (outcome.success, outcome.resolved_path) {
                (true, Some(path)) => GateState::Ready(path),
                (true, None) => {
                    GateState::Failed("download reported success without a path".to_string())
                }
                (false, _) => GateState::Failed(
                    outcome
                        .error_detail
                        .unwrap_or_else(|| "model download failed".to_string()),
                ),
            }
        }
        terminal => terminal,
    }
}

/// Drives the gate from `Checking` to a terminal state.
pub fn run_gate(
    size: ModelSize,
    store: &mut dyn ModelStore,
    decision: &mut dyn FetchDecision,
) -> GateState {
    let mut state = GateState::Checking;
    while !state.is_terminal() {
        state = advance(state, size, store, decision);
    }
    state
}
