use sensevoice_webui::backend::{load_backend, LoadRequest, BACKEND_ENV, HTTP_URL_ENV};
use sensevoice_webui::error::AppError;

// Single test in this file: it mutates process env, and parallel test
// threads would race on it.
#[test]
fn http_backend_without_a_sidecar_is_a_load_error() {
    std::env::set_var(BACKEND_ENV, "http");
    // Nothing listens on the discard port; the configured agent's connect
    // fails instead of hanging.
    std::env::set_var(HTTP_URL_ENV, "http://127.0.0.1:9");

    let err = load_backend(&LoadRequest::remote("iic/SenseVoiceSmall")).unwrap_err();
    assert!(matches!(err, AppError::Load(_)), "got {err:?}");
    assert!(err.to_string().contains("127.0.0.1:9"));

    std::env::remove_var(BACKEND_ENV);
    std::env::remove_var(HTTP_URL_ENV);
}
