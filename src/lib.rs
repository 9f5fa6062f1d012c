pub mod backend;
pub mod engine;
pub mod error;
pub mod model;
pub mod readiness;
pub mod server;

pub use error::AppError;
