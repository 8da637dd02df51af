//! Utility module

pub mod logger;

pub use logger::{init_logger, init_logger_with_file};

// Re-export the unified error types from shared
pub use shared::error::{AppError, AppResponse, AppResult};
