//! # Application Error Type
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Shell                              │
//! │                                                                         │
//! │  CoreError (bad code, over capacity, ...)                              │
//! │       │   shown to the user, menu continues                            │
//! │       ▼                                                                 │
//! │  AppError::Core ─────────────────────────────► re-prompt               │
//! │                                                                         │
//! │  DbError / io::Error / bad vend.toml                                   │
//! │       │   logged, process exits non-zero                               │
//! │       ▼                                                                 │
//! │  AppError::Db / Io / Config ─────────────────► run() returns failure   │
//! │                                                                         │
//! │  stdin closed                                                           │
//! │       ▼                                                                 │
//! │  AppError::EndOfInput ───────────────────────► save, then clean exit   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use vend_core::CoreError;
use vend_db::DbError;

#[derive(Debug, Error)]
pub enum AppError {
    /// A rule in vend-core rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input stream closed while a prompt was waiting.
    #[error("End of input")]
    EndOfInput,
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }

    /// Whether the menu can show this error and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Core(_))
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_are_recoverable() {
        let err: AppError = CoreError::EmptyCart.into();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Cart is empty");

        assert!(!AppError::config("bad").is_recoverable());
        assert!(!AppError::EndOfInput.is_recoverable());
    }
}
