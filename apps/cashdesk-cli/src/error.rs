//! # Application Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Cashdesk                               │
//! │                                                                         │
//! │  cashdesk checkout sale.json --drawer drawer.json                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, AppError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad file? ───── io / serde_json error ─────────┐               │  │
//! │  │         │                                        │               │  │
//! │  │         ▼                                        ▼               │  │
//! │  │  Underpaid? ──── CoreError::InsufficientCash ── AppError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ─── JSON on stdout ───────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: {"code":"NOT_ENOUGH_CASH","message":"..."}  exit code 3       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use cashdesk_core::error::UNSUPPORTED_CURRENCY;
use cashdesk_core::CoreError;

use crate::config::ConfigError;

/// Error returned from CLI commands.
///
/// ## Serialization
/// Printed to stderr when a command fails:
/// ```json
/// {
///   "code": "NOT_ENOUGH_CASH",
///   "message": "Not enough cash: customer still owes 4.00 USD"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Tenders do not cover the total (422)
    NotEnoughCash,

    /// Currency outside USD/KHR (400)
    InvalidCurrency,

    /// Input validation failed (400)
    ValidationError,

    /// Broken precondition inside the engine (500)
    InvariantViolation,

    /// Config file or values are unusable (400)
    ConfigError,

    /// File could not be read or written (500)
    IoError,

    /// Request or drawer file is malformed (400)
    ParseError,
}

impl ErrorCode {
    /// HTTP-style status class, kept for callers that wrap the CLI in a service.
    pub const fn status(&self) -> u16 {
        match self {
            ErrorCode::NotEnoughCash => 422,
            ErrorCode::InvalidCurrency
            | ErrorCode::ValidationError
            | ErrorCode::ConfigError
            | ErrorCode::ParseError => 400,
            ErrorCode::InvariantViolation | ErrorCode::IoError => 500,
        }
    }

    /// Process exit code.
    pub const fn exit_code(&self) -> i32 {
        match self.status() {
            422 => 3,
            400 => 2,
            _ => 1,
        }
    }
}

impl AppError {
    /// Creates a new application error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Renders the error as a single JSON line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!(r#"{{"code":"{:?}","message":"{}"}}"#, self.code, self.message))
    }
}

/// Converts engine errors to application errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InsufficientCash { .. } => ErrorCode::NotEnoughCash,
            CoreError::InvalidCurrency(_) => ErrorCode::InvalidCurrency,
            CoreError::InvariantViolation(reason) => {
                tracing::error!(%reason, "Settlement invariant violated");
                ErrorCode::InvariantViolation
            }
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        // serde surfaces our currency rejection as a custom message
        if err.is_data() && err.to_string().contains(UNSUPPORTED_CURRENCY) {
            return AppError::new(ErrorCode::InvalidCurrency, err.to_string());
        }
        AppError::new(ErrorCode::ParseError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_cash_maps_to_422() {
        let err: AppError = CoreError::InsufficientCash { owed: dec!(4) }.into();
        assert_eq!(err.code, ErrorCode::NotEnoughCash);
        assert_eq!(err.code.status(), 422);
        assert_eq!(err.code.exit_code(), 3);
    }

    #[test]
    fn test_invariant_violation_maps_to_500() {
        let err: AppError = CoreError::InvariantViolation("negative quantity".into()).into();
        assert_eq!(err.code.status(), 500);
        assert_eq!(err.code.exit_code(), 1);
    }

    #[test]
    fn test_json_shape() {
        let err = AppError::new(ErrorCode::NotEnoughCash, "short");
        assert_eq!(err.to_json(), r#"{"code":"NOT_ENOUGH_CASH","message":"short"}"#);
    }

    #[test]
    fn test_unknown_currency_in_json_is_invalid_currency() {
        let parse = serde_json::from_str::<cashdesk_core::Money>(r#"{"value": 1, "currency": "EUR"}"#)
            .unwrap_err();
        let err: AppError = parse.into();
        assert_eq!(err.code, ErrorCode::InvalidCurrency);
        assert_eq!(err.code.status(), 400);
    }

    #[test]
    fn test_invalid_currency_keeps_core_message() {
        let parse = serde_json::from_str::<cashdesk_core::Transaction>(
            r#"{"total": {"value": 1, "currency": "thb"}}"#,
        )
        .unwrap_err();
        let err: AppError = parse.into();
        assert_eq!(err.code, ErrorCode::InvalidCurrency);
        assert!(err.message.contains(UNSUPPORTED_CURRENCY));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let parse = serde_json::from_str::<cashdesk_core::Money>("{").unwrap_err();
        let err: AppError = parse.into();
        assert_eq!(err.code, ErrorCode::ParseError);
    }
}
