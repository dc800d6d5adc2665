//! Error types for banter operations.
//!
//! Provides a single error enum with structured error codes for
//! programmatic handling, plus constructor helpers.

use thiserror::Error;

/// Result type alias for banter operations.
pub type BanterResult<T> = Result<T, BanterError>;

/// Main error type for all banter operations.
#[derive(Error, Debug)]
pub enum BanterError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {message}")]
    Configuration { message: String, code: ErrorCode },

    /// A table name outside the known registry was requested.
    ///
    /// This indicates a caller bug, not missing data; missing data is
    /// signalled with an empty table instead.
    #[error("Unknown table: {name}")]
    UnknownTable { name: String, code: ErrorCode },

    /// The table source collaborator failed.
    #[error("Table source error: {message}")]
    Source {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Configuration (CFG_xxx)
    CfgInvalid,
    CfgMissingGeneral,

    // Validation (VAL_xxx)
    ValUnknownTable,

    // Table source (SRC_xxx)
    SrcFetchFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CfgInvalid => "CFG_001",
            ErrorCode::CfgMissingGeneral => "CFG_002",
            ErrorCode::ValUnknownTable => "VAL_001",
            ErrorCode::SrcFetchFailed => "SRC_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl BanterError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            code: ErrorCode::CfgInvalid,
        }
    }

    /// Create the error for a response table with no `general` category.
    pub fn missing_general() -> Self {
        Self::Configuration {
            message: "response table has no 'general' category".to_string(),
            code: ErrorCode::CfgMissingGeneral,
        }
    }

    /// Create an unknown-table error.
    pub fn unknown_table(name: impl Into<String>) -> Self {
        Self::UnknownTable {
            name: name.into(),
            code: ErrorCode::ValUnknownTable,
        }
    }

    /// Create a table source error.
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
            code: ErrorCode::SrcFetchFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { code, .. } => *code,
            Self::UnknownTable { code, .. } => *code,
            Self::Source { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Configuration { .. } => {
                Some("Please check your configuration file and workbook contents")
            }
            Self::UnknownTable { .. } => {
                Some("Please use one of the registered table names, or 'all'")
            }
            Self::Source { .. } => Some("Please check the workbook path and table files"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_table_error() {
        let err = BanterError::unknown_table("nonsense");
        assert_eq!(err.code(), ErrorCode::ValUnknownTable);
        assert!(err.to_string().contains("nonsense"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_missing_general_error() {
        let err = BanterError::missing_general();
        assert_eq!(err.code(), ErrorCode::CfgMissingGeneral);
        assert!(err.to_string().contains("general"));
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::CfgMissingGeneral.as_str(), "CFG_002");
        assert_eq!(ErrorCode::ValUnknownTable.as_str(), "VAL_001");
    }
}
