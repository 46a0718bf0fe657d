//! Error types for bridge operations
//!
//! Every failure the runner can detect maps onto one [`BridgeError`]
//! variant. Each variant carries:
//! - A human-readable message naming the offending path, pattern or input
//! - A stable error code for programmatic handling (and the C ABI)
//! - A category for grouping
//!
//! # Example
//!
//! ```rust
//! use regex_bridge::error::{BridgeError, ErrorCategory};
//!
//! let err = BridgeError::ArchiveNotFound { path: "missing.jar".into() };
//! assert_eq!(err.category(), ErrorCategory::Archive);
//! assert_eq!(err.error_code(), "ARCHIVE_NOT_FOUND");
//! assert!(err.is_setup_failure());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Archive path missing or not a regular file
    Archive,
    /// Embedded runtime could not be brought up
    Setup,
    /// Runtime used in the wrong lifecycle state
    Lifecycle,
    /// A call into the managed runtime failed
    Java,
    /// Settings could not be read or parsed
    Config,
    /// Local I/O failed
    Io,
}

/// Errors that can occur while driving the embedded runtime
#[derive(Error, Debug)]
pub enum BridgeError {
    // ═══════════════════════════════════════════════════════════════════════
    // Archive and setup errors
    // ═══════════════════════════════════════════════════════════════════════

    /// The archive path does not name an existing regular file
    #[error("Jar file '{path}' does not exist")]
    ArchiveNotFound { path: String },

    /// The embedded runtime refused to start
    #[error("Runtime setup failed: {reason}")]
    RuntimeSetup { reason: String },

    /// A class that must be on the class path could not be loaded
    #[error("Required class '{class}' not found in class path '{class_path}'")]
    MissingClass { class: String, class_path: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Lifecycle errors
    // ═══════════════════════════════════════════════════════════════════════

    /// `initialize` was called a second time
    #[error("Runtime already initialized. The embedded runtime can only be created once per process.")]
    AlreadyInitialized,

    /// `compile` or `matches` was called before `initialize`
    #[error("Runtime not initialized. Call initialize() first.")]
    NotInitialized,

    // ═══════════════════════════════════════════════════════════════════════
    // Foreign call errors
    // ═══════════════════════════════════════════════════════════════════════

    /// The runtime rejected the regex
    #[error("Failed to compile pattern '{pattern}': {reason}")]
    Compile { pattern: String, reason: String },

    /// Matching a compiled pattern against an input failed
    #[error("Failed to match input '{input}': {reason}")]
    Match { input: String, reason: String },

    /// A string could not cross the foreign boundary
    #[error("Invalid string argument: {reason}")]
    InvalidString { reason: String },

    // ═══════════════════════════════════════════════════════════════════════
    // Infrastructure errors
    // ═══════════════════════════════════════════════════════════════════════

    /// Runtime settings are malformed
    #[error("Invalid settings: {reason}")]
    InvalidSettings { reason: String },

    /// JSON deserialization of settings failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns true if the error happened before any pattern was compiled
    ///
    /// These are the failures the runner reports as "setup" problems:
    /// a missing archive, a runtime that would not start, or a missing
    /// support class.
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Archive | ErrorCategory::Setup
        )
    }

    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::ArchiveNotFound { .. } => ErrorCategory::Archive,

            BridgeError::RuntimeSetup { .. }
            | BridgeError::MissingClass { .. } => ErrorCategory::Setup,

            BridgeError::AlreadyInitialized
            | BridgeError::NotInitialized => ErrorCategory::Lifecycle,

            BridgeError::Compile { .. }
            | BridgeError::Match { .. }
            | BridgeError::InvalidString { .. } => ErrorCategory::Java,

            BridgeError::InvalidSettings { .. }
            | BridgeError::Json(_) => ErrorCategory::Config,

            BridgeError::Io(_) => ErrorCategory::Io,
        }
    }

    /// Returns the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BridgeError::ArchiveNotFound { .. } => "ARCHIVE_NOT_FOUND",
            BridgeError::RuntimeSetup { .. } => "RUNTIME_SETUP_FAILED",
            BridgeError::MissingClass { .. } => "MISSING_CLASS",
            BridgeError::AlreadyInitialized => "ALREADY_INITIALIZED",
            BridgeError::NotInitialized => "NOT_INITIALIZED",
            BridgeError::Compile { .. } => "COMPILE_FAILED",
            BridgeError::Match { .. } => "MATCH_FAILED",
            BridgeError::InvalidString { .. } => "INVALID_STRING",
            BridgeError::InvalidSettings { .. } => "INVALID_SETTINGS",
            BridgeError::Json(_) => "JSON_ERROR",
            BridgeError::Io(_) => "IO_ERROR",
        }
    }
}

#[cfg(feature = "jvm")]
impl From<jni::StartJvmError> for BridgeError {
    fn from(err: jni::StartJvmError) -> Self {
        BridgeError::RuntimeSetup {
            reason: err.to_string(),
        }
    }
}

#[cfg(feature = "jvm")]
impl From<jni::JvmError> for BridgeError {
    fn from(err: jni::JvmError) -> Self {
        BridgeError::RuntimeSetup {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            BridgeError::ArchiveNotFound {
                path: "a.jar".to_string()
            }
            .error_code(),
            "ARCHIVE_NOT_FOUND"
        );
        assert_eq!(BridgeError::AlreadyInitialized.error_code(), "ALREADY_INITIALIZED");
        assert_eq!(
            BridgeError::Compile {
                pattern: "(".to_string(),
                reason: "unclosed group".to_string()
            }
            .error_code(),
            "COMPILE_FAILED"
        );
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            BridgeError::RuntimeSetup {
                reason: "no libjvm".to_string()
            }
            .category(),
            ErrorCategory::Setup
        );
        assert_eq!(BridgeError::NotInitialized.category(), ErrorCategory::Lifecycle);
        assert_eq!(
            BridgeError::Match {
                input: "x".to_string(),
                reason: "boom".to_string()
            }
            .category(),
            ErrorCategory::Java
        );
    }

    #[test]
    fn test_setup_failures() {
        assert!(BridgeError::MissingClass {
            class: "a.B".to_string(),
            class_path: "x.jar".to_string()
        }
        .is_setup_failure());
        assert!(!BridgeError::NotInitialized.is_setup_failure());
        assert!(!BridgeError::Compile {
            pattern: "[".to_string(),
            reason: "bad".to_string()
        }
        .is_setup_failure());
    }

    #[test]
    fn test_error_messages_name_the_subject() {
        let err = BridgeError::ArchiveNotFound {
            path: "/opt/lib/support.jar".to_string(),
        };
        assert!(err.to_string().contains("/opt/lib/support.jar"));

        let err = BridgeError::Compile {
            pattern: "a(b".to_string(),
            reason: "Unclosed group".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a(b"));
        assert!(msg.contains("Unclosed group"));
    }

    #[test]
    fn test_json_error_converts() {
        let err: BridgeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::Config);
    }
}
