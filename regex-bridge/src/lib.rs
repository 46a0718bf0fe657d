//! # regex-bridge
//!
//! Compile and evaluate `java.util.regex` patterns from Rust by embedding
//! a JVM through JNI.
//!
//! - **Archive check**: the class path archive must be an existing regular
//!   file before the JVM is touched
//! - **Embedded runtime**: a one-shot `Uninitialized -> Initialized`
//!   lifecycle around a swappable [`RegexBackend`]
//! - **Runner**: compiles one pattern, matches each input, prints
//!   `#<n> Matches = <bool>`
//! - **C ABI** (`ffi` feature): the same three capabilities for C callers
//!
//! ## Example
//!
//! ```rust
//! use regex_bridge::{BridgeConfig, BridgeRunner, MockBackend, RunOutcome};
//!
//! let path = std::env::temp_dir().join("lib-doc-example.jar");
//! std::fs::write(&path, b"PK").unwrap();
//!
//! let config = BridgeConfig::from_args([path.clone()]);
//! let mut runner = BridgeRunner::new(config, MockBackend::new());
//!
//! let mut out = Vec::new();
//! let outcome = runner.run(&mut out).unwrap();
//!
//! assert_eq!(outcome, RunOutcome::Completed { results: vec![true, false] });
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "#1 Matches = true\n#2 Matches = false\n"
//! );
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod runner;
pub mod runtime;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export main types
pub use archive::ArchiveRef;
pub use config::{BridgeConfig, JniVersion, ProbeConfig, RuntimeSettings, DEFAULT_ARCHIVE_PATH};
pub use error::{BridgeError, ErrorCategory, Result};
pub use runner::{BridgeRunner, RunOutcome};
pub use runtime::{EmbeddedRuntime, MockBackend, RegexBackend, RuntimeState};

#[cfg(feature = "jvm")]
pub use runtime::JvmBackend;
