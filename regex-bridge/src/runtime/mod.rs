//! # Embedded Runtime
//!
//! Narrow seam between the runner and whatever hosts the regex engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     EmbeddedRuntime<B>                              │
//! │  • Owns the backend                                                 │
//! │  • Uninitialized ──initialize()──▶ Initialized (one way, once)      │
//! │  • Rejects compile/matches before initialize                        │
//! └────────────────────────────────┬────────────────────────────────────┘
//!                                  │
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      RegexBackend (trait)                           │
//! ├──────────────────────────────────┬──────────────────────────────────┤
//! │ JvmBackend (`jvm` feature)       │ MockBackend                      │
//! │ java.util.regex over JNI         │ (testing)                        │
//! └──────────────────────────────────┴──────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use regex_bridge::config::RuntimeSettings;
//! use regex_bridge::runtime::{EmbeddedRuntime, MockBackend, RuntimeState};
//!
//! let path = std::env::temp_dir().join("runtime-doc-example.jar");
//! std::fs::write(&path, b"PK").unwrap();
//! let archive = regex_bridge::ArchiveRef::verify(&path).unwrap();
//!
//! let mut runtime = EmbeddedRuntime::new(MockBackend::new());
//! runtime.initialize(&archive, &RuntimeSettings::default()).unwrap();
//! assert_eq!(runtime.state(), RuntimeState::Initialized);
//!
//! let pattern = runtime.compile(".*JNI.*rocks.*").unwrap();
//! assert!(runtime.matches(&pattern, "JNI rocks").unwrap());
//! assert!(!runtime.matches(&pattern, "jni rocks").unwrap());
//! ```

pub mod backends;

use crate::archive::ArchiveRef;
use crate::config::RuntimeSettings;
use crate::error::{BridgeError, Result};

pub use backends::{MockBackend, MockPattern, RecordedCall};

#[cfg(feature = "jvm")]
pub use backends::{JavaPattern, JvmBackend};

/// Capabilities a regex host must provide
///
/// Implement this to put a different engine or embedding technology
/// behind the runner. Callers go through [`EmbeddedRuntime`], which
/// enforces the initialization order, so implementations may assume
/// `compile` and `matches` only run after a successful `initialize`.
pub trait RegexBackend {
    /// Opaque compiled-pattern handle owned by the host
    type Pattern;

    /// Bring the host up with `archive` on its class path
    fn initialize(&mut self, archive: &ArchiveRef, settings: &RuntimeSettings) -> Result<()>;

    /// Compile `regex` into a pattern handle
    fn compile(&mut self, regex: &str) -> Result<Self::Pattern>;

    /// Whether the whole of `input` matches `pattern`
    fn matches(&mut self, pattern: &Self::Pattern, input: &str) -> Result<bool>;

    /// Backend name (for logging)
    fn name(&self) -> &'static str;
}

/// Lifecycle of an embedded runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    Uninitialized,
    Initialized,
}

/// A backend plus its one-shot lifecycle
pub struct EmbeddedRuntime<B: RegexBackend> {
    backend: B,
    state: RuntimeState,
}

impl<B: RegexBackend> EmbeddedRuntime<B> {
    /// Wrap an uninitialized backend
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            state: RuntimeState::Uninitialized,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RuntimeState {
        self.state
    }

    /// Borrow the backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Initialize the backend
    ///
    /// Allowed exactly once. A failed attempt leaves the runtime
    /// uninitialized; the runner never retries.
    pub fn initialize(&mut self, archive: &ArchiveRef, settings: &RuntimeSettings) -> Result<()> {
        if self.state == RuntimeState::Initialized {
            return Err(BridgeError::AlreadyInitialized);
        }

        tracing::debug!(
            backend = self.backend.name(),
            archive = %archive.path().display(),
            "initializing runtime"
        );
        self.backend.initialize(archive, settings)?;
        self.state = RuntimeState::Initialized;
        tracing::info!(backend = self.backend.name(), "runtime initialized");
        Ok(())
    }

    /// Compile a regex
    pub fn compile(&mut self, regex: &str) -> Result<B::Pattern> {
        self.ensure_initialized()?;
        self.backend.compile(regex)
    }

    /// Match a compiled pattern against an input
    pub fn matches(&mut self, pattern: &B::Pattern, input: &str) -> Result<bool> {
        self.ensure_initialized()?;
        self.backend.matches(pattern, input)
    }

    fn ensure_initialized(&self) -> Result<()> {
        match self.state {
            RuntimeState::Initialized => Ok(()),
            RuntimeState::Uninitialized => Err(BridgeError::NotInitialized),
        }
    }
}
