//! Mock regex backend for testing
//!
//! Records every call for inspection and evaluates patterns with the
//! `regex` crate using whole-input semantics, the same way
//! `java.util.regex.Matcher::matches` does.
//!
//! Known gap: the `regex` crate's `.` matches `\r`, `\u{85}`, `\u{2028}`
//! and `\u{2029}`, Java's does not. Keep those out of mock-driven inputs.

use regex::Regex;

use crate::archive::ArchiveRef;
use crate::config::RuntimeSettings;
use crate::error::{BridgeError, Result};
use crate::runtime::RegexBackend;

/// Recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Initialize { class_path: String },
    Compile { regex: String },
    Matches { pattern_id: usize, input: String },
}

/// Pattern handle issued by [`MockBackend`]
#[derive(Debug, Clone)]
pub struct MockPattern {
    /// Sequence number of the compile call that produced this handle
    pub id: usize,
    regex: Regex,
}

/// Mock backend that records calls
///
/// Failure switches let tests drive every error path of the runner
/// without a JVM.
#[derive(Debug, Default)]
pub struct MockBackend {
    calls: Vec<RecordedCall>,
    compiled: usize,
    fail_initialize: bool,
    fail_matches: bool,
}

impl MockBackend {
    /// Create a new mock backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `initialize` report failure
    pub fn fail_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    /// Make every `matches` call report failure
    pub fn fail_matches(mut self) -> Self {
        self.fail_matches = true;
        self
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Number of `initialize` calls
    pub fn initialize_count(&self) -> usize {
        self.count(|c| matches!(c, RecordedCall::Initialize { .. }))
    }

    /// Number of `compile` calls
    pub fn compile_count(&self) -> usize {
        self.count(|c| matches!(c, RecordedCall::Compile { .. }))
    }

    /// Number of `matches` calls
    pub fn match_count(&self) -> usize {
        self.count(|c| matches!(c, RecordedCall::Matches { .. }))
    }

    fn count(&self, pred: impl Fn(&RecordedCall) -> bool) -> usize {
        self.calls.iter().filter(|&c| pred(c)).count()
    }
}

impl RegexBackend for MockBackend {
    type Pattern = MockPattern;

    fn initialize(&mut self, archive: &ArchiveRef, _settings: &RuntimeSettings) -> Result<()> {
        self.calls.push(RecordedCall::Initialize {
            class_path: archive.class_path(),
        });
        if self.fail_initialize {
            return Err(BridgeError::RuntimeSetup {
                reason: "mock initialization failure".to_string(),
            });
        }
        Ok(())
    }

    fn compile(&mut self, regex: &str) -> Result<MockPattern> {
        self.calls.push(RecordedCall::Compile {
            regex: regex.to_string(),
        });

        let compile_error = |e: regex::Error| BridgeError::Compile {
            pattern: regex.to_string(),
            reason: e.to_string(),
        };

        // Validate on its own first: a stray ')' would otherwise close the
        // anchoring group below and still compile
        Regex::new(regex).map_err(compile_error)?;

        // Anchor both ends: Matcher.matches() must consume the whole input
        let compiled = Regex::new(&format!("^(?:{})$", regex)).map_err(compile_error)?;

        self.compiled += 1;
        Ok(MockPattern {
            id: self.compiled,
            regex: compiled,
        })
    }

    fn matches(&mut self, pattern: &MockPattern, input: &str) -> Result<bool> {
        self.calls.push(RecordedCall::Matches {
            pattern_id: pattern.id,
            input: input.to_string(),
        });
        if self.fail_matches {
            return Err(BridgeError::Match {
                input: input.to_string(),
                reason: "mock match failure".to_string(),
            });
        }
        Ok(pattern.regex.is_match(input))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
