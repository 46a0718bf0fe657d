//! Bridge runner
//!
//! Drives one run: verify the archive, bring the runtime up, compile the
//! probe pattern, match each input and print the results. Every failure
//! is printed and ends the run early; nothing is retried.

use std::io::Write;

use crate::archive::ArchiveRef;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::runtime::{EmbeddedRuntime, RegexBackend};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every input was matched; results are in input order
    Completed { results: Vec<bool> },
    /// The archive was missing or not a regular file
    ArchiveMissing,
    /// The runtime failed to initialize
    SetupFailed,
    /// The probe pattern did not compile
    CompileFailed,
    /// Matching input `ordinal` (1-based) failed
    MatchFailed { ordinal: usize },
}

impl RunOutcome {
    /// Whether the run printed all results
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

/// Runs the probe against an embedded runtime
pub struct BridgeRunner<B: RegexBackend> {
    config: BridgeConfig,
    runtime: EmbeddedRuntime<B>,
}

impl<B: RegexBackend> BridgeRunner<B> {
    /// Create a runner around an uninitialized backend
    pub fn new(config: BridgeConfig, backend: B) -> Self {
        Self {
            config,
            runtime: EmbeddedRuntime::new(backend),
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The wrapped runtime
    pub fn runtime(&self) -> &EmbeddedRuntime<B> {
        &self.runtime
    }

    /// The wrapped runtime, for calls beyond the probe
    pub fn runtime_mut(&mut self) -> &mut EmbeddedRuntime<B> {
        &mut self.runtime
    }

    /// Run once, writing user-facing output to `out`
    ///
    /// Only a failure to write `out` is returned as an error. Every
    /// bridge failure is printed and reported through [`RunOutcome`].
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<RunOutcome> {
        let archive = match ArchiveRef::verify(&self.config.archive) {
            Ok(archive) => archive,
            Err(e) => {
                log_failure(&e);
                writeln!(
                    out,
                    "Error: Jar file '{}' does not exist!",
                    self.config.archive.display()
                )?;
                return Ok(RunOutcome::ArchiveMissing);
            }
        };

        if let Err(e) = self.runtime.initialize(&archive, &self.config.runtime) {
            log_failure(&e);
            writeln!(out, "Error: Java setup failed!")?;
            return Ok(RunOutcome::SetupFailed);
        }

        let pattern = match self.runtime.compile(&self.config.probe.pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                log_failure(&e);
                writeln!(out, "Error: Pattern compilation failed!")?;
                return Ok(RunOutcome::CompileFailed);
            }
        };

        // Match everything before printing so output is all-or-nothing
        let mut results = Vec::with_capacity(self.config.probe.inputs.len());
        for (index, input) in self.config.probe.inputs.iter().enumerate() {
            match self.runtime.matches(&pattern, input) {
                Ok(matched) => results.push(matched),
                Err(e) => {
                    let ordinal = index + 1;
                    log_failure(&e);
                    writeln!(out, "Error: Pattern match #{} failed!", ordinal)?;
                    return Ok(RunOutcome::MatchFailed { ordinal });
                }
            }
        }

        for (index, matched) in results.iter().enumerate() {
            writeln!(out, "#{} Matches = {}", index + 1, matched)?;
        }

        Ok(RunOutcome::Completed { results })
    }
}

fn log_failure(err: &BridgeError) {
    tracing::warn!(code = err.error_code(), "{}", err);
}
