//! regex-bridge - run java.util.regex through an embedded JVM
//!
//! Compiles `.*JNI.*rocks.*` in the JVM and matches two sample strings,
//! printing one line per result.
//!
//! Usage:
//!     regex-bridge
//!     regex-bridge path/to/support.jar
//!     REGEX_BRIDGE_SETTINGS=jvm.json regex-bridge
//!     RUST_LOG=regex_bridge=debug regex-bridge
//!
//! Every failure is printed and the process still exits with status 0.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use regex_bridge::{BridgeConfig, BridgeRunner, JvmBackend, RuntimeSettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming an optional JSON runtime settings file
const SETTINGS_ENV: &str = "REGEX_BRIDGE_SETTINGS";

#[derive(Parser, Debug)]
#[command(name = "regex-bridge")]
#[command(about = "Match strings with java.util.regex through an embedded JVM")]
#[command(version)]
struct Args {
    /// Archive to put on the JVM class path
    #[arg(allow_hyphen_values = true)]
    archive: Option<PathBuf>,

    /// Extra arguments are accepted and ignored
    #[arg(hide = true)]
    rest: Vec<OsString>,
}

fn main() {
    // Logs go to stderr so stdout only carries results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "regex_bridge=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Covers --help and --version as well as usage errors
            let _ = e.print();
            return;
        }
    };

    let mut config = BridgeConfig::from_args(args.archive);

    if let Some(path) = std::env::var_os(SETTINGS_ENV).map(PathBuf::from) {
        match RuntimeSettings::load(&path) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), "loaded runtime settings");
                config = config.with_runtime(settings);
            }
            Err(e) => {
                println!("Error: Invalid settings file '{}': {}", path.display(), e);
                return;
            }
        }
    }

    tracing::debug!(archive = %config.archive.display(), "starting run");

    let mut runner = BridgeRunner::new(config, JvmBackend::new());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match runner.run(&mut out) {
        Ok(outcome) => tracing::debug!(?outcome, "run finished"),
        Err(e) => tracing::error!("failed to write output: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_may_start_with_hyphen() {
        let args = Args::try_parse_from(["regex-bridge", "-support.jar"]).unwrap();
        assert_eq!(args.archive, Some(PathBuf::from("-support.jar")));
    }

    #[test]
    fn test_extra_arguments_ignored() {
        let args = Args::try_parse_from(["regex-bridge", "a.jar", "b", "c"]).unwrap();
        assert_eq!(args.archive, Some(PathBuf::from("a.jar")));
        assert_eq!(args.rest.len(), 2);
    }
}
