//! Runner integration tests
//!
//! Drive `BridgeRunner` end to end with `MockBackend` standing in for
//! the JVM, capturing what would be printed to stdout.

use std::fs;
use std::path::PathBuf;

use regex_bridge::config::ProbeConfig;
use regex_bridge::runtime::RecordedCall;
use regex_bridge::{
    BridgeConfig, BridgeRunner, MockBackend, RunOutcome, RuntimeState, DEFAULT_ARCHIVE_PATH,
};

/// A scratch path under the system temp dir, removed on drop
struct Scratch {
    path: PathBuf,
}

impl Scratch {
    fn file() -> Self {
        let path = std::env::temp_dir().join(format!("regex-bridge-{}.jar", uuid::Uuid::new_v4()));
        fs::write(&path, b"PK\x03\x04").expect("Failed to create scratch archive");
        Self { path }
    }

    fn dir() -> Self {
        let path = std::env::temp_dir().join(format!("regex-bridge-{}", uuid::Uuid::new_v4()));
        fs::create_dir(&path).expect("Failed to create scratch dir");
        Self { path }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if self.path.is_dir() {
            let _ = fs::remove_dir(&self.path);
        } else {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn run(config: BridgeConfig, backend: MockBackend) -> (RunOutcome, String, BridgeRunner<MockBackend>) {
    let mut runner = BridgeRunner::new(config, backend);
    let mut out = Vec::new();
    let outcome = runner.run(&mut out).expect("Writing to a Vec cannot fail");
    (outcome, String::from_utf8(out).unwrap(), runner)
}

#[test]
fn test_default_pattern_is_case_sensitive() {
    let archive = Scratch::file();
    let config = BridgeConfig::from_args([archive.path.clone()]);

    let (outcome, output, runner) = run(config, MockBackend::new());

    assert_eq!(outcome, RunOutcome::Completed { results: vec![true, false] });
    assert_eq!(output, "#1 Matches = true\n#2 Matches = false\n");
    assert_eq!(runner.runtime().state(), RuntimeState::Initialized);
}

#[test]
fn test_calls_reach_backend_in_order() {
    let archive = Scratch::file();
    let config = BridgeConfig::from_args([archive.path.clone()]);

    let (_, _, runner) = run(config, MockBackend::new());
    let calls = runner.runtime().backend().calls();

    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[0],
        RecordedCall::Initialize {
            class_path: archive.path.display().to_string()
        }
    );
    assert_eq!(
        calls[1],
        RecordedCall::Compile {
            regex: ".*JNI.*rocks.*".to_string()
        }
    );
    // Both matches use the single compiled handle
    assert!(matches!(&calls[2], RecordedCall::Matches { pattern_id: 1, input } if input.contains("JNI")));
    assert!(matches!(&calls[3], RecordedCall::Matches { pattern_id: 1, input } if input.contains("jni")));
}

#[test]
fn test_missing_archive_skips_runtime() {
    let missing = std::env::temp_dir().join(format!("absent-{}.jar", uuid::Uuid::new_v4()));
    let config = BridgeConfig::from_args([missing.clone()]);

    let (outcome, output, runner) = run(config, MockBackend::new());

    assert_eq!(outcome, RunOutcome::ArchiveMissing);
    assert_eq!(
        output,
        format!("Error: Jar file '{}' does not exist!\n", missing.display())
    );
    assert!(runner.runtime().backend().calls().is_empty());
    assert_eq!(runner.runtime().state(), RuntimeState::Uninitialized);
}

#[test]
fn test_directory_treated_as_missing() {
    let dir = Scratch::dir();
    let config = BridgeConfig::from_args([dir.path.clone()]);

    let (outcome, output, runner) = run(config, MockBackend::new());

    assert_eq!(outcome, RunOutcome::ArchiveMissing);
    assert_eq!(
        output,
        format!("Error: Jar file '{}' does not exist!\n", dir.path.display())
    );
    assert_eq!(runner.runtime().backend().initialize_count(), 0);
}

#[test]
fn test_setup_failure_skips_compile() {
    let archive = Scratch::file();
    let config = BridgeConfig::from_args([archive.path.clone()]);

    let (outcome, output, runner) = run(config, MockBackend::new().fail_initialize());

    assert_eq!(outcome, RunOutcome::SetupFailed);
    assert_eq!(output, "Error: Java setup failed!\n");

    let backend = runner.runtime().backend();
    assert_eq!(backend.initialize_count(), 1);
    assert_eq!(backend.compile_count(), 0);
    assert_eq!(backend.match_count(), 0);
}

#[test]
fn test_compile_failure_is_reported() {
    let archive = Scratch::file();
    let config = BridgeConfig::from_args([archive.path.clone()]).with_probe(ProbeConfig {
        pattern: "(unclosed".to_string(),
        inputs: vec!["anything".to_string()],
    });

    let (outcome, output, runner) = run(config, MockBackend::new());

    assert_eq!(outcome, RunOutcome::CompileFailed);
    assert_eq!(output, "Error: Pattern compilation failed!\n");
    assert_eq!(runner.runtime().backend().match_count(), 0);
}

#[test]
fn test_match_failure_prints_no_partial_results() {
    let archive = Scratch::file();
    let config = BridgeConfig::from_args([archive.path.clone()]);

    let (outcome, output, runner) = run(config, MockBackend::new().fail_matches());

    assert_eq!(outcome, RunOutcome::MatchFailed { ordinal: 1 });
    assert_eq!(output, "Error: Pattern match #1 failed!\n");
    assert_eq!(runner.runtime().backend().match_count(), 1);
}

#[test]
fn test_custom_pattern_labels_every_input() {
    let archive = Scratch::file();
    let config = BridgeConfig::from_args([archive.path.clone()]).with_probe(ProbeConfig {
        pattern: "[0-9]+".to_string(),
        inputs: vec!["42".to_string(), "4x2".to_string(), "".to_string()],
    });

    let (outcome, output, _) = run(config, MockBackend::new());

    assert_eq!(
        outcome,
        RunOutcome::Completed {
            results: vec![true, false, false]
        }
    );
    assert_eq!(
        output,
        "#1 Matches = true\n#2 Matches = false\n#3 Matches = false\n"
    );
}

#[test]
fn test_default_archive_is_deterministic() {
    let first = BridgeConfig::from_args(Vec::<PathBuf>::new());
    let second = BridgeConfig::from_args(Vec::<PathBuf>::new());

    assert_eq!(first.archive, PathBuf::from(DEFAULT_ARCHIVE_PATH));
    assert_eq!(first, second);

    // The default archive is not shipped with the tests, so both runs
    // stop at the archive check with identical output
    if !first.archive.is_file() {
        let (outcome_a, output_a, _) = run(first, MockBackend::new());
        let (outcome_b, output_b, _) = run(second, MockBackend::new());
        assert_eq!(outcome_a, RunOutcome::ArchiveMissing);
        assert_eq!(outcome_a, outcome_b);
        assert_eq!(output_a, output_b);
        assert!(output_a.contains(DEFAULT_ARCHIVE_PATH));
    }
}

#[test]
fn test_settings_flow_into_config() {
    let settings = regex_bridge::RuntimeSettings::from_json_str(
        r#"{ "jni_version": "v1_8", "jvm_options": ["-Xss1m"] }"#,
    )
    .unwrap();
    let archive = Scratch::file();
    let config = BridgeConfig::from_args([archive.path.clone()]).with_runtime(settings.clone());

    let (outcome, _, runner) = run(config, MockBackend::new());

    assert!(outcome.is_completed());
    assert_eq!(runner.config().runtime, settings);
}
