//! Configuration for the bridge runner

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Archive used when no path is given on the command line
pub const DEFAULT_ARCHIVE_PATH: &str = "install/lib/regex-bridge.jar";

/// Pattern compiled by the probe run
pub const DEFAULT_PATTERN: &str = ".*JNI.*rocks.*";

/// Inputs tested against [`DEFAULT_PATTERN`], in print order
pub const DEFAULT_INPUTS: [&str; 2] = [
    "This strings will see if JNI is dumb as rocks or not",
    "This strings will see if jni is dumb as rocks or not",
];

/// Main runner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Archive placed on the runtime class path
    #[serde(default = "default_archive")]
    pub archive: PathBuf,

    /// Settings handed to the embedded runtime
    #[serde(default)]
    pub runtime: RuntimeSettings,

    /// Pattern and inputs evaluated by the run
    #[serde(default)]
    pub probe: ProbeConfig,
}

fn default_archive() -> PathBuf {
    PathBuf::from(DEFAULT_ARCHIVE_PATH)
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            archive: default_archive(),
            runtime: RuntimeSettings::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Build a configuration from process arguments
    ///
    /// The iterator yields arguments after the program name. The first one,
    /// if present, replaces the default archive path; the rest are ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        let mut config = Self::default();
        if let Some(archive) = args.into_iter().next() {
            config.archive = archive.into();
        }
        config
    }

    /// Replace the runtime settings
    pub fn with_runtime(mut self, runtime: RuntimeSettings) -> Self {
        self.runtime = runtime;
        self
    }

    /// Replace the probe pattern and inputs
    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }
}

/// JNI interface version requested at runtime creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JniVersion {
    V1_6,
    V1_8,
    #[default]
    V10,
}

impl JniVersion {
    /// Raw `jint` value as defined by `jni.h`
    pub fn raw(self) -> i32 {
        match self {
            JniVersion::V1_6 => 0x0001_0006,
            JniVersion::V1_8 => 0x0001_0008,
            JniVersion::V10 => 0x000a_0000,
        }
    }
}

/// Settings for the embedded runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Requested JNI version
    #[serde(default)]
    pub jni_version: JniVersion,

    /// Extra options passed verbatim to the runtime (e.g. `-Xmx64m`)
    #[serde(default)]
    pub jvm_options: Vec<String>,

    /// Class that must be loadable once the runtime is up, in binary
    /// name form (`com.example.Support`)
    #[serde(default)]
    pub required_class: Option<String>,
}

impl RuntimeSettings {
    /// Parse settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and parse a JSON settings file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if let Some(option) = self
            .jvm_options
            .iter()
            .find(|o| o.starts_with("-Djava.class.path="))
        {
            return Err(BridgeError::InvalidSettings {
                reason: format!(
                    "'{}' conflicts with the archive path; pass the archive as the first argument",
                    option
                ),
            });
        }
        if let Some(class) = &self.required_class {
            if class.trim().is_empty() {
                return Err(BridgeError::InvalidSettings {
                    reason: "required_class must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Pattern and inputs evaluated by one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Regex handed to the runtime's compiler
    pub pattern: String,

    /// Inputs matched in order; results are labelled `#1`, `#2`, ...
    pub inputs: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            inputs: DEFAULT_INPUTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
