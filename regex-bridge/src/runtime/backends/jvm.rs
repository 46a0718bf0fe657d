//! JVM backend
//!
//! Hosts `java.util.regex` inside an embedded JVM created through the
//! JNI invocation API. Only one JVM can exist per process, so the created
//! `JavaVM` lives in a process-wide `OnceLock` and a second
//! `initialize` (from any `JvmBackend`) is rejected.

use std::sync::OnceLock;

use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JString, JValue};
use jni::{InitArgsBuilder, JNIEnv, JNIVersion, JavaVM};

use crate::archive::ArchiveRef;
use crate::config::RuntimeSettings;
use crate::error::{BridgeError, Result};
use crate::runtime::RegexBackend;

/// The process-wide JVM
static JVM: OnceLock<JavaVM> = OnceLock::new();

const PATTERN_CLASS: &str = "java/util/regex/Pattern";
const COMPILE_SIG: &str = "(Ljava/lang/String;)Ljava/util/regex/Pattern;";
const MATCHER_SIG: &str = "(Ljava/lang/CharSequence;)Ljava/util/regex/Matcher;";

/// Local references created per match call: the input string and the matcher
const MATCH_FRAME_CAPACITY: i32 = 4;

/// A compiled `java.util.regex.Pattern`, pinned by a global reference
#[derive(Clone)]
pub struct JavaPattern {
    global: GlobalRef,
}

impl std::fmt::Debug for JavaPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JavaPattern").finish_non_exhaustive()
    }
}

/// Backend that delegates to `java.util.regex` over JNI
#[derive(Default)]
pub struct JvmBackend {
    vm: Option<&'static JavaVM>,
}

impl std::fmt::Debug for JvmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JvmBackend")
            .field("attached", &self.vm.is_some())
            .finish()
    }
}

impl JvmBackend {
    /// Create a backend; the JVM is not started until `initialize`
    pub const fn new() -> Self {
        Self { vm: None }
    }

    /// Whether a JVM has already been created in this process
    pub fn jvm_created() -> bool {
        JVM.get().is_some()
    }

    fn env(&self) -> Result<JNIEnv<'static>> {
        let vm = self.vm.ok_or(BridgeError::NotInitialized)?;
        vm.attach_current_thread_permanently()
            .map_err(|e| BridgeError::RuntimeSetup {
                reason: format!("failed to attach thread: {}", e),
            })
    }
}

impl RegexBackend for JvmBackend {
    type Pattern = JavaPattern;

    fn initialize(&mut self, archive: &ArchiveRef, settings: &RuntimeSettings) -> Result<()> {
        if Self::jvm_created() {
            return Err(BridgeError::AlreadyInitialized);
        }

        let class_path = format!("-Djava.class.path={}", archive.class_path());
        tracing::debug!(
            class_path = %class_path,
            jni_version = ?settings.jni_version,
            extra_options = settings.jvm_options.len(),
            "creating JVM"
        );

        let mut builder = InitArgsBuilder::new()
            .version(JNIVersion::from(settings.jni_version.raw()))
            .option(class_path.as_str())
            .ignore_unrecognized(false);
        for option in &settings.jvm_options {
            builder = builder.option(option.as_str());
        }
        let args = builder.build()?;

        let vm = JavaVM::new(args)?;
        if JVM.set(vm).is_err() {
            return Err(BridgeError::AlreadyInitialized);
        }
        let vm = JVM.get().ok_or_else(|| BridgeError::RuntimeSetup {
            reason: "JVM handle missing after creation".to_string(),
        })?;
        self.vm = Some(vm);

        if let Some(class) = &settings.required_class {
            let mut env = self.env()?;
            match env.find_class(class.replace('.', "/")) {
                Ok(found) => {
                    let _ = env.delete_local_ref(found);
                }
                Err(e) => {
                    let reason = describe_failure(&mut env, e);
                    tracing::error!(class = %class, %reason, "required class not in class path");
                    return Err(BridgeError::MissingClass {
                        class: class.clone(),
                        class_path: archive.class_path(),
                    });
                }
            }
        }

        Ok(())
    }

    fn compile(&mut self, regex: &str) -> Result<JavaPattern> {
        let mut env = self.env()?;
        match compile_pattern(&mut env, regex) {
            Ok(global) => Ok(JavaPattern { global }),
            Err(e) => Err(BridgeError::Compile {
                pattern: regex.to_string(),
                reason: describe_failure(&mut env, e),
            }),
        }
    }

    fn matches(&mut self, pattern: &JavaPattern, input: &str) -> Result<bool> {
        let mut env = self.env()?;
        let result = env.with_local_frame(MATCH_FRAME_CAPACITY, |env| -> jni::errors::Result<bool> {
            let jinput = env.new_string(input)?;
            let matcher = env
                .call_method(
                    pattern.global.as_obj(),
                    "matcher",
                    MATCHER_SIG,
                    &[JValue::Object(&jinput)],
                )?
                .l()?;
            env.call_method(&matcher, "matches", "()Z", &[])?.z()
        });

        result.map_err(|e| BridgeError::Match {
            input: input.to_string(),
            reason: describe_failure(&mut env, e),
        })
    }

    fn name(&self) -> &'static str {
        "jvm"
    }
}

fn compile_pattern(env: &mut JNIEnv, regex: &str) -> jni::errors::Result<GlobalRef> {
    let jregex = env.new_string(regex)?;
    let pattern = env
        .call_static_method(PATTERN_CLASS, "compile", COMPILE_SIG, &[JValue::Object(&jregex)])?
        .l()?;
    let global = env.new_global_ref(&pattern)?;
    env.delete_local_ref(pattern)?;
    Ok(global)
}

/// Turn a JNI failure into text, clearing any pending Java exception
fn describe_failure(env: &mut JNIEnv, err: JniError) -> String {
    // Whatever failed, never leave an exception pending for the next call
    let pending = take_pending_exception(env);
    match err {
        JniError::JavaException => pending.unwrap_or_else(|| err.to_string()),
        other => match pending {
            Some(exception) => format!("{} ({})", other, exception),
            None => other.to_string(),
        },
    }
}

fn take_pending_exception(env: &mut JNIEnv) -> Option<String> {
    if !env.exception_check().unwrap_or(false) {
        return None;
    }
    let throwable = env.exception_occurred().ok()?;
    env.exception_clear().ok()?;

    let text = env
        .call_method(&throwable, "toString", "()Ljava/lang/String;", &[])
        .ok()?
        .l()
        .ok()?;
    let text = JString::from(text);
    let description: String = env.get_string(&text).ok()?.into();

    tracing::error!(exception = %description, "caught Java exception");
    Some(description)
}
