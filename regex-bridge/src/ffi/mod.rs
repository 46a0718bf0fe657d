//! FFI (Foreign Function Interface) for the regex bridge
//!
//! C-compatible entry points that let any host language drive
//! `java.util.regex` through the embedded JVM:
//!
//! ```c
//! bool regex_bridge_setup(const char *archive);
//! RBPattern *regex_bridge_compile_pattern(const char *regex);
//! int regex_bridge_pattern_matches(const RBPattern *pattern, const char *input);
//! void regex_bridge_pattern_free(RBPattern *pattern);
//! char *regex_bridge_last_error(void);
//! void regex_bridge_free_string(char *s);
//! ```
//!
//! ## Memory Management
//!
//! - Pattern handles must be freed with `regex_bridge_pattern_free`.
//! - Strings returned by this API must be freed with `regex_bridge_free_string`.
//! - Strings passed in must be valid UTF-8 and null-terminated.
//!
//! ## Error Handling
//!
//! - Functions return null, `false` or `-1` on error.
//! - `regex_bridge_last_error` returns the last message for the calling thread.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::sync::{Mutex, MutexGuard};

use crate::archive::ArchiveRef;
use crate::config::RuntimeSettings;
use crate::error::{BridgeError, Result};
use crate::runtime::{EmbeddedRuntime, JavaPattern, JvmBackend};

// Thread-local storage for error messages
thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// The runtime shared by every C caller
static RUNTIME: Mutex<EmbeddedRuntime<JvmBackend>> =
    Mutex::new(EmbeddedRuntime::new(JvmBackend::new()));

fn set_error(err: &BridgeError) {
    let msg = format!("{}: {}", err.error_code(), err);
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = Some(msg);
    });
}

fn clear_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

fn runtime() -> MutexGuard<'static, EmbeddedRuntime<JvmBackend>> {
    // A panic while holding the lock leaves the runtime state intact
    RUNTIME.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Borrow a C string as UTF-8.
unsafe fn c_str<'a>(s: *const c_char, what: &str) -> Result<&'a str> {
    if s.is_null() {
        return Err(BridgeError::InvalidString {
            reason: format!("null {} pointer", what),
        });
    }
    CStr::from_ptr(s).to_str().map_err(|e| BridgeError::InvalidString {
        reason: format!("{} is not valid UTF-8: {}", what, e),
    })
}

// ============================================================================
// String Helpers
// ============================================================================

/// Get the last error message for this thread.
///
/// Returns null if the last call succeeded.
/// The returned string must be freed with `regex_bridge_free_string`.
#[no_mangle]
pub extern "C" fn regex_bridge_last_error() -> *mut c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(msg) => CString::new(msg.as_str())
            .map(|s| s.into_raw())
            .unwrap_or(ptr::null_mut()),
        None => ptr::null_mut(),
    })
}

/// Free a string returned by this API.
#[no_mangle]
pub extern "C" fn regex_bridge_free_string(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            drop(CString::from_raw(s));
        }
    }
}

// ============================================================================
// Runtime API
// ============================================================================

/// Opaque handle to a compiled pattern
pub struct RBPattern {
    inner: JavaPattern,
}

/// Create the embedded JVM with `archive` on its class path.
///
/// Returns false if the archive is missing, the JVM fails to start, or
/// setup already ran in this process.
#[no_mangle]
pub extern "C" fn regex_bridge_setup(archive: *const c_char) -> bool {
    clear_error();

    let result = unsafe { c_str(archive, "archive") }
        .and_then(|path| ArchiveRef::verify(path))
        .and_then(|archive| runtime().initialize(&archive, &RuntimeSettings::default()));

    match result {
        Ok(()) => true,
        Err(e) => {
            set_error(&e);
            false
        }
    }
}

/// Compile a regex with `java.util.regex.Pattern.compile`.
///
/// Returns null on error.
/// The pattern must be freed with `regex_bridge_pattern_free`.
#[no_mangle]
pub extern "C" fn regex_bridge_compile_pattern(regex: *const c_char) -> *mut RBPattern {
    clear_error();

    let result = unsafe { c_str(regex, "regex") }.and_then(|regex| runtime().compile(regex));

    match result {
        Ok(inner) => Box::into_raw(Box::new(RBPattern { inner })),
        Err(e) => {
            set_error(&e);
            ptr::null_mut()
        }
    }
}

/// Test whether the whole of `input` matches `pattern`.
///
/// Returns 1 on match, 0 on no match, -1 on error.
#[no_mangle]
pub extern "C" fn regex_bridge_pattern_matches(
    pattern: *const RBPattern,
    input: *const c_char,
) -> c_int {
    clear_error();

    let pattern = match unsafe { pattern.as_ref() } {
        Some(p) => p,
        None => {
            set_error(&BridgeError::InvalidString {
                reason: "null pattern pointer".to_string(),
            });
            return -1;
        }
    };

    let result = unsafe { c_str(input, "input") }
        .and_then(|input| runtime().matches(&pattern.inner, input));

    match result {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(e) => {
            set_error(&e);
            -1
        }
    }
}

/// Free a pattern.
#[no_mangle]
pub extern "C" fn regex_bridge_pattern_free(pattern: *mut RBPattern) {
    if !pattern.is_null() {
        unsafe {
            drop(Box::from_raw(pattern));
        }
    }
}
