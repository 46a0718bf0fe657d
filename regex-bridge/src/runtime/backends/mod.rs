//! Regex backend implementations
//!
//! - `MockBackend`: For testing, records calls and matches with the `regex` crate
//! - `JvmBackend`: `java.util.regex` inside an embedded JVM (`jvm` feature)

mod mock;

pub use mock::{MockBackend, MockPattern, RecordedCall};

#[cfg(feature = "jvm")]
mod jvm;

#[cfg(feature = "jvm")]
pub use jvm::{JavaPattern, JvmBackend};
