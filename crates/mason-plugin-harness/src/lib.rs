//! Black-box test harness for Mason plugins.
//!
//! The harness drives a compiled plugin executable as an external process:
//! it writes one protocol request per call to the plugin's stdin, reads
//! exactly one response line from its stdout within a timeout, and
//! interprets the outcome. It depends on nothing plugin-internal, so it
//! exercises any compliant plugin purely through the wire contract.
//!
//! Harness failures (timeout, non-zero exit, unparseable output) are a
//! separate taxonomy from in-protocol errors: both surface as
//! [`HarnessError`], carrying captured stderr, raw output, or the protocol
//! error code so the failing plugin can be diagnosed. A failed call is
//! never retried.
//!
//! The [`mock`] module generates a minimal, SDK-free reference plugin so
//! the harness itself can be validated without any real plugin.

pub mod error;
pub mod fixtures;
pub mod mock;
pub mod tester;

pub use self::error::HarnessError;
pub use self::mock::MockPlugin;
pub use self::tester::{PluginTester, PostHookCall, assert_hook_logs_contain, assert_hook_success};
