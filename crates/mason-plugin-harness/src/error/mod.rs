//! Harness-level failure taxonomy.
//!
//! These are not protocol errors: they describe an exchange the harness
//! could not complete or an expectation the plugin's answer failed to
//! meet. All variants carry structured context for diagnosis.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use mason_plugin_protocol::CodecError;

/// Errors raised by the plugin test harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The plugin executable could not be spawned.
    #[error("failed to spawn plugin '{}': {source}", executable.display())]
    Spawn {
        /// Executable path that was invoked.
        executable: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The request could not be encoded as a protocol line.
    #[error("failed to encode request: {source}")]
    Encode {
        /// Underlying codec error.
        #[source]
        source: CodecError,
    },

    /// An I/O error occurred while talking to the plugin process.
    #[error("I/O error communicating with plugin: {source}")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The plugin produced no response line within the timeout.
    #[error("plugin timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// The plugin exited with a non-zero status.
    #[error("plugin exited with non-zero status {status}; stderr: {stderr}")]
    NonZeroExit {
        /// Process exit status.
        status: i32,
        /// Captured standard-error text.
        stderr: String,
    },

    /// The plugin's output line was missing or not a valid response.
    #[error("plugin wrote an invalid response: {message}; raw output: {raw:?}")]
    InvalidResponse {
        /// The raw output that failed to parse.
        raw: String,
        /// Parse failure detail.
        message: String,
    },

    /// The plugin answered with an in-protocol error object.
    #[error("plugin returned error {code}: {message}")]
    Rpc {
        /// Protocol error code.
        code: i64,
        /// Protocol error message.
        message: String,
    },

    /// An assertion helper found a mismatch.
    #[error("assertion failed: {message}")]
    Assertion {
        /// Description of the mismatch.
        message: String,
    },

    /// Writing the generated mock plugin failed.
    #[error("failed to write mock plugin to '{}': {source}", path.display())]
    MockWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl HarnessError {
    /// Creates an assertion failure with the given description.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }
}
