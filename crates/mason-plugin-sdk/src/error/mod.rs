//! Error types for handlers and the transport loop.
//!
//! The protocol distinguishes three failure layers on the plugin side.
//! Domain errors are raised deliberately by a handler and travel to the
//! caller verbatim. Generic handler faults become the reserved `-32603`
//! internal error. Transport faults ([`ServeError`]) are not protocol
//! errors at all: they mean the process can no longer speak the protocol
//! and terminate the serve loop.

use serde_json::Value;
use thiserror::Error;

use mason_plugin_protocol::{CodecError, RpcError};

/// An error signalled by a method handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A deliberate, application-specific error. Its code, message, and
    /// data are propagated verbatim into the response error object.
    #[error("{message}")]
    Domain {
        /// Application-specific error code.
        code: i64,
        /// Human-readable message.
        message: String,
        /// Optional structured payload.
        data: Option<Value>,
    },

    /// Any other handler fault. Becomes the reserved `-32603` response.
    #[error("{message}")]
    Failed {
        /// Description of the fault.
        message: String,
    },
}

impl HandlerError {
    /// Creates a domain error with the given code and message.
    #[must_use]
    pub fn domain(code: i64, message: impl Into<String>) -> Self {
        Self::Domain {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a domain error carrying a structured data payload.
    #[must_use]
    pub fn domain_with_data(code: i64, message: impl Into<String>, data: Value) -> Self {
        Self::Domain {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Creates a generic handler fault.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Converts the handler error into the response error object.
    #[must_use]
    pub fn into_rpc_error(self) -> RpcError {
        match self {
            Self::Domain {
                code,
                message,
                data,
            } => {
                let mut error = RpcError::new(code, message);
                if let Some(payload) = data {
                    error = error.with_data(payload);
                }
                error
            }
            Self::Failed { message } => RpcError::internal(message),
        }
    }
}

impl From<RpcError> for HandlerError {
    fn from(error: RpcError) -> Self {
        let (code, message, data) = error.into_parts();
        Self::Domain {
            code,
            message,
            data,
        }
    }
}

/// Faults that terminate the transport loop.
///
/// Protocol-level problems (unparseable lines, unknown methods, handler
/// faults) never produce a `ServeError`; they become well-formed error
/// responses and the loop continues.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Reading a line from the input stream failed.
    #[error("failed to read request line: {source}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialising a response failed.
    #[error("failed to serialise response: {source}")]
    Serialise {
        /// Underlying codec error.
        #[source]
        source: CodecError,
    },

    /// Writing or flushing a response line failed.
    #[error("failed to write response line: {source}")]
    Write {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
