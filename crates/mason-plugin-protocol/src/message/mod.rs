//! JSON-RPC message types and the single-line codec.
//!
//! The protocol is a newline-delimited JSON-RPC 2.0 subset. Every request
//! produces exactly one response with a matching identifier, and a response
//! carries a result or an error, never both. The XOR is enforced by
//! construction: [`Response`] exposes only the [`Response::success`] and
//! [`Response::failure`] constructors and keeps its fields private.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Protocol version tag carried by every request and response.
pub const JSONRPC_VERSION: &str = "2.0";

/// Reserved error code for lines that cannot be parsed.
pub const PARSE_ERROR: i64 = -32700;

/// Reserved error code for requests naming an unregistered method.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Reserved error code for handlers that raised an unexpected fault.
pub const INTERNAL_ERROR: i64 = -32603;

/// Standard method names from the protocol's method table.
pub mod method {
    /// Returns the plugin's [`PluginInfo`](crate::model::PluginInfo).
    pub const INFO: &str = "plugin.info";

    /// Invoked before a target is built.
    pub const PRE_HOOK: &str = "build.pre_hook";

    /// Invoked after a target finished building.
    pub const POST_HOOK: &str = "build.post_hook";

    /// Invoked to post-process build artifacts.
    pub const ARTIFACT_PROCESS: &str = "artifact.process";

    /// Methods under this prefix are surfaced as plugin capabilities.
    pub const CAPABILITY_PREFIX: &str = "build.";
}

/// A single protocol request, serialised as one JSONL line.
///
/// The identifier is chosen by the caller and echoed back verbatim in the
/// corresponding response. A request with no identifier decodes to `0`.
///
/// # Example
///
/// ```
/// use mason_plugin_protocol::{Request, encode_line};
///
/// let request = Request::new(1, "plugin.info");
/// let line = encode_line(&request).expect("encode");
/// assert!(line.contains("\"method\":\"plugin.info\""));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Request {
    jsonrpc: String,
    #[serde(default)]
    id: i64,
    method: String,
    #[serde(default)]
    params: Map<String, Value>,
}

impl Request {
    /// Creates a request with no parameters.
    #[must_use]
    pub fn new(id: i64, method: impl Into<String>) -> Self {
        Self {
            jsonrpc: String::from(JSONRPC_VERSION),
            id,
            method: method.into(),
            params: Map::new(),
        }
    }

    /// Creates a request carrying a parameter map.
    #[must_use]
    pub fn with_params(id: i64, method: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            jsonrpc: String::from(JSONRPC_VERSION),
            id,
            method: method.into(),
            params,
        }
    }

    /// Returns the caller-chosen identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the method name.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Returns the open parameter map.
    #[must_use]
    pub const fn params(&self) -> &Map<String, Value> {
        &self.params
    }
}

/// A single protocol response, serialised as one JSONL line.
///
/// Carries a result payload or an [`RpcError`], never both and never
/// neither. The absent side is omitted from the serialised form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    jsonrpc: String,
    id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

impl Response {
    /// Creates a success response carrying a result payload.
    #[must_use]
    pub fn success(id: i64, result: Value) -> Self {
        Self {
            jsonrpc: String::from(JSONRPC_VERSION),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Creates an error response.
    #[must_use]
    pub fn failure(id: i64, error: RpcError) -> Self {
        Self {
            jsonrpc: String::from(JSONRPC_VERSION),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Returns the echoed request identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the result payload when the exchange succeeded.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Returns the error object when the exchange failed.
    #[must_use]
    pub const fn error(&self) -> Option<&RpcError> {
        self.error.as_ref()
    }

    /// Returns whether the response carries a result.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

/// A protocol error object: integer code, message, optional data payload.
///
/// Codes `-32700`, `-32601`, and `-32603` are reserved for the transport
/// and protocol layers; other codes are available for domain errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    code: i64,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl RpcError {
    /// Creates an error with the given code and message.
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attaches a structured data payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Creates the reserved parse-error response body.
    #[must_use]
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {detail}"))
    }

    /// Creates the reserved method-not-found response body.
    #[must_use]
    pub fn method_not_found(method_name: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {method_name}"))
    }

    /// Creates the reserved internal-error response body.
    #[must_use]
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::new(INTERNAL_ERROR, format!("Internal error: {detail}"))
    }

    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> i64 {
        self.code
    }

    /// Returns the human-readable message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the optional data payload.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Decomposes the error into its code, message, and data.
    #[must_use]
    pub fn into_parts(self) -> (i64, String, Option<Value>) {
        (self.code, self.message, self.data)
    }
}

/// Errors raised by the line codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Serialising a message to JSON failed.
    #[error("failed to serialise protocol message: {source}")]
    Serialise {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A line could not be parsed as a protocol message.
    #[error("failed to parse protocol message: {source}")]
    Parse {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The line was blank after trimming whitespace.
    #[error("blank line is not a protocol message")]
    BlankLine,
}

/// Serialises a message to a single JSONL line without the trailing newline.
///
/// # Errors
///
/// Returns [`CodecError::Serialise`] if the message cannot be encoded.
pub fn encode_line<T: Serialize>(message: &T) -> Result<String, CodecError> {
    serde_json::to_string(message).map_err(|source| CodecError::Serialise { source })
}

/// Parses one trimmed JSONL line into a protocol message.
///
/// # Errors
///
/// Returns [`CodecError::BlankLine`] for whitespace-only input and
/// [`CodecError::Parse`] for malformed JSON.
pub fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, CodecError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CodecError::BlankLine);
    }
    serde_json::from_str(trimmed).map_err(|source| CodecError::Parse { source })
}
