//! Hook adapters: fixed-shape build hooks over the generic handler signature.
//!
//! Handlers registered with the runtime take an untyped parameter map. The
//! adapters in this module extract the typed hook arguments (defaulting
//! absent fields to neutral values), call the wrapped function, and
//! serialise its [`HookResult`]. Each adapter returns a
//! [`HookRegistration`] pairing the handler with its protocol method name,
//! so the embedding code registers hooks from an explicit table rather
//! than tagging callables.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mason_plugin_protocol::{Target, Workspace, method};

use crate::error::HandlerError;
use crate::runtime::Handler;

/// Outcome reported by a build hook: a success flag, ordered log lines,
/// and optional extra fields flattened into the result object.
///
/// # Example
///
/// ```
/// use mason_plugin_sdk::hooks::HookResult;
/// use serde_json::Value;
///
/// let result = HookResult::ok(vec![String::from("cache warmed")])
///     .with_extra("cache_hits", Value::from(17));
/// assert!(result.is_success());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HookResult {
    success: bool,
    logs: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl HookResult {
    /// Creates a successful result with the given log lines.
    #[must_use]
    pub fn ok(logs: Vec<String>) -> Self {
        Self {
            success: true,
            logs,
            extra: Map::new(),
        }
    }

    /// Creates a failed result with the given log lines.
    #[must_use]
    pub fn failed(logs: Vec<String>) -> Self {
        Self {
            success: false,
            logs,
            extra: Map::new(),
        }
    }

    /// Attaches an extra field to the result object.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Returns the success flag.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the ordered log lines.
    #[must_use]
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Returns the extra fields.
    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A method name paired with its adapted handler.
///
/// Built by the adapter functions in this module and consumed by
/// [`Plugin::with_hooks`](crate::runtime::Plugin::with_hooks).
pub struct HookRegistration {
    method_name: &'static str,
    handler: Handler,
}

impl HookRegistration {
    /// Pairs a method name with a handler.
    #[must_use]
    pub fn new(method_name: &'static str, handler: Handler) -> Self {
        Self {
            method_name,
            handler,
        }
    }

    /// Returns the protocol method name.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        self.method_name
    }

    /// Decomposes the registration into its method name and handler.
    #[must_use]
    pub fn into_parts(self) -> (&'static str, Handler) {
        (self.method_name, self.handler)
    }
}

/// Adapts a pre-build hook, registering under `build.pre_hook`.
///
/// The hook receives the [`Target`] and [`Workspace`] extracted from the
/// request parameters; absent sub-objects decode to neutral defaults.
pub fn pre_hook<F>(hook: F) -> HookRegistration
where
    F: Fn(Target, Workspace) -> Result<HookResult, HandlerError> + 'static,
{
    HookRegistration::new(
        method::PRE_HOOK,
        Box::new(move |params| {
            let target = extract(params, "target")?;
            let workspace = extract(params, "workspace")?;
            encode_result(&hook(target, workspace)?)
        }),
    )
}

/// Adapts a post-build hook, registering under `build.post_hook`.
///
/// In addition to the target and workspace, the hook receives the output
/// artifact paths (default empty), the build's success flag (default
/// false), and the build duration in milliseconds (default 0).
pub fn post_hook<F>(hook: F) -> HookRegistration
where
    F: Fn(Target, Workspace, Vec<String>, bool, u64) -> Result<HookResult, HandlerError> + 'static,
{
    HookRegistration::new(
        method::POST_HOOK,
        Box::new(move |params| {
            let target = extract(params, "target")?;
            let workspace = extract(params, "workspace")?;
            let outputs: Vec<String> = extract(params, "outputs")?;
            let succeeded: bool = extract(params, "success")?;
            let duration_ms: u64 = extract(params, "duration_ms")?;
            encode_result(&hook(target, workspace, outputs, succeeded, duration_ms)?)
        }),
    )
}

/// Adapts an artifact processor, registering under `artifact.process`.
///
/// The hook receives the artifact list (default empty) and configuration
/// map (default empty) and returns a handler-defined result object.
pub fn artifact_processor<F>(hook: F) -> HookRegistration
where
    F: Fn(Vec<Value>, Map<String, Value>) -> Result<Value, HandlerError> + 'static,
{
    HookRegistration::new(
        method::ARTIFACT_PROCESS,
        Box::new(move |params| {
            let artifacts: Vec<Value> = extract(params, "artifacts")?;
            let config: Map<String, Value> = extract(params, "config")?;
            hook(artifacts, config)
        }),
    )
}

/// Extracts a typed parameter, defaulting when absent and failing with a
/// handler fault when present but malformed.
fn extract<T: DeserializeOwned + Default>(
    params: &Map<String, Value>,
    key: &str,
) -> Result<T, HandlerError> {
    params.get(key).map_or_else(
        || Ok(T::default()),
        |value| {
            serde_json::from_value(value.clone())
                .map_err(|error| HandlerError::failed(format!("invalid '{key}' parameter: {error}")))
        },
    )
}

fn encode_result(result: &HookResult) -> Result<Value, HandlerError> {
    serde_json::to_value(result).map_err(|error| HandlerError::failed(error.to_string()))
}

#[cfg(test)]
mod tests;
