//! Default test fixtures for hook parameters.
//!
//! Tests that do not care about the precise build context can use these
//! canned values; the builders on [`Target`] and [`Workspace`] cover
//! everything else.

use serde_json::{Map, Value, json};

use mason_plugin_protocol::{Target, Workspace};

/// A minimal executable target used when a test supplies none.
#[must_use]
pub fn test_target() -> Target {
    Target::new("//test:target", "executable", "python")
        .with_sources(vec![String::from("src/main.py")])
}

/// A scratch workspace used when a test supplies none.
#[must_use]
pub fn test_workspace() -> Workspace {
    Workspace::new("/tmp/test-workspace")
}

/// Default output artifact paths for post-hook calls.
#[must_use]
pub fn test_outputs() -> Vec<String> {
    vec![String::from("bin/app")]
}

/// Default artifact descriptors for `artifact.process` calls.
#[must_use]
pub fn test_artifacts() -> Vec<Value> {
    vec![
        json!({"path": "bin/app", "type": "executable"}),
        json!({"path": "lib/libcore.a", "type": "static_library"}),
    ]
}

/// Builds the parameter map for a pre-hook call.
///
/// # Errors
///
/// Returns [`HarnessError::Encode`](crate::HarnessError::Encode) if a
/// fixture cannot be serialised.
pub fn pre_hook_params(
    target: &Target,
    workspace: &Workspace,
) -> Result<Map<String, Value>, crate::HarnessError> {
    let mut params = Map::new();
    params.insert(String::from("target"), encode(target)?);
    params.insert(String::from("workspace"), encode(workspace)?);
    Ok(params)
}

/// Builds the parameter map for a post-hook call.
///
/// # Errors
///
/// Returns [`HarnessError::Encode`](crate::HarnessError::Encode) if a
/// fixture cannot be serialised.
pub fn post_hook_params(
    target: &Target,
    workspace: &Workspace,
    outputs: &[String],
    success: bool,
    duration_ms: u64,
) -> Result<Map<String, Value>, crate::HarnessError> {
    let mut params = pre_hook_params(target, workspace)?;
    params.insert(String::from("outputs"), json!(outputs));
    params.insert(String::from("success"), Value::Bool(success));
    params.insert(String::from("duration_ms"), Value::from(duration_ms));
    Ok(params)
}

fn encode(value: &impl serde::Serialize) -> Result<Value, crate::HarnessError> {
    serde_json::to_value(value).map_err(|source| crate::HarnessError::Encode {
        source: mason_plugin_protocol::CodecError::Serialise { source },
    })
}
