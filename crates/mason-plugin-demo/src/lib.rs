//! Reference Mason plugin built on the SDK.
//!
//! The demo plugin registers both build hooks and an artifact processor
//! through the hook adapters, plus two directly-registered methods that
//! exercise the error paths: `demo.fail` raises a domain error and
//! `demo.oops` raises a generic handler fault. The harness test-suite
//! drives the compiled binary through every one of these methods.

#[cfg(test)]
mod tests;

use std::io::{BufRead, Write};

use serde_json::{Value, json};

use mason_plugin_protocol::PluginInfo;
use mason_plugin_sdk::error::{HandlerError, ServeError};
use mason_plugin_sdk::hooks::{HookResult, artifact_processor, post_hook, pre_hook};
use mason_plugin_sdk::runtime::Plugin;
use mason_plugin_sdk::transport::serve;

/// Error code used by `demo.fail` to demonstrate domain errors.
pub const DEMO_FAILURE_CODE: i64 = -32050;

/// Builds the demo plugin with all handlers registered.
#[must_use]
pub fn plugin() -> Plugin {
    let info = PluginInfo::new("demo", "1.0.0")
        .with_author("Mason contributors")
        .with_description("Reference plugin exercising the Mason plugin SDK")
        .with_homepage("https://example.com/mason-plugin-demo");

    let mut plugin = Plugin::with_hooks(
        info,
        vec![
            pre_hook(|target, workspace| {
                Ok(HookResult::ok(vec![
                    format!("preparing build for {}", target.name()),
                    format!("workspace root {}", workspace.root()),
                    format!("{} source file(s)", target.sources().len()),
                ]))
            }),
            post_hook(|target, _workspace, outputs, succeeded, duration_ms| {
                let mut logs = vec![
                    format!("finished {}", target.name()),
                    format!("build took {duration_ms}ms"),
                    format!("{} output(s) produced", outputs.len()),
                ];
                if !succeeded {
                    logs.push(String::from("upstream build reported failure"));
                }
                Ok(HookResult::ok(logs).with_extra("observed_success", Value::Bool(succeeded)))
            }),
            artifact_processor(|artifacts, _config| {
                Ok(json!({
                    "success": true,
                    "processed": artifacts.len(),
                    "logs": [format!("processed {} artifact(s)", artifacts.len())],
                }))
            }),
        ],
    );

    plugin.register(
        "demo.fail",
        Box::new(|_params| {
            Err(HandlerError::domain_with_data(
                DEMO_FAILURE_CODE,
                "demo failure requested",
                json!({"hint": "this error is intentional"}),
            ))
        }),
    );

    plugin.register(
        "demo.oops",
        Box::new(|_params| Err(HandlerError::failed("deliberate fault"))),
    );

    plugin
}

/// Serves the demo plugin over the given streams until end-of-stream.
///
/// # Errors
///
/// Returns a [`ServeError`] when the streams themselves fail.
pub fn run(reader: &mut impl BufRead, writer: &mut impl Write) -> Result<(), ServeError> {
    serve(&plugin(), reader, writer)
}
