//! Unit tests for the demo plugin over in-memory streams.

use std::io::Cursor;

use serde_json::{Value, json};

use mason_plugin_protocol::{Request, Response};

use super::*;

fn call(method: &str, params: Value) -> Response {
    let request = match params {
        Value::Object(map) => Request::with_params(1, method, map),
        _ => Request::new(1, method),
    };
    plugin().handle_request(&request)
}

#[test]
fn info_declares_exactly_the_build_hooks() {
    let response = call("plugin.info", Value::Null);
    let result = response.result().expect("info payload");
    let mut capabilities: Vec<&str> = result
        .get("capabilities")
        .and_then(Value::as_array)
        .expect("capabilities list")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    capabilities.sort_unstable();
    assert_eq!(capabilities, ["build.post_hook", "build.pre_hook"]);
    assert_eq!(result.get("name"), Some(&json!("demo")));
}

#[test]
fn pre_hook_logs_the_target_name() {
    let response = call(
        "build.pre_hook",
        json!({"target": {"name": "//app:main"}}),
    );
    let result = response.result().expect("hook result");
    let logs = result.get("logs").expect("logs").to_string();
    assert!(logs.contains("//app:main"));
}

#[test]
fn post_hook_logs_the_duration() {
    let response = call(
        "build.post_hook",
        json!({"outputs": ["bin/app"], "success": true, "duration_ms": 2500}),
    );
    let result = response.result().expect("hook result");
    assert_eq!(result.get("success"), Some(&json!(true)));
    assert!(result.get("logs").expect("logs").to_string().contains("2500"));
    assert_eq!(result.get("observed_success"), Some(&json!(true)));
}

#[test]
fn artifact_processor_counts_artifacts() {
    let response = call(
        "artifact.process",
        json!({"artifacts": [{"path": "bin/app"}], "config": {}}),
    );
    let result = response.result().expect("result");
    assert_eq!(result.get("processed"), Some(&json!(1)));
}

#[test]
fn demo_fail_raises_its_domain_error() {
    let response = call("demo.fail", Value::Null);
    let error = response.error().expect("error object");
    assert_eq!(error.code(), DEMO_FAILURE_CODE);
    assert_eq!(error.message(), "demo failure requested");
    assert!(error.data().is_some());
}

#[test]
fn run_answers_each_line_in_order() {
    let input = concat!(
        "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"plugin.info\"}\n",
        "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"demo.fail\"}\n",
    );
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut output = Vec::new();
    run(&mut reader, &mut output).expect("run");

    let lines: Vec<String> = String::from_utf8(output)
        .expect("utf-8")
        .lines()
        .map(str::to_owned)
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.first().expect("first").contains("\"result\""));
    assert!(lines.get(1).expect("second").contains("\"error\""));
}
