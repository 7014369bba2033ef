//! Unit tests for the hook adapters.

use serde_json::{Map, Value, json};

use mason_plugin_protocol::method;

use super::*;

fn params_from(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected JSON object, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// HookResult
// ---------------------------------------------------------------------------

#[test]
fn hook_result_serialises_flattened_extras() {
    let result = HookResult::ok(vec![String::from("done")]).with_extra("cached", json!(true));
    let value = serde_json::to_value(&result).expect("serialise");
    assert_eq!(value.get("success"), Some(&json!(true)));
    assert_eq!(value.get("logs"), Some(&json!(["done"])));
    assert_eq!(value.get("cached"), Some(&json!(true)));
}

#[test]
fn failed_result_reports_failure() {
    let result = HookResult::failed(vec![String::from("missing toolchain")]);
    assert!(!result.is_success());
    assert_eq!(result.logs(), ["missing toolchain"]);
}

// ---------------------------------------------------------------------------
// pre_hook adapter
// ---------------------------------------------------------------------------

#[test]
fn pre_hook_registers_under_the_protocol_method() {
    let registration = pre_hook(|_target, _workspace| Ok(HookResult::ok(vec![])));
    assert_eq!(registration.method_name(), method::PRE_HOOK);
}

#[test]
fn pre_hook_extracts_target_and_workspace() {
    let registration = pre_hook(|target, workspace| {
        Ok(HookResult::ok(vec![
            format!("target {}", target.name()),
            format!("root {}", workspace.root()),
        ]))
    });
    let (_, handler) = registration.into_parts();

    let params = params_from(json!({
        "target": {"name": "//app:main", "type": "executable", "language": "python"},
        "workspace": {"root": "/srv/build"},
    }));
    let result = handler(&params).expect("handler result");
    assert_eq!(
        result.get("logs"),
        Some(&json!(["target //app:main", "root /srv/build"]))
    );
}

#[test]
fn pre_hook_defaults_absent_parameters() {
    let registration = pre_hook(|target, workspace| {
        assert!(target.name().is_empty());
        assert_eq!(workspace.root(), ".");
        assert_eq!(workspace.cache_dir(), ".mason-cache");
        Ok(HookResult::ok(vec![]))
    });
    let (_, handler) = registration.into_parts();
    let result = handler(&Map::new()).expect("handler result");
    assert_eq!(result.get("success"), Some(&json!(true)));
}

#[test]
fn pre_hook_rejects_malformed_target() {
    let registration = pre_hook(|_target, _workspace| Ok(HookResult::ok(vec![])));
    let (_, handler) = registration.into_parts();
    let params = params_from(json!({"target": "not an object"}));
    let error = handler(&params).expect_err("should fail");
    assert!(matches!(error, HandlerError::Failed { .. }));
}

// ---------------------------------------------------------------------------
// post_hook adapter
// ---------------------------------------------------------------------------

#[test]
fn post_hook_extracts_outputs_success_and_duration() {
    let registration = post_hook(|_target, _workspace, outputs, succeeded, duration_ms| {
        assert_eq!(outputs, ["bin/app", "bin/helper"]);
        assert!(succeeded);
        assert_eq!(duration_ms, 2500);
        Ok(HookResult::ok(vec![format!("build took {duration_ms}ms")]))
    });
    let (method_name, handler) = registration.into_parts();
    assert_eq!(method_name, method::POST_HOOK);

    let params = params_from(json!({
        "outputs": ["bin/app", "bin/helper"],
        "success": true,
        "duration_ms": 2500,
    }));
    let result = handler(&params).expect("handler result");
    assert_eq!(result.get("logs"), Some(&json!(["build took 2500ms"])));
}

#[test]
fn post_hook_defaults_absent_parameters() {
    let registration = post_hook(|_target, _workspace, outputs, succeeded, duration_ms| {
        assert!(outputs.is_empty());
        assert!(!succeeded);
        assert_eq!(duration_ms, 0);
        Ok(HookResult::ok(vec![]))
    });
    let (_, handler) = registration.into_parts();
    let result = handler(&Map::new());
    assert!(result.is_ok());
}

// ---------------------------------------------------------------------------
// artifact_processor adapter
// ---------------------------------------------------------------------------

#[test]
fn artifact_processor_extracts_artifacts_and_config() {
    let registration = artifact_processor(|artifacts, config| {
        Ok(json!({
            "processed": artifacts.len(),
            "strip": config.get("strip").cloned().unwrap_or(Value::Bool(false)),
        }))
    });
    let (method_name, handler) = registration.into_parts();
    assert_eq!(method_name, method::ARTIFACT_PROCESS);

    let params = params_from(json!({
        "artifacts": [{"path": "bin/app"}, {"path": "lib/libcore.a"}],
        "config": {"strip": true},
    }));
    let result = handler(&params).expect("handler result");
    assert_eq!(result, json!({"processed": 2, "strip": true}));
}

#[test]
fn artifact_processor_defaults_to_empty_inputs() {
    let registration = artifact_processor(|artifacts, config| {
        assert!(artifacts.is_empty());
        assert!(config.is_empty());
        Ok(Value::Null)
    });
    let (_, handler) = registration.into_parts();
    assert!(handler(&Map::new()).is_ok());
}

// ---------------------------------------------------------------------------
// Domain errors pass through the adapter
// ---------------------------------------------------------------------------

#[test]
fn adapter_propagates_domain_errors() {
    let registration = pre_hook(|_target, _workspace| {
        Err(HandlerError::domain(-32070, "workspace not prepared"))
    });
    let (_, handler) = registration.into_parts();
    let error = handler(&Map::new()).expect_err("should fail");
    assert!(matches!(error, HandlerError::Domain { code: -32070, .. }));
}
