//! Unit tests for the tester's bookkeeping and assertion helpers.
//!
//! Subprocess behaviour is covered by the integration tests that drive the
//! generated mock plugin and the demo plugin binary.

use serde_json::json;

use super::*;

// ---------------------------------------------------------------------------
// Identifier counter
// ---------------------------------------------------------------------------

#[test]
fn identifier_starts_at_one() {
    let tester = PluginTester::new("/nonexistent/plugin");
    assert_eq!(tester.next_request_id(), 1);
}

#[test]
fn identifier_increments_even_when_the_call_fails() {
    let mut tester = PluginTester::new("/nonexistent/plugin");
    let first = tester.send_request("plugin.info", None);
    assert!(matches!(first, Err(HarnessError::Spawn { .. })));
    let second = tester.send_request("plugin.info", None);
    assert!(matches!(second, Err(HarnessError::Spawn { .. })));
    assert_eq!(tester.next_request_id(), 3);
}

// ---------------------------------------------------------------------------
// PostHookCall defaults
// ---------------------------------------------------------------------------

#[test]
fn post_hook_call_defaults_match_fixtures() {
    let params = fixtures::post_hook_params(
        &fixtures::test_target(),
        &fixtures::test_workspace(),
        &fixtures::test_outputs(),
        true,
        1000,
    )
    .expect("params");
    assert_eq!(params.get("outputs"), Some(&json!(["bin/app"])));
    assert_eq!(params.get("success"), Some(&json!(true)));
    assert_eq!(params.get("duration_ms"), Some(&json!(1000)));
}

#[test]
fn post_hook_call_builder_overrides() {
    let call = PostHookCall::new()
        .with_outputs(vec![String::from("bin/tool")])
        .with_success(false)
        .with_duration_ms(42);
    assert_eq!(call.outputs, ["bin/tool"]);
    assert!(!call.success);
    assert_eq!(call.duration_ms, 42);
}

// ---------------------------------------------------------------------------
// Assertion helpers
// ---------------------------------------------------------------------------

#[test]
fn hook_success_accepts_true_flag() {
    let result = json!({"success": true, "logs": []});
    assert!(assert_hook_success(&result).is_ok());
}

#[test]
fn hook_success_rejects_false_or_missing_flag() {
    let failed = json!({"success": false, "logs": ["broke"]});
    let error = assert_hook_success(&failed).expect_err("should fail");
    assert!(error.to_string().contains("broke"));

    let missing = json!({"logs": []});
    assert!(assert_hook_success(&missing).is_err());
}

#[test]
fn logs_contain_matches_across_lines() {
    let result = json!({"success": true, "logs": ["build took 2500ms", "all artifacts staged"]});
    assert!(assert_hook_logs_contain(&result, &["2500", "staged"]).is_ok());
}

#[test]
fn logs_contain_names_the_missing_pattern() {
    let result = json!({"success": true, "logs": ["nothing interesting"]});
    let error = assert_hook_logs_contain(&result, &["2500"]).expect_err("should fail");
    assert!(error.to_string().contains("'2500'"));
}

#[test]
fn logs_contain_handles_missing_logs_field() {
    let result = json!({"success": true});
    assert!(assert_hook_logs_contain(&result, &["anything"]).is_err());
}
