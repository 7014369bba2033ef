//! Unit tests for handler and transport error types.

use serde_json::json;

use mason_plugin_protocol::{INTERNAL_ERROR, RpcError};

use super::*;

#[test]
fn domain_error_converts_verbatim() {
    let error = HandlerError::domain_with_data(-32050, "lint failed", json!({"file": "a.py"}));
    let rpc = error.into_rpc_error();
    assert_eq!(rpc.code(), -32050);
    assert_eq!(rpc.message(), "lint failed");
    assert_eq!(rpc.data(), Some(&json!({"file": "a.py"})));
}

#[test]
fn domain_error_without_data_has_no_payload() {
    let rpc = HandlerError::domain(-1, "nope").into_rpc_error();
    assert_eq!(rpc.code(), -1);
    assert!(rpc.data().is_none());
}

#[test]
fn generic_fault_becomes_internal_error() {
    let rpc = HandlerError::failed("disk on fire").into_rpc_error();
    assert_eq!(rpc.code(), INTERNAL_ERROR);
    assert_eq!(rpc.message(), "Internal error: disk on fire");
}

#[test]
fn rpc_error_converts_into_domain_error() {
    let source = RpcError::new(-32060, "quota exceeded").with_data(json!(3));
    let handler_error = HandlerError::from(source);
    assert!(matches!(
        handler_error,
        HandlerError::Domain { code: -32060, .. }
    ));
    let rpc = handler_error.into_rpc_error();
    assert_eq!(rpc.message(), "quota exceeded");
    assert_eq!(rpc.data(), Some(&json!(3)));
}

#[test]
fn serve_error_messages_name_the_failed_stage() {
    let read = ServeError::Read {
        source: std::io::Error::other("closed"),
    };
    assert!(read.to_string().contains("read request line"));

    let write = ServeError::Write {
        source: std::io::Error::other("pipe"),
    };
    assert!(write.to_string().contains("write response line"));
}
