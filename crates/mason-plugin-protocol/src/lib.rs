//! Wire protocol types for Mason plugins.
//!
//! Mason extends itself with out-of-process plugins that speak a minimal
//! JSON-RPC 2.0 subset over standard I/O. Each exchange is a single JSONL
//! line: the orchestrator writes one [`Request`] to the plugin's stdin and
//! the plugin writes exactly one [`Response`] to stdout, flushed
//! immediately. There is no batching and no out-of-order delivery.
//!
//! This crate is the leaf of the plugin stack: it defines the message
//! shapes, the shared data model ([`PluginInfo`], [`Target`],
//! [`Workspace`]), the reserved error codes, and the line codec. It
//! performs no I/O of its own; the plugin-side transport loop lives in
//! `mason-plugin-sdk` and the orchestrator-side driver in
//! `mason-plugin-harness`.

pub mod message;
pub mod model;

pub use self::message::{
    CodecError, INTERNAL_ERROR, JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR, Request, Response,
    RpcError, decode_line, encode_line, method,
};
pub use self::model::{PluginInfo, Target, Workspace, is_capability_method};
