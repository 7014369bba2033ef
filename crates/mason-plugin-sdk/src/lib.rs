//! Plugin-side runtime for the Mason plugin protocol.
//!
//! A Mason plugin is a standalone executable that reads JSONL requests from
//! stdin and writes one JSONL response per request to stdout. This crate
//! removes the protocol boilerplate: a [`Plugin`] holds the method-to-handler
//! mapping and the plugin's metadata, the [`transport`] loop drives it over
//! standard I/O, and the [`hooks`] adapters turn fixed-shape build hooks
//! into generic handlers.
//!
//! # Example
//!
//! ```
//! use mason_plugin_protocol::PluginInfo;
//! use mason_plugin_sdk::hooks::{HookResult, pre_hook};
//! use mason_plugin_sdk::Plugin;
//!
//! let info = PluginInfo::new("demo", "1.0.0");
//! let plugin = Plugin::with_hooks(
//!     info,
//!     vec![pre_hook(|target, _workspace| {
//!         Ok(HookResult::ok(vec![format!("preparing {}", target.name())]))
//!     })],
//! );
//! assert!(plugin.info().has_capability("build.pre_hook"));
//! // plugin.run() would now serve requests over stdin/stdout.
//! ```
//!
//! Registration must complete before the transport loop starts consuming
//! input; the handler map is immutable for the rest of the process life.

pub mod error;
pub mod hooks;
pub mod runtime;
pub mod transport;

pub use self::error::{HandlerError, ServeError};
pub use self::hooks::{HookRegistration, HookResult};
pub use self::runtime::{Handler, Plugin};
pub use self::transport::serve;
