//! The plugin runtime: method dispatch and metadata.
//!
//! A [`Plugin`] binds method names to handlers and converts each dispatch
//! outcome into a protocol-conformant [`Response`]. Dispatch is strictly
//! synchronous: `handle_request` runs the handler to completion, including
//! all of its side effects, before returning. There is no concurrency
//! inside the runtime.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use mason_plugin_protocol::{PluginInfo, Request, Response, RpcError, is_capability_method, method};

use crate::error::HandlerError;
use crate::error::ServeError;
use crate::hooks::HookRegistration;

/// Tracing target for runtime dispatch.
const RUNTIME_TARGET: &str = "mason_plugin_sdk::runtime";

/// A registered method handler.
///
/// Takes the request's open parameter map and returns a result payload or
/// signals a [`HandlerError`].
pub type Handler = Box<dyn Fn(&Map<String, Value>) -> Result<Value, HandlerError>>;

/// An out-of-process Mason plugin: metadata plus the method-handler map.
///
/// Both are constructed once at process start. The capability list grows
/// during registration (every `build.*` method is appended exactly once)
/// and must be complete before the transport loop starts consuming input.
pub struct Plugin {
    info: PluginInfo,
    handlers: HashMap<String, Handler>,
}

impl Plugin {
    /// Creates a plugin with the given metadata and no handlers.
    #[must_use]
    pub fn new(info: PluginInfo) -> Self {
        Self {
            info,
            handlers: HashMap::new(),
        }
    }

    /// Creates a plugin and registers a batch of hook adapters.
    ///
    /// This is the explicit registration table that replaces scanning for
    /// tagged callables: each [`HookRegistration`] pairs a method name with
    /// its adapted handler as plain data.
    #[must_use]
    pub fn with_hooks(info: PluginInfo, hooks: Vec<HookRegistration>) -> Self {
        let mut plugin = Self::new(info);
        for registration in hooks {
            let (method_name, handler) = registration.into_parts();
            plugin.register(method_name, handler);
        }
        plugin
    }

    /// Binds a method name to a handler.
    ///
    /// If the method name starts with `build.` and is not already present,
    /// it is appended to the plugin's capability list.
    pub fn register(&mut self, method_name: impl Into<String>, handler: Handler) {
        let name = method_name.into();
        if is_capability_method(&name) {
            self.info.add_capability(name.clone());
        }
        self.handlers.insert(name, handler);
    }

    /// Returns the plugin metadata.
    #[must_use]
    pub const fn info(&self) -> &PluginInfo {
        &self.info
    }

    /// Returns whether a handler is bound to the given method name.
    #[must_use]
    pub fn is_registered(&self, method_name: &str) -> bool {
        self.handlers.contains_key(method_name)
    }

    /// Dispatches one request and returns its response.
    ///
    /// `plugin.info` always succeeds with the serialised metadata, even
    /// when a handler was separately bound to that name. Unknown methods
    /// yield `-32601`; handler domain errors are propagated verbatim; any
    /// other handler fault yields `-32603`. The response always echoes the
    /// request identifier.
    #[must_use]
    pub fn handle_request(&self, request: &Request) -> Response {
        debug!(
            target: RUNTIME_TARGET,
            method = request.method(),
            id = request.id(),
            "dispatching request"
        );

        if request.method() == method::INFO {
            return self.info_response(request.id());
        }

        let Some(handler) = self.handlers.get(request.method()) else {
            return Response::failure(request.id(), RpcError::method_not_found(request.method()));
        };

        match handler(request.params()) {
            Ok(result) => Response::success(request.id(), result),
            Err(error) => Response::failure(request.id(), error.into_rpc_error()),
        }
    }

    /// Serves requests over locked stdin/stdout until end-of-stream.
    ///
    /// # Errors
    ///
    /// Returns a [`ServeError`] when standard I/O itself fails; protocol
    /// errors are answered in-band and never terminate the loop.
    pub fn run(&self) -> Result<(), ServeError> {
        crate::transport::run(self)
    }

    fn info_response(&self, id: i64) -> Response {
        match serde_json::to_value(&self.info) {
            Ok(payload) => Response::success(id, payload),
            Err(error) => Response::failure(id, RpcError::internal(error)),
        }
    }
}
