//! Mock plugin generator.
//!
//! Emits a minimal, dependency-free reference plugin implementing
//! `plugin.info` and both build hooks directly, bypassing the SDK layers
//! entirely. The harness test-suite drives the generated script to
//! validate its own behaviour without depending on any real plugin. This
//! is a fixture generator, not production code; the script requires a
//! `python3` interpreter on the path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::HarnessError;

/// Description of the mock plugin to generate.
#[derive(Debug, Clone)]
pub struct MockPlugin {
    name: String,
    version: String,
    capabilities: Vec<String>,
}

impl Default for MockPlugin {
    fn default() -> Self {
        Self {
            name: String::from("mock"),
            version: String::from("1.0.0"),
            capabilities: vec![
                String::from("build.pre_hook"),
                String::from("build.post_hook"),
            ],
        }
    }
}

impl MockPlugin {
    /// Creates a mock plugin description with both build hooks declared.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Overrides the declared capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Returns the mock plugin name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the mock plugin version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Returns the declared capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Renders the mock plugin script source.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MockWrite`] if the capability list cannot
    /// be serialised into the script.
    pub fn render(&self) -> Result<String, HarnessError> {
        let capabilities =
            serde_json::to_string(&self.capabilities).map_err(|source| HarnessError::MockWrite {
                path: PathBuf::new(),
                source: Arc::new(std::io::Error::other(source)),
            })?;
        Ok(format!(
            concat!(
                "#!/usr/bin/env python3\n",
                "import json\n",
                "import sys\n",
                "\n",
                "PLUGIN_INFO = {{\n",
                "    \"name\": \"{name}\",\n",
                "    \"version\": \"{version}\",\n",
                "    \"author\": \"Mock\",\n",
                "    \"description\": \"Mock plugin for harness validation\",\n",
                "    \"homepage\": \"\",\n",
                "    \"license\": \"MIT\",\n",
                "    \"minMasonVersion\": \"1.0.0\",\n",
                "    \"capabilities\": {capabilities},\n",
                "}}\n",
                "\n",
                "def respond(request):\n",
                "    method = request.get(\"method\")\n",
                "    req_id = request.get(\"id\", 0)\n",
                "    if method == \"plugin.info\":\n",
                "        return {{\"jsonrpc\": \"2.0\", \"id\": req_id, \"result\": PLUGIN_INFO}}\n",
                "    if method == \"build.pre_hook\":\n",
                "        result = {{\"success\": True, \"logs\": [\"mock pre-hook executed\"]}}\n",
                "        return {{\"jsonrpc\": \"2.0\", \"id\": req_id, \"result\": result}}\n",
                "    if method == \"build.post_hook\":\n",
                "        duration = request.get(\"params\", {{}}).get(\"duration_ms\", 0)\n",
                "        result = {{\n",
                "            \"success\": True,\n",
                "            \"logs\": [\"mock post-hook executed\", \"build took %sms\" % duration],\n",
                "        }}\n",
                "        return {{\"jsonrpc\": \"2.0\", \"id\": req_id, \"result\": result}}\n",
                "    error = {{\"code\": -32601, \"message\": \"Method not found: %s\" % method}}\n",
                "    return {{\"jsonrpc\": \"2.0\", \"id\": req_id, \"error\": error}}\n",
                "\n",
                "for line in sys.stdin:\n",
                "    line = line.strip()\n",
                "    if not line:\n",
                "        continue\n",
                "    try:\n",
                "        request = json.loads(line)\n",
                "    except ValueError as exc:\n",
                "        error = {{\"code\": -32700, \"message\": \"Parse error: %s\" % exc}}\n",
                "        print(json.dumps({{\"jsonrpc\": \"2.0\", \"id\": 0, \"error\": error}}), flush=True)\n",
                "        continue\n",
                "    print(json.dumps(respond(request)), flush=True)\n",
            ),
            name = self.name,
            version = self.version,
            capabilities = capabilities,
        ))
    }

    /// Writes the mock plugin script to `path` and marks it executable.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MockWrite`] when the script cannot be
    /// written or its permissions cannot be set.
    pub fn write_executable(&self, path: &Path) -> Result<(), HarnessError> {
        let script = self.render()?;
        std::fs::write(path, script).map_err(|source| HarnessError::MockWrite {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        mark_executable(path)
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<(), HarnessError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|source| {
        HarnessError::MockWrite {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    })
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<(), HarnessError> {
    Ok(())
}

#[cfg(test)]
mod tests;
