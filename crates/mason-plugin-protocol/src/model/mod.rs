//! Shared data model for plugin metadata and build context.
//!
//! [`Target`] and [`Workspace`] travel inside request parameter maps as
//! nested objects. Their `config` maps are opaque pass-through data: the
//! protocol never inspects the contents. Every field is serde-defaulted so
//! a partial or absent sub-object decodes to neutral values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::message::method;

/// Plugin metadata returned by the `plugin.info` method.
///
/// Capabilities are derived, not hand-authored: registering a handler whose
/// method name starts with `build.` appends that name exactly once. The
/// list preserves insertion order but compares as a set for protocol
/// purposes.
///
/// # Example
///
/// ```
/// use mason_plugin_protocol::PluginInfo;
///
/// let mut info = PluginInfo::new("demo", "1.0.0");
/// info.add_capability("build.pre_hook");
/// info.add_capability("build.pre_hook");
/// assert_eq!(info.capabilities(), ["build.pre_hook"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginInfo {
    name: String,
    version: String,
    #[serde(default = "default_author")]
    author: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    homepage: String,
    #[serde(default = "default_license")]
    license: String,
    #[serde(rename = "minMasonVersion", default = "default_version")]
    min_mason_version: String,
    #[serde(default)]
    capabilities: Vec<String>,
}

fn default_author() -> String {
    String::from("Unknown")
}

fn default_license() -> String {
    String::from("MIT")
}

fn default_version() -> String {
    String::from("1.0.0")
}

impl PluginInfo {
    /// Creates metadata with the given name and version and default
    /// remaining fields.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            author: default_author(),
            description: String::new(),
            homepage: String::new(),
            license: default_license(),
            min_mason_version: default_version(),
            capabilities: Vec::new(),
        }
    }

    /// Sets the author field.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the description field.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the homepage field.
    #[must_use]
    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = homepage.into();
        self
    }

    /// Sets the license field.
    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    /// Sets the minimum compatible orchestrator version.
    #[must_use]
    pub fn with_min_mason_version(mut self, version: impl Into<String>) -> Self {
        self.min_mason_version = version.into();
        self
    }

    /// Appends a capability, ignoring duplicates.
    pub fn add_capability(&mut self, capability: impl Into<String>) {
        let name = capability.into();
        if !self.capabilities.contains(&name) {
            self.capabilities.push(name);
        }
    }

    /// Returns whether the plugin declares the given capability.
    #[must_use]
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// Returns the plugin name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the plugin version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> &str {
        self.author.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the homepage.
    #[must_use]
    pub const fn homepage(&self) -> &str {
        self.homepage.as_str()
    }

    /// Returns the license identifier.
    #[must_use]
    pub const fn license(&self) -> &str {
        self.license.as_str()
    }

    /// Returns the minimum compatible orchestrator version.
    #[must_use]
    pub const fn min_mason_version(&self) -> &str {
        self.min_mason_version.as_str()
    }

    /// Returns the declared capabilities in insertion order.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }
}

/// One build unit as presented to hook handlers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Target {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    deps: Vec<String>,
    #[serde(default)]
    config: Map<String, Value>,
}

impl Target {
    /// Creates a target with the given identity and no sources, deps, or
    /// configuration.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            language: language.into(),
            sources: Vec::new(),
            deps: Vec::new(),
            config: Map::new(),
        }
    }

    /// Sets the ordered source paths.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    /// Sets the ordered dependency identifiers.
    #[must_use]
    pub fn with_deps(mut self, deps: Vec<String>) -> Self {
        self.deps = deps;
        self
    }

    /// Sets the opaque configuration map.
    #[must_use]
    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = config;
        self
    }

    /// Returns the target name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the target type tag.
    #[must_use]
    pub const fn kind(&self) -> &str {
        self.kind.as_str()
    }

    /// Returns the source language tag.
    #[must_use]
    pub const fn language(&self) -> &str {
        self.language.as_str()
    }

    /// Returns the ordered source paths.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the ordered dependency identifiers.
    #[must_use]
    pub fn deps(&self) -> &[String] {
        &self.deps
    }

    /// Returns the opaque configuration map.
    #[must_use]
    pub const fn config(&self) -> &Map<String, Value> {
        &self.config
    }
}

/// The workspace a build runs in, as presented to hook handlers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workspace {
    #[serde(default = "default_root")]
    root: String,
    #[serde(default = "default_cache_dir")]
    cache_dir: String,
    #[serde(default = "default_version")]
    mason_version: String,
    #[serde(default)]
    config: Map<String, Value>,
}

fn default_root() -> String {
    String::from(".")
}

fn default_cache_dir() -> String {
    String::from(".mason-cache")
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            root: default_root(),
            cache_dir: default_cache_dir(),
            mason_version: default_version(),
            config: Map::new(),
        }
    }
}

impl Workspace {
    /// Creates a workspace rooted at the given directory with default cache
    /// directory and orchestrator version.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Sets the cache directory path.
    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl Into<String>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// Sets the orchestrator version string.
    #[must_use]
    pub fn with_mason_version(mut self, version: impl Into<String>) -> Self {
        self.mason_version = version.into();
        self
    }

    /// Sets the opaque configuration map.
    #[must_use]
    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = config;
        self
    }

    /// Returns the workspace root directory.
    #[must_use]
    pub const fn root(&self) -> &str {
        self.root.as_str()
    }

    /// Returns the cache directory path.
    #[must_use]
    pub const fn cache_dir(&self) -> &str {
        self.cache_dir.as_str()
    }

    /// Returns the orchestrator version string.
    #[must_use]
    pub const fn mason_version(&self) -> &str {
        self.mason_version.as_str()
    }

    /// Returns the opaque configuration map.
    #[must_use]
    pub const fn config(&self) -> &Map<String, Value> {
        &self.config
    }
}

/// Returns whether a method name is surfaced as a capability.
#[must_use]
pub fn is_capability_method(method_name: &str) -> bool {
    method_name.starts_with(method::CAPABILITY_PREFIX)
}
