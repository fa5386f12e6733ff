//! Resolving plugin references into loaded plugins.
//!
//! Plugins are referenced by name, optionally with options:
//!
//! ```toml
//! plugins = ["non-breaking-space", { name = "split", options = { mode = "worksheet" } }]
//! ```
//!
//! The name is looked up through a [`PluginResolver`] (usually a
//! [`PluginRegistry`]); the factory found there receives the merged options
//! and shared [`PluginMeta`]. Nothing that goes wrong while loading one plugin
//! stops the others from loading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{error::PluginError, logger::SharedLogger};

use super::{LoadedPlugin, Plugin, builtin};

/// Builds a plugin from its options and the shared metadata.
pub type PluginFactory =
    Box<dyn Fn(&PluginOptions, &PluginMeta) -> Result<Box<dyn Plugin>, PluginError> + Send + Sync>;

/// A plugin entry from the configuration: a bare name, or a name with options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PluginRef {
    Name(String),
    WithOptions {
        name: String,
        #[serde(default)]
        options: Map<String, Value>,
    },
}

impl PluginRef {
    pub fn name(&self) -> &str {
        match self {
            PluginRef::Name(name) => name,
            PluginRef::WithOptions { name, .. } => name,
        }
    }

    /// Plugin-specific options; empty for bare names.
    pub fn options(&self) -> Map<String, Value> {
        match self {
            PluginRef::Name(_) => Map::new(),
            PluginRef::WithOptions { options, .. } => options.clone(),
        }
    }
}

impl From<&str> for PluginRef {
    fn from(name: &str) -> Self {
        PluginRef::Name(name.to_string())
    }
}

/// Options handed to a plugin factory.
#[derive(Clone)]
pub struct PluginOptions {
    /// General options overlaid with the plugin's own options.
    pub values: Map<String, Value>,
    pub logger: SharedLogger,
}

impl PluginOptions {
    pub fn new(values: Map<String, Value>, logger: SharedLogger) -> Self {
        Self { values, logger }
    }

    /// Deserializes the option values into a plugin's own option struct.
    ///
    /// Failures become [`PluginError::Config`] for `plugin`.
    pub fn parse<T: DeserializeOwned>(&self, plugin: &str) -> Result<T, PluginError> {
        serde_json::from_value(Value::Object(self.values.clone()))
            .map_err(|e| PluginError::config(plugin, e.to_string()))
    }
}

/// Metadata shared by every plugin factory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginMeta {
    /// The languages the current job writes.
    pub languages: Vec<String>,
}

/// Finds the factory for a plugin name.
pub trait PluginResolver {
    fn resolve(&self, name: &str) -> Option<&PluginFactory>;
}

/// Factories registered by name.
#[derive(Default)]
pub struct PluginRegistry {
    factories: BTreeMap<String, PluginFactory>,
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the plugins shipped with this crate.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Registers `factory` under `name`, replacing any previous factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&PluginOptions, &PluginMeta) -> Result<Box<dyn Plugin>, PluginError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl PluginResolver for PluginRegistry {
    fn resolve(&self, name: &str) -> Option<&PluginFactory> {
        self.factories.get(name)
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

/// Loads plugin references in order, skipping the ones that cannot be built.
pub struct PluginLoader<'a, R: PluginResolver> {
    resolver: &'a R,
    logger: SharedLogger,
}

impl<'a, R: PluginResolver> PluginLoader<'a, R> {
    pub fn new(resolver: &'a R, logger: SharedLogger) -> Self {
        Self { resolver, logger }
    }

    /// Builds every plugin in `refs`. `general` options are merged under each
    /// plugin's own options (plugin-specific keys win).
    pub fn load(
        &self,
        refs: &[PluginRef],
        general: &Map<String, Value>,
        meta: &PluginMeta,
    ) -> Vec<LoadedPlugin> {
        refs.iter()
            .filter_map(|plugin_ref| match self.load_one(plugin_ref, general, meta) {
                Ok(plugin) => {
                    self.logger
                        .log(&format!("Loaded plugin `{}`", plugin_ref.name()));
                    Some(LoadedPlugin::new(plugin_ref.name(), plugin))
                }
                Err(PluginError::NotInstalled(name)) => {
                    self.logger.warn(&format!(
                        "Plugin `{}` is not installed, skipping it",
                        name
                    ));
                    None
                }
                Err(e @ PluginError::Config { .. }) => {
                    self.logger.warn(&format!("{}, skipping it", e));
                    None
                }
                Err(e) => {
                    self.logger.warn(&format!(
                        "Plugin `{}` failed to load, skipping it: {}",
                        plugin_ref.name(),
                        e
                    ));
                    None
                }
            })
            .collect()
    }

    fn load_one(
        &self,
        plugin_ref: &PluginRef,
        general: &Map<String, Value>,
        meta: &PluginMeta,
    ) -> Result<Box<dyn Plugin>, PluginError> {
        let factory = self
            .resolver
            .resolve(plugin_ref.name())
            .ok_or_else(|| PluginError::NotInstalled(plugin_ref.name().to_string()))?;

        let mut values = general.clone();
        values.extend(plugin_ref.options());
        let options = PluginOptions::new(values, self.logger.clone());

        factory(&options, meta)
    }
}
