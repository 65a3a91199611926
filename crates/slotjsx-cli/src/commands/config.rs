//! Configuration file (slotjsx.toml).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use slotjsx::{ComponentRegistry, DefaultMerge, MergeProps, PropMap, ShallowMerge};

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub merge: MergeConfig,

    /// Component name -> intrinsic tag it renders as
    #[serde(default)]
    pub components: BTreeMap<String, String>,

    #[serde(default)]
    pub check: CheckConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct MergeConfig {
    #[serde(default)]
    pub strategy: MergeStrategy,
}

/// Prop merge strategy selectable from config.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// className/style/handler aware merge
    #[default]
    Default,
    /// Host props replace outer props
    Shallow,
}

impl MergeProps for MergeStrategy {
    fn merge_props(&self, outer: PropMap, host: PropMap) -> PropMap {
        match self {
            Self::Default => DefaultMerge.merge_props(outer, host),
            Self::Shallow => ShallowMerge.merge_props(outer, host),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckConfig {
    /// File extensions scanned by `check`
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["jsx".to_string(), "slot".to_string()]
}

impl ConfigFile {
    /// Build a component registry from the `[components]` table.
    pub fn registry(&self) -> Result<ComponentRegistry> {
        let mut registry = ComponentRegistry::new();
        for (name, tag) in &self.components {
            registry
                .register_alias(name, tag)
                .with_context(|| format!("Invalid [components] entry `{name}`"))?;
        }
        Ok(registry)
    }
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}
