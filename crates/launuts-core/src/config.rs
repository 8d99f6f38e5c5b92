//! Configuration for graph assembly and output.
//!
//! Load order: `<input>/launuts.toml` → environment variables → defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const CONFIG_FILE: &str = "launuts.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LauNutsConfig {
    pub graph: GraphOptions,
    pub build: BuildConfig,
    pub geometry: GeometryConfig,
    pub output: OutputConfig,
}

/// Optional statements emitted for every node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Assert `a skos:Concept` on every node.
    pub emit_type_assertion: bool,
    /// Assert `skos:narrower` from parent to child alongside `skos:broader`.
    pub emit_inverse_hierarchy_edge: bool,
}

/// Phase ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Attach geometry after LAU nodes exist, so LAU cross-references resolve.
    /// When false, geometry is attached right after the NUTS hierarchy.
    pub geometry_after_lau: bool,
}

/// What to do when a node that already has a geometry gets another one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateGeometry {
    /// Last write wins.
    #[default]
    Replace,
    /// First write wins.
    KeepFirst,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub on_duplicate: DuplicateGeometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name written inside the output directory.
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: crate::storage::DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
/// Boolean fields accept only `true` and `false`; other values are ignored
/// with a warning.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var) {
        apply_override(var, &v, target);
    }
}

fn apply_override<T: std::str::FromStr>(var: &str, value: &str, target: &mut T) -> bool {
    match value.parse() {
        Ok(n) => {
            *target = n;
            true
        }
        Err(_) => {
            tracing::warn!("ignoring {}={:?}: not a valid value", var, value);
            false
        }
    }
}

impl LauNutsConfig {
    /// Load config from `launuts.toml` in `dir`, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid config in {}", config_path.display()))?
        } else {
            Self::default()
        };

        env_override(
            "LAUNUTS_EMIT_TYPE",
            &mut config.graph.emit_type_assertion,
        );
        env_override(
            "LAUNUTS_EMIT_NARROWER",
            &mut config.graph.emit_inverse_hierarchy_edge,
        );
        env_override(
            "LAUNUTS_GEOMETRY_AFTER_LAU",
            &mut config.build.geometry_after_lau,
        );
        env_override("LAUNUTS_OUTPUT_FILE", &mut config.output.file_name);

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that cannot produce a single file in the output directory.
    pub fn validate(&self) -> Result<()> {
        let name = self.output.file_name.as_str();
        if name.trim().is_empty() {
            anyhow::bail!("output.file_name must not be empty");
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            anyhow::bail!("output.file_name must be a plain file name, got {name:?}");
        }
        Ok(())
    }
}
