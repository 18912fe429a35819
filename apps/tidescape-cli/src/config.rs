use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tidescape_input::CameraConfig;
use tidescape_render::{ProjectionConfig, ShadingModel};
use tidescape_terrain::{HeightPalette, TerrainOptions, TerrainOptionsInput};

/// Everything the simulated scene can be tuned with. Every section is
/// optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub terrain: TerrainOptionsInput,
    pub palette: HeightPalette,
    pub shading: ShadingModel,
    /// Simulated frame length in milliseconds.
    pub tick_ms: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            terrain: TerrainOptions::demo().into(),
            palette: HeightPalette::default(),
            shading: ShadingModel::default(),
            tick_ms: 16.0,
        }
    }
}

impl SceneConfig {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(text).context("invalid scene config")
    }

    /// Read a YAML config, or fall back to defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!(path = %path.display(), "scene config loaded");
        Ok(config)
    }
}
