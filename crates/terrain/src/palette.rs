use serde::{Deserialize, Serialize};

/// Height-based vertex coloring for generated terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightPalette {
    /// `[s, s, 1]`: pale crests over deep blue troughs.
    #[default]
    Ocean,
    /// `[s, 0.2, 0.2]`: dark red to bright red.
    Ember,
}

impl HeightPalette {
    /// Color for a vertex at height `y`, where `s = y / height + 0.5`.
    pub fn shade(self, y: f32, height: f64) -> [f32; 3] {
        let s = if height == 0.0 {
            0.5
        } else {
            (y as f64 / height + 0.5) as f32
        };
        match self {
            HeightPalette::Ocean => [s, s, 1.0],
            HeightPalette::Ember => [s, 0.2, 0.2],
        }
    }
}
