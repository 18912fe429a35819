use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tidescape_scene::Lighting;

/// Which shader program a frame is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingModel {
    /// Cool-to-warm tone shading.
    #[default]
    Gooch,
    Phong,
    /// Gooch tones with Phong highlights.
    Mixed,
}

impl ShadingModel {
    /// Specular exponent used when a node leaves its own at zero under Phong.
    pub const DEFAULT_PHONG_POWER: f32 = 32.0;

    pub const ALL: [ShadingModel; 3] = [ShadingModel::Gooch, ShadingModel::Phong, ShadingModel::Mixed];

    /// The model the shading toggle switches to.
    pub fn next(self) -> Self {
        match self {
            ShadingModel::Gooch => ShadingModel::Phong,
            ShadingModel::Phong => ShadingModel::Mixed,
            ShadingModel::Mixed => ShadingModel::Gooch,
        }
    }

    pub fn spec_power(self, lighting: &Lighting) -> f32 {
        match self {
            ShadingModel::Phong if lighting.spec_power() == 0.0 => Self::DEFAULT_PHONG_POWER,
            _ => lighting.spec_power(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShadingModel::Gooch => "gooch",
            ShadingModel::Phong => "phong",
            ShadingModel::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ShadingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShadingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown shading model {s:?} (expected gooch, phong or mixed)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidescape_algebra::Vector3;

    #[test]
    fn next_cycles_through_all_models() {
        let mut m = ShadingModel::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(m);
            m = m.next();
        }
        assert_eq!(m, ShadingModel::Gooch);
        assert_eq!(seen, ShadingModel::ALL);
    }

    #[test]
    fn phong_fills_in_missing_power() {
        let lit = Lighting::new(true, 0.0, Vector3::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(ShadingModel::Phong.spec_power(&lit), 32.0);
        assert_eq!(ShadingModel::Gooch.spec_power(&lit), 0.0);

        let shiny = Lighting::new(true, 8.0, Vector3::ZERO).unwrap();
        assert_eq!(ShadingModel::Phong.spec_power(&shiny), 8.0);
    }

    #[test]
    fn parses_names() {
        assert_eq!("mixed".parse::<ShadingModel>(), Ok(ShadingModel::Mixed));
        assert!("toon".parse::<ShadingModel>().is_err());
    }
}
