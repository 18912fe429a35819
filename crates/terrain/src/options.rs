use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Noise;

/// Reasons a terrain description is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    #[error("terrain options missing {0}")]
    MissingField(&'static str),
    #[error("noise function {0:?} not supported (expected wave, simplex or perlin)")]
    UnsupportedNoise(String),
    #[error("terrain option {field} has an unusable value {value}")]
    InvalidField { field: &'static str, value: String },
    #[error("invalid terrain options document: {0}")]
    Parse(String),
}

/// Which noise sampler drives the heightfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseFunction {
    Wave,
    Simplex,
    Perlin,
}

impl NoiseFunction {
    pub fn sample(self, noise: &Noise, x: f64, y: f64) -> f64 {
        match self {
            NoiseFunction::Wave => noise.wave2(x, y),
            NoiseFunction::Simplex => noise.simplex2(x, y),
            NoiseFunction::Perlin => noise.perlin2(x, y),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NoiseFunction::Wave => "wave",
            NoiseFunction::Simplex => "simplex",
            NoiseFunction::Perlin => "perlin",
        }
    }
}

impl FromStr for NoiseFunction {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wave" => Ok(NoiseFunction::Wave),
            "simplex" => Ok(NoiseFunction::Simplex),
            "perlin" => Ok(NoiseFunction::Perlin),
            other => Err(TerrainError::UnsupportedNoise(other.to_string())),
        }
    }
}

impl fmt::Display for NoiseFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully validated heightfield description.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainOptions {
    /// Grid points along X.
    pub width: u32,
    /// Vertical scale applied to the noise value.
    pub height: f64,
    /// Grid points along Z.
    pub depth: u32,
    pub noisefn: NoiseFunction,
    pub seed: i64,
    /// How many noise periods the grid spans.
    pub roughness: f64,
}

impl TerrainOptions {
    /// The rolling seabed used by the demo scene.
    pub fn demo() -> Self {
        Self {
            width: 200,
            height: 10.0,
            depth: 200,
            noisefn: NoiseFunction::Perlin,
            seed: 12398123,
            roughness: 3.0,
        }
    }
}

/// Raw, possibly incomplete terrain description as read from a config file.
///
/// Fields keep whatever value the document held; types and ranges are only
/// checked by [`validate`](Self::validate), so a wrong-typed field is
/// rejected the same way as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainOptionsInput {
    pub width: Option<Value>,
    pub height: Option<Value>,
    pub depth: Option<Value>,
    pub noisefn: Option<Value>,
    pub seed: Option<Value>,
    pub roughness: Option<Value>,
}

impl TerrainOptionsInput {
    /// Parse a JSON document such as
    /// `{"width": 64, "height": 4, "depth": 64, "noisefn": "simplex", "seed": 3, "roughness": 2}`.
    pub fn from_json(text: &str) -> Result<Self, TerrainError> {
        serde_json::from_str(text).map_err(|e| TerrainError::Parse(e.to_string()))
    }

    /// Check that every field is present and well formed.
    pub fn validate(&self) -> Result<TerrainOptions, TerrainError> {
        let width = grid_size("width", &self.width)?;
        let height = number("height", &self.height)?;
        let depth = grid_size("depth", &self.depth)?;
        let noisefn = present("noisefn", &self.noisefn)?;
        let noisefn = noisefn
            .as_str()
            .ok_or_else(|| invalid("noisefn", noisefn))?
            .parse::<NoiseFunction>()?;
        let seed = integer("seed", &self.seed)?;
        let roughness = number("roughness", &self.roughness)?;

        Ok(TerrainOptions {
            width,
            height,
            depth,
            noisefn,
            seed,
            roughness,
        })
    }
}

fn present<'a>(field: &'static str, value: &'a Option<Value>) -> Result<&'a Value, TerrainError> {
    match value {
        None | Some(Value::Null) => Err(TerrainError::MissingField(field)),
        Some(v) => Ok(v),
    }
}

fn invalid(field: &'static str, value: &Value) -> TerrainError {
    TerrainError::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn number(field: &'static str, value: &Option<Value>) -> Result<f64, TerrainError> {
    let v = present(field, value)?;
    v.as_f64().ok_or_else(|| invalid(field, v))
}

/// Whole numbers only; `3.0` is accepted, `1.5` is not.
fn integer(field: &'static str, value: &Option<Value>) -> Result<i64, TerrainError> {
    let v = present(field, value)?;
    if let Some(i) = v.as_i64() {
        return Ok(i);
    }
    match v.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(invalid(field, v)),
    }
}

fn grid_size(field: &'static str, value: &Option<Value>) -> Result<u32, TerrainError> {
    let n = integer(field, value)?;
    u32::try_from(n).map_err(|_| TerrainError::InvalidField {
        field,
        value: n.to_string(),
    })
}

impl From<TerrainOptions> for TerrainOptionsInput {
    fn from(o: TerrainOptions) -> Self {
        Self {
            width: Some(o.width.into()),
            height: Some(o.height.into()),
            depth: Some(o.depth.into()),
            noisefn: Some(o.noisefn.as_str().into()),
            seed: Some(o.seed.into()),
            roughness: Some(o.roughness.into()),
        }
    }
}
