//! Terrain: seeded gradient noise and heightfield mesh synthesis.
//!
//! # Invariants
//! - The same seed always yields the same permutation table, so identical
//!   options produce bit-identical meshes.
//! - A `width x depth` grid yields `(width - 1) * (depth - 1) * 2` triangles,
//!   emitted as a flat list with shared vertices duplicated.
//! - Invalid options never panic: the fail-soft entry point logs and returns
//!   an empty mesh.

mod generator;
mod noise;
mod options;
mod palette;

pub use generator::{TerrainGenerator, TerrainMesh};
pub use noise::Noise;
pub use options::{NoiseFunction, TerrainError, TerrainOptions, TerrainOptionsInput};
pub use palette::HeightPalette;

pub fn crate_info() -> &'static str {
    "tidescape-terrain v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("terrain"));
    }
}
