use sha2::{Digest, Sha256};
use tidescape_algebra::Vector3;

use crate::{HeightPalette, Noise, TerrainOptions, TerrainOptionsInput};

/// Flat triangle list: every three vertices form one triangle, with grid
/// points shared by neighbouring triangles repeated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    vertices: Vec<[f32; 3]>,
}

impl TerrainMesh {
    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` list.
    pub fn positions(&self) -> Vec<f32> {
        self.vertices.iter().flatten().copied().collect()
    }

    /// One face normal per triangle, repeated for its three vertices.
    pub fn flat_normals(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len() * 3);
        for tri in self.vertices.chunks_exact(3) {
            let a = Vector3::from(tri[0]);
            let b = Vector3::from(tri[1]);
            let c = Vector3::from(tri[2]);
            let n = (b - a).cross(&(c - a)).normalized().to_array();
            for _ in 0..3 {
                out.extend_from_slice(&n);
            }
        }
        out
    }

    /// Per-vertex colors shaded by height relative to `height`.
    pub fn colors(&self, palette: HeightPalette, height: f64) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            out.extend_from_slice(&palette.shade(v[1], height));
        }
        out
    }

    /// First eight bytes of the SHA-256 of the vertex data, for cheap
    /// determinism checks.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Sha256::new();
        for v in &self.vertices {
            for c in v {
                hasher.update(c.to_le_bytes());
            }
        }
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Smallest and largest height, or `None` for an empty mesh.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        self.vertices.iter().map(|v| v[1]).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }
}

/// Samples a noise heightfield on an integer grid and triangulates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerrainGenerator;

impl TerrainGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Validate `input` and generate. Invalid input is logged and yields an
    /// empty mesh.
    pub fn generate_terrain_mesh(&self, input: &TerrainOptionsInput) -> TerrainMesh {
        match input.validate() {
            Ok(options) => self.generate(&options),
            Err(error) => {
                tracing::error!(%error, ?input, "terrain options rejected");
                TerrainMesh::default()
            }
        }
    }

    /// Parse a JSON options document and generate. A malformed document is
    /// logged and yields an empty mesh, like any other invalid input.
    pub fn generate_from_json(&self, text: &str) -> TerrainMesh {
        match TerrainOptionsInput::from_json(text) {
            Ok(input) => self.generate_terrain_mesh(&input),
            Err(error) => {
                tracing::error!(%error, "terrain options document rejected");
                TerrainMesh::default()
            }
        }
    }

    /// Height at grid point `(x, z)` is the noise at
    /// `(x / width * roughness, z / depth * roughness)` scaled by `height`.
    /// Each cell splits along the same diagonal into `(i0, i1, i2)` and
    /// `(i2, i1, i3)`, with `i0 = (x, z)`, `i1 = (x, z + 1)`,
    /// `i2 = (x + 1, z)` and `i3 = (x + 1, z + 1)`.
    pub fn generate(&self, options: &TerrainOptions) -> TerrainMesh {
        let _span = tracing::info_span!(
            "generate_terrain",
            width = options.width,
            depth = options.depth,
            noise = %options.noisefn
        )
        .entered();

        let noise = Noise::new(options.seed);
        let width = options.width as usize;
        let depth = options.depth as usize;

        let mut grid = Vec::with_capacity(width * depth);
        for x in 0..width {
            for z in 0..depth {
                let u = x as f64 / options.width as f64 * options.roughness;
                let v = z as f64 / options.depth as f64 * options.roughness;
                let y = options.noisefn.sample(&noise, u, v) * options.height;
                grid.push([x as f32, y as f32, z as f32]);
            }
        }

        let cells = width.saturating_sub(1) * depth.saturating_sub(1);
        let mut vertices = Vec::with_capacity(cells * 6);
        for x in 0..width.saturating_sub(1) {
            for z in 0..depth.saturating_sub(1) {
                let i0 = x * depth + z;
                let i1 = i0 + 1;
                let i2 = (x + 1) * depth + z;
                let i3 = i2 + 1;
                for i in [i0, i1, i2, i2, i1, i3] {
                    vertices.push(grid[i]);
                }
            }
        }

        tracing::debug!(triangles = vertices.len() / 3, "terrain generated");
        TerrainMesh { vertices }
    }
}
