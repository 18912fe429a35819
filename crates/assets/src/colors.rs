use serde::{Deserialize, Serialize};
use tidescape_algebra::Vector3;

/// Fixed per-mesh color schemes. Each shades from dark to light along the
/// triangle order so neighbouring faces stay distinguishable without lighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Blue,
    Brown,
    Green,
    White,
}

impl Palette {
    fn color(self, shade: f32) -> [f32; 3] {
        match self {
            Palette::Blue => [shade, shade, 1.0],
            Palette::Brown => [0.3, 0.2, shade / 10.0],
            Palette::Green => [shade / 2.0, 1.0, shade / 2.0],
            Palette::White => [1.0, 1.0, 1.0],
        }
    }
}

/// `i * 3 / vertex_count` for the triangle holding vertex `v`: 0 for the first
/// triangle, approaching 1 for the last.
fn triangle_shade(v: usize, vertex_count: usize) -> f32 {
    ((v / 3) * 3) as f32 / vertex_count as f32
}

/// Flat `r, g, b` list for `vertex_count` vertices in `palette`.
pub fn palette_colors(vertex_count: usize, palette: Palette) -> Vec<f32> {
    (0..vertex_count)
        .flat_map(|v| palette.color(triangle_shade(v, vertex_count)))
        .collect()
}

/// `base * (0.5 + 0.5 * shade)` per triangle.
pub fn shaded_colors(vertex_count: usize, base: [f32; 3]) -> Vec<f32> {
    (0..vertex_count)
        .flat_map(|v| {
            let k = 0.5 + 0.5 * triangle_shade(v, vertex_count);
            base.map(|c| c * k)
        })
        .collect()
}

/// Bake a fixed directional light into colors: `base * max(0, n . l)` with
/// `l` pointing toward `(0.5, 0.5, 1)`.
pub fn lit_colors(normals: &[f32], base: [f32; 3]) -> Vec<f32> {
    let light = Vector3::new(0.5, 0.5, 1.0).normalized();
    normals
        .chunks_exact(3)
        .flat_map(|n| {
            let d = Vector3::new(n[0], n[1], n[2]).dot(&light).max(0.0);
            base.map(|c| c * d)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_shades_per_triangle() {
        let colors = palette_colors(6, Palette::Blue);
        assert_eq!(colors.len(), 18);
        assert_eq!(&colors[..3], &[0.0, 0.0, 1.0]);
        assert_eq!(&colors[6..9], &[0.0, 0.0, 1.0]);
        assert_eq!(&colors[9..12], &[0.5, 0.5, 1.0]);
        assert!(palette_colors(3, Palette::White).iter().all(|&c| c == 1.0));
    }

    #[test]
    fn shaded_starts_at_half_base() {
        let colors = shaded_colors(6, [0.4, 0.8, 1.0]);
        assert_eq!(&colors[..3], &[0.2, 0.4, 0.5]);
        assert!((colors[9] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn lit_colors_clamp_back_faces() {
        let facing = Vector3::new(0.5, 0.5, 1.0).normalized();
        let normals = [facing.x, facing.y, facing.z, 0.0, 0.0, -1.0];
        let colors = lit_colors(&normals, [1.0, 0.5, 0.0]);
        assert!((colors[0] - 1.0).abs() < 1e-6);
        assert!((colors[1] - 0.5).abs() < 1e-6);
        assert_eq!(&colors[3..], &[0.0, 0.0, 0.0]);
    }
}
