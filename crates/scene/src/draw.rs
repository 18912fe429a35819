use bytemuck::{Pod, Zeroable};
use tidescape_algebra::Matrix4;

use crate::{Lighting, NodeId};

/// Contiguous run of vertices inside the shared vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRange {
    pub first: usize,
    pub count: usize,
}

/// Everything the draw step needs for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub node: NodeId,
    pub model: Matrix4,
    pub world: Matrix4,
    /// Inverse-transpose of `world * model`.
    pub normal_matrix: Matrix4,
    pub range: VertexRange,
    pub lighting: Lighting,
}

/// Per-draw uniform block, laid out for direct upload.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub world: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub spec_color: [f32; 3],
    pub spec_power: f32,
    pub use_lighting: u32,
    pub _pad: [u32; 3],
}

impl From<&DrawParams> for DrawUniforms {
    fn from(d: &DrawParams) -> Self {
        Self {
            model: d.model.to_cols_array_2d(),
            world: d.world.to_cols_array_2d(),
            normal: d.normal_matrix.to_cols_array_2d(),
            spec_color: d.lighting.spec_color().to_array(),
            spec_power: d.lighting.spec_power(),
            use_lighting: u32::from(d.lighting.use_lighting()),
            _pad: [0; 3],
        }
    }
}
