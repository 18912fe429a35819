use serde::{Deserialize, Serialize};
use tidescape_algebra::{AlgebraError, Matrix4, Vector3, Vector4};
use tidescape_scene::{DrawParams, DrawUniforms, SceneError, SceneGraph};

use crate::ShadingModel;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("scene: {0}")]
    Scene(#[from] SceneError),
    #[error("projection: {0}")]
    Projection(#[from] AlgebraError),
}

/// Symmetric perspective projection parameters; `fovy` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fovy: 90.0,
            aspect: 1.0,
            near: 0.2,
            far: 475.0,
        }
    }
}

impl ProjectionConfig {
    pub fn matrix(&self) -> Result<Matrix4, AlgebraError> {
        let mut m = Matrix4::new();
        m.set_perspective(self.fovy, self.aspect, self.near, self.far)?;
        Ok(m)
    }
}

/// One node's draw, as resolved for a particular frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDraw {
    pub name: String,
    pub params: DrawParams,
    /// Specular exponent after the frame's shading model is applied.
    pub spec_power: f32,
    /// Normalized device coordinates of the node's origin, or `None` when it
    /// lies behind the eye.
    pub ndc: Option<Vector3>,
}

impl FrameDraw {
    pub fn uniforms(&self) -> DrawUniforms {
        let mut u = DrawUniforms::from(&self.params);
        u.spec_power = self.spec_power;
        u
    }

    /// Whether the origin falls inside the clip volume.
    pub fn in_view(&self) -> bool {
        self.ndc
            .is_some_and(|p| p.x.abs() <= 1.0 && p.y.abs() <= 1.0 && p.z.abs() <= 1.0)
    }
}

/// Immutable snapshot of everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub view: Matrix4,
    pub projection: Matrix4,
    /// Camera position recovered from the view matrix, or the origin when
    /// the view is singular.
    pub eye: Vector3,
    pub light: Vector3,
    pub shading: ShadingModel,
    pub draws: Vec<FrameDraw>,
}

impl Frame {
    pub fn capture(
        graph: &SceneGraph,
        view: &Matrix4,
        projection: &Matrix4,
        light: Vector3,
        shading: ShadingModel,
    ) -> Result<Self, RenderError> {
        let _span = tracing::info_span!("capture_frame", nodes = graph.len(), %shading).entered();

        let view_projection = *projection * *view;
        let mut draws = Vec::new();
        for params in graph.draw_list()? {
            let pose = params.world * params.model;
            let clip = (view_projection * pose).multiply_vector4(&Vector4::new(0.0, 0.0, 0.0, 1.0));
            let ndc = (clip.w > 0.0).then(|| Vector3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w));
            draws.push(FrameDraw {
                name: graph.name(params.node).unwrap_or_default().to_string(),
                spec_power: shading.spec_power(&params.lighting),
                params,
                ndc,
            });
        }

        let eye = if view.determinant() == 0.0 {
            tracing::warn!(view = %view, "singular view matrix; eye placed at the origin");
            Vector3::ZERO
        } else {
            let mut inverse_view = *view;
            inverse_view.invert();
            inverse_view.translation()
        };
        let frame = Self {
            view: *view,
            projection: *projection,
            eye,
            light,
            shading,
            draws,
        };
        tracing::debug!(draws = frame.draws.len(), visible = frame.visible_count(), "frame captured");
        Ok(frame)
    }

    /// Draws whose origin projects inside the clip volume.
    pub fn visible_count(&self) -> usize {
        self.draws.iter().filter(|d| d.in_view()).count()
    }

    /// Total vertices submitted across all draws.
    pub fn vertex_count(&self) -> usize {
        self.draws.iter().map(|d| d.params.range.count).sum()
    }
}
