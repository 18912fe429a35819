use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tidescape_algebra::{Matrix4, Vector3};

use crate::{NodeId, SceneError, SceneObject, VertexRange};

/// Per-node lighting inputs handed to the shading stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    use_lighting: bool,
    spec_power: f32,
    spec_color: Vector3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self::unlit()
    }
}

impl Lighting {
    pub fn new(use_lighting: bool, spec_power: f32, spec_color: Vector3) -> Result<Self, SceneError> {
        if !spec_power.is_finite() || spec_power < 0.0 {
            return Err(SceneError::InvalidSpecularPower(spec_power));
        }
        Ok(Self {
            use_lighting,
            spec_power,
            spec_color,
        })
    }

    pub fn unlit() -> Self {
        Self {
            use_lighting: false,
            spec_power: 0.0,
            spec_color: Vector3::ZERO,
        }
    }

    pub fn use_lighting(&self) -> bool {
        self.use_lighting
    }

    pub fn spec_power(&self) -> f32 {
        self.spec_power
    }

    pub fn spec_color(&self) -> Vector3 {
        self.spec_color
    }
}

fn check_offset(offset: usize) -> Result<usize, SceneError> {
    if offset % 3 == 0 {
        Ok(offset)
    } else {
        Err(SceneError::MisalignedOffset(offset))
    }
}

/// Root of a transform hierarchy: a mesh with its own world placement.
///
/// `offset` counts floats into the shared vertex buffer.
#[derive(Debug, Clone)]
pub struct Model {
    offset: usize,
    object: Arc<SceneObject>,
    lighting: Lighting,
    pub model_matrix: Matrix4,
    pub world_matrix: Matrix4,
}

impl Model {
    pub fn new(offset: usize, object: Arc<SceneObject>, lighting: Lighting) -> Result<Self, SceneError> {
        Ok(Self {
            offset: check_offset(offset)?,
            object,
            lighting,
            model_matrix: Matrix4::new(),
            world_matrix: Matrix4::new(),
        })
    }

    /// `world_matrix * model_matrix`, computed fresh.
    pub fn pose(&self) -> Matrix4 {
        self.world_matrix * self.model_matrix
    }
}

/// Mesh mounted on a parent node; it has no world placement of its own.
#[derive(Debug, Clone)]
pub struct AssemblyNode {
    offset: usize,
    object: Arc<SceneObject>,
    lighting: Lighting,
    parent: NodeId,
    pub model_matrix: Matrix4,
}

impl AssemblyNode {
    pub fn new(
        offset: usize,
        object: Arc<SceneObject>,
        parent: NodeId,
        lighting: Lighting,
    ) -> Result<Self, SceneError> {
        Ok(Self {
            offset: check_offset(offset)?,
            object,
            lighting,
            parent,
            model_matrix: Matrix4::new(),
        })
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = parent;
    }
}

/// A slot in the scene arena: either a hierarchy root or a mounted child.
#[derive(Debug, Clone)]
pub enum SceneNode {
    Model(Model),
    Assembly(AssemblyNode),
}

impl SceneNode {
    pub fn offset(&self) -> usize {
        match self {
            SceneNode::Model(m) => m.offset,
            SceneNode::Assembly(a) => a.offset,
        }
    }

    pub fn object(&self) -> &Arc<SceneObject> {
        match self {
            SceneNode::Model(m) => &m.object,
            SceneNode::Assembly(a) => &a.object,
        }
    }

    pub fn lighting(&self) -> Lighting {
        match self {
            SceneNode::Model(m) => m.lighting,
            SceneNode::Assembly(a) => a.lighting,
        }
    }

    pub fn model_matrix(&self) -> &Matrix4 {
        match self {
            SceneNode::Model(m) => &m.model_matrix,
            SceneNode::Assembly(a) => &a.model_matrix,
        }
    }

    pub fn model_matrix_mut(&mut self) -> &mut Matrix4 {
        match self {
            SceneNode::Model(m) => &mut m.model_matrix,
            SceneNode::Assembly(a) => &mut a.model_matrix,
        }
    }

    /// World placement; only roots carry one.
    pub fn world_matrix_mut(&mut self) -> Option<&mut Matrix4> {
        match self {
            SceneNode::Model(m) => Some(&mut m.world_matrix),
            SceneNode::Assembly(_) => None,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            SceneNode::Model(_) => None,
            SceneNode::Assembly(a) => Some(a.parent),
        }
    }

    /// Vertices this node draws from the shared buffer.
    pub fn vertex_range(&self) -> VertexRange {
        VertexRange {
            first: self.offset() / 3,
            count: self.object().vertex_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_stub() -> Arc<SceneObject> {
        Arc::new(SceneObject::from_mesh(vec![0.0; 18]).unwrap())
    }

    #[test]
    fn lighting_rejects_negative_power() {
        assert!(Lighting::new(true, -1.0, Vector3::ZERO).is_err());
        assert!(Lighting::new(true, f32::NAN, Vector3::ZERO).is_err());
        let l = Lighting::new(true, 16.0, Vector3::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(l.spec_power(), 16.0);
    }

    #[test]
    fn model_pose_is_world_times_model() {
        let mut m = Model::new(0, cube_stub(), Lighting::unlit()).unwrap();
        m.model_matrix.set_scale(2.0, 2.0, 2.0);
        m.world_matrix.set_translate(1.0, 0.0, 0.0);
        let p = m.pose().multiply_vector3(&Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(p, Vector3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn offset_must_start_a_vertex() {
        assert_eq!(
            Model::new(4, cube_stub(), Lighting::unlit()).unwrap_err(),
            SceneError::MisalignedOffset(4)
        );
    }

    #[test]
    fn vertex_range_counts_vertices() {
        let node = SceneNode::Model(Model::new(30, cube_stub(), Lighting::unlit()).unwrap());
        assert_eq!(node.vertex_range(), VertexRange { first: 10, count: 6 });
        assert_eq!(node.parent(), None);
    }
}
