use serde::{Deserialize, Serialize};
use tidescape_algebra::Vector3;
use tidescape_scene::{SceneError, SceneObject};

/// Flat triangle-list geometry before colors are assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    /// Two floats per vertex, or empty.
    pub texcoords: Vec<f32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Append another mesh. Texture coordinates survive only if both sides
    /// have them.
    pub fn extend(&mut self, other: &MeshData) {
        let keep_uv = (self.is_empty() || !self.texcoords.is_empty()) && !other.texcoords.is_empty();
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        if keep_uv {
            self.texcoords.extend_from_slice(&other.texcoords);
        } else {
            self.texcoords.clear();
        }
    }

    /// Replace every normal with its triangle's face normal.
    pub fn flatten_normals(&mut self) {
        self.normals = face_normals(&self.positions);
    }

    /// Wrap into a scene object with the given per-vertex colors.
    pub fn into_scene_object(self, colors: Vec<f32>) -> Result<SceneObject, SceneError> {
        SceneObject::new(self.positions, Some(colors), Some(self.normals))
    }
}

/// One unit face normal per triangle, repeated for each of its vertices.
pub(crate) fn face_normals(positions: &[f32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(positions.len());
    for tri in positions.chunks_exact(9) {
        let a = Vector3::new(tri[0], tri[1], tri[2]);
        let b = Vector3::new(tri[3], tri[4], tri[5]);
        let c = Vector3::new(tri[6], tri[7], tri[8]);
        let n = (b - a).cross(&(c - a)).normalized().to_array();
        for _ in 0..3 {
            out.extend_from_slice(&n);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(uv: bool) -> MeshData {
        MeshData {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![0.0; 9],
            texcoords: if uv { vec![0.0; 6] } else { Vec::new() },
        }
    }

    #[test]
    fn flatten_normals_faces_counter_clockwise_side() {
        let mut m = tri(false);
        m.flatten_normals();
        assert_eq!(m.normals, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn extend_drops_partial_texcoords() {
        let mut m = MeshData::default();
        m.extend(&tri(true));
        assert_eq!(m.texcoords.len(), 6);
        m.extend(&tri(false));
        assert_eq!(m.vertex_count(), 6);
        assert!(m.texcoords.is_empty());
    }

    #[test]
    fn wraps_into_scene_object() {
        let object = tri(false).into_scene_object(vec![1.0; 9]).unwrap();
        assert_eq!(object.vertex_count(), 3);
        assert_eq!(object.colors(), &[1.0; 9]);
    }
}
