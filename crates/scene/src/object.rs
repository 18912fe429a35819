use serde::{Deserialize, Serialize};

use crate::SceneError;

/// Immutable mesh data: positions, colors and normals as flat float lists,
/// three floats per vertex each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    mesh: Vec<f32>,
    colors: Vec<f32>,
    normals: Vec<f32>,
}

impl SceneObject {
    /// Wrap positions with optional colors and normals.
    ///
    /// Missing colors or normals are filled with a copy of the positions. That
    /// keeps every attribute correctly shaped but is not meant to look right;
    /// supply real data for correct output.
    pub fn new(
        mesh: Vec<f32>,
        colors: Option<Vec<f32>>,
        normals: Option<Vec<f32>>,
    ) -> Result<Self, SceneError> {
        if mesh.is_empty() {
            return Err(SceneError::EmptyMesh);
        }
        if mesh.len() % 3 != 0 {
            return Err(SceneError::RaggedMesh(mesh.len()));
        }
        let colors = colors.unwrap_or_else(|| mesh.clone());
        let normals = normals.unwrap_or_else(|| mesh.clone());
        check_length("colors", mesh.len(), colors.len())?;
        check_length("normals", mesh.len(), normals.len())?;
        Ok(Self {
            mesh,
            colors,
            normals,
        })
    }

    pub fn from_mesh(mesh: Vec<f32>) -> Result<Self, SceneError> {
        Self::new(mesh, None, None)
    }

    pub fn mesh(&self) -> &[f32] {
        &self.mesh
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.len() / 3
    }
}

fn check_length(attribute: &'static str, expected: usize, found: usize) -> Result<(), SceneError> {
    if expected == found {
        Ok(())
    } else {
        Err(SceneError::AttributeLength {
            attribute,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<f32> {
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    }

    #[test]
    fn missing_attributes_copy_the_mesh() {
        let obj = SceneObject::from_mesh(triangle()).unwrap();
        assert_eq!(obj.colors(), obj.mesh());
        assert_eq!(obj.normals(), obj.mesh());
        assert_eq!(obj.vertex_count(), 3);
    }

    #[test]
    fn supplied_attributes_are_kept() {
        let colors = vec![1.0; 9];
        let obj = SceneObject::new(triangle(), Some(colors.clone()), None).unwrap();
        assert_eq!(obj.colors(), colors.as_slice());
    }

    #[test]
    fn rejects_empty_and_ragged_meshes() {
        assert_eq!(SceneObject::from_mesh(vec![]), Err(SceneError::EmptyMesh));
        assert_eq!(
            SceneObject::from_mesh(vec![1.0, 2.0]),
            Err(SceneError::RaggedMesh(2))
        );
    }

    #[test]
    fn rejects_mismatched_attributes() {
        let err = SceneObject::new(triangle(), None, Some(vec![0.0; 6])).unwrap_err();
        assert_eq!(
            err,
            SceneError::AttributeLength {
                attribute: "normals",
                expected: 9,
                found: 6,
            }
        );
    }
}
