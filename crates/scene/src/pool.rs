use crate::SceneObject;

const FLOAT_BYTES: usize = std::mem::size_of::<f32>();

/// Byte offsets of the three attribute sections in a packed [`VertexPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeLayout {
    pub positions: usize,
    pub colors: usize,
    pub normals: usize,
    /// Bytes between consecutive vertices within a section.
    pub stride: usize,
}

/// Shared vertex buffer builder.
///
/// Objects are appended in order; the packed buffer holds every position,
/// then every color, then every normal. The offset returned by
/// [`VertexPool::push`] counts floats and is what a node's `offset` expects.
#[derive(Debug, Clone, Default)]
pub struct VertexPool {
    positions: Vec<f32>,
    colors: Vec<f32>,
    normals: Vec<f32>,
}

impl VertexPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: &SceneObject) -> usize {
        let offset = self.positions.len();
        self.positions.extend_from_slice(object.mesh());
        self.colors.extend_from_slice(object.colors());
        self.normals.extend_from_slice(object.normals());
        tracing::trace!(offset, vertices = object.vertex_count(), "pooled mesh");
        offset
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn layout(&self) -> AttributeLayout {
        AttributeLayout {
            positions: 0,
            colors: self.positions.len() * FLOAT_BYTES,
            normals: (self.positions.len() + self.colors.len()) * FLOAT_BYTES,
            stride: 3 * FLOAT_BYTES,
        }
    }

    pub fn pack(&self) -> Vec<f32> {
        let mut out =
            Vec::with_capacity(self.positions.len() + self.colors.len() + self.normals.len());
        out.extend_from_slice(&self.positions);
        out.extend_from_slice(&self.colors);
        out.extend_from_slice(&self.normals);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: f32, vertices: usize) -> SceneObject {
        let n = vertices * 3;
        SceneObject::new(vec![value; n], Some(vec![value + 10.0; n]), Some(vec![value + 20.0; n]))
            .unwrap()
    }

    #[test]
    fn offsets_count_floats() {
        let mut pool = VertexPool::new();
        assert_eq!(pool.push(&object(1.0, 3)), 0);
        assert_eq!(pool.push(&object(2.0, 6)), 9);
        assert_eq!(pool.vertex_count(), 9);
    }

    #[test]
    fn pack_groups_attributes() {
        let mut pool = VertexPool::new();
        pool.push(&object(1.0, 3));
        pool.push(&object(2.0, 3));
        let packed = pool.pack();
        assert_eq!(packed.len(), 54);
        assert_eq!(packed[0], 1.0);
        assert_eq!(packed[9], 2.0);
        assert_eq!(packed[18], 11.0);
        assert_eq!(packed[36], 21.0);

        let layout = pool.layout();
        assert_eq!(layout.colors, 18 * 4);
        assert_eq!(layout.normals, 36 * 4);
        assert_eq!(layout.stride, 12);
    }
}
