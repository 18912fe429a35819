//! Scene Graph: meshes, root models, assembly nodes and their placement.
//!
//! # Invariants
//! - A `SceneObject` holds positions, colors and normals of the same length.
//! - Nodes live in an arena and refer to parents by `NodeId`; the parent
//!   relation is acyclic and every chain ends at a root `Model`. Both are
//!   checked when the relation changes, never per frame.
//! - Placement is recomputed on every call: `place()` walks the parent chain
//!   and nothing is cached.

mod draw;
mod error;
mod graph;
mod node;
mod object;
mod pool;

pub use draw::{DrawParams, DrawUniforms, VertexRange};
pub use error::SceneError;
pub use graph::{NodeId, Placement, SceneGraph};
pub use node::{AssemblyNode, Lighting, Model, SceneNode};
pub use object::SceneObject;
pub use pool::{AttributeLayout, VertexPool};

pub fn crate_info() -> &'static str {
    "tidescape-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
