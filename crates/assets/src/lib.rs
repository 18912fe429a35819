//! Asset pipeline: OBJ import, vertex color builders, primitive meshes and a
//! content-addressed mesh library.
//!
//! Everything here produces flat, non-indexed triangle lists: three floats
//! per vertex, three vertices per triangle, ready to wrap in a
//! [`tidescape_scene::SceneObject`].
//!
//! # Invariants
//! - A [`MeshData`] always holds positions and normals for the same vertex
//!   count; texture coordinates are either absent or complete.
//! - Library ids are derived from content, so inserting the same named mesh
//!   twice yields the same id.

mod colors;
mod error;
mod library;
mod mesh;
mod obj;
mod primitives;

pub use colors::{Palette, lit_colors, palette_colors, shaded_colors};
pub use error::{AssetError, ObjError};
pub use library::{AssetId, MeshLibrary};
pub use mesh::MeshData;
pub use obj::{ObjGroups, read_obj, read_obj_by_group};
pub use primitives::{cuboid, unit_cube};

pub fn crate_info() -> &'static str {
    "tidescape-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
