use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tidescape_scene::SceneObject;

use crate::{AssetError, Palette, palette_colors, read_obj};

/// Content-addressed asset ID computed from a mesh's name and vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    name: String,
    object: Arc<SceneObject>,
}

/// Named scene objects indexed by content hash.
///
/// Objects are handed out as shared handles, so every node that draws the
/// same mesh points at one copy. The library can be persisted to disk as
/// JSON for inspection or reuse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshLibrary {
    meshes: BTreeMap<AssetId, Entry>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object and return its ID. Re-inserting identical content
    /// under the same name keeps the existing entry.
    pub fn insert(&mut self, name: impl Into<String>, object: SceneObject) -> AssetId {
        let name = name.into();
        let id = content_hash(&name, &object);
        self.meshes.entry(id).or_insert_with(|| Entry {
            name,
            object: Arc::new(object),
        });
        id
    }

    /// Parse an OBJ document, color it from `palette` and register it.
    pub fn import_obj(
        &mut self,
        name: impl Into<String>,
        text: &str,
        palette: Palette,
    ) -> Result<AssetId, AssetError> {
        let mesh = read_obj(text)?;
        let colors = palette_colors(mesh.vertex_count(), palette);
        let object = mesh.into_scene_object(colors)?;
        Ok(self.insert(name, object))
    }

    pub fn get(&self, id: AssetId) -> Option<&Arc<SceneObject>> {
        self.meshes.get(&id).map(|e| &e.object)
    }

    pub fn require(&self, id: AssetId) -> Result<Arc<SceneObject>, AssetError> {
        self.get(id).cloned().ok_or(AssetError::NotFound(id))
    }

    pub fn name(&self, id: AssetId) -> Option<&str> {
        self.meshes.get(&id).map(|e| e.name.as_str())
    }

    /// First entry registered under `name`, in ID order.
    pub fn find(&self, name: &str) -> Option<AssetId> {
        self.meshes
            .iter()
            .find(|(_, e)| e.name == name)
            .map(|(id, _)| *id)
    }

    pub fn ids(&self) -> impl Iterator<Item = AssetId> + '_ {
        self.meshes.keys().copied()
    }

    /// Number of registered meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Total vertices across every registered mesh.
    pub fn vertex_count(&self) -> usize {
        self.meshes.values().map(|e| e.object.vertex_count()).sum()
    }

    /// Save the library to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a library from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path)?;
        let library: Self = serde_json::from_reader(file)?;
        tracing::debug!(meshes = library.len(), "mesh library loaded");
        Ok(library)
    }
}

fn content_hash(name: &str, object: &SceneObject) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    for attribute in [object.mesh(), object.colors(), object.normals()] {
        for c in attribute {
            hasher.update(c.to_le_bytes());
        }
    }
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit_cube;

    fn cube() -> SceneObject {
        let mesh = unit_cube();
        let colors = palette_colors(mesh.vertex_count(), Palette::White);
        mesh.into_scene_object(colors).unwrap()
    }

    #[test]
    fn insert_and_get() {
        let mut library = MeshLibrary::new();
        let id = library.insert("cube", cube());
        assert_eq!(library.get(id).map(|o| o.vertex_count()), Some(36));
        assert_eq!(library.name(id), Some("cube"));
        assert_eq!(library.find("cube"), Some(id));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn content_addressed_dedup() {
        let mut library = MeshLibrary::new();
        let a = library.insert("cube", cube());
        let b = library.insert("cube", cube());
        let c = library.insert("crate", cube());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(library.len(), 2);
    }

    #[test]
    fn missing_id_is_not_found() {
        let library = MeshLibrary::new();
        assert!(matches!(
            library.require(AssetId(7)),
            Err(AssetError::NotFound(AssetId(7)))
        ));
    }

    #[test]
    fn import_obj_colors_the_mesh() {
        let mut library = MeshLibrary::new();
        let id = library
            .import_obj("tri", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n", Palette::Green)
            .unwrap();
        let object = library.require(id).unwrap();
        assert_eq!(&object.colors()[..3], &[0.0, 1.0, 0.0]);
        assert_eq!(&object.normals()[..3], &[0.0, 0.0, 1.0]);

        assert!(matches!(
            library.import_obj("bad", "f 1 2 3\n", Palette::Green),
            Err(AssetError::Obj(_))
        ));
        assert!(matches!(
            library.import_obj("empty", "v 0 0 0\n", Palette::Green),
            Err(AssetError::Scene(_))
        ));
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let mut library = MeshLibrary::new();
        let id = library.insert("cube", cube());
        library.save(tmp.path()).unwrap();

        let loaded = MeshLibrary::load(tmp.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(id).map(|o| o.mesh()), library.get(id).map(|o| o.mesh()));
        assert_eq!(loaded.vertex_count(), 36);
    }
}
