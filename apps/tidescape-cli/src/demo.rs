use std::sync::Arc;

use anyhow::Context;
use tidescape_algebra::{Matrix4, Vector3};
use tidescape_assets::{MeshData, MeshLibrary, Palette, cuboid, lit_colors, palette_colors, shaded_colors};
use tidescape_scene::{AssemblyNode, Lighting, Model, NodeId, SceneGraph, SceneObject, VertexPool};
use tidescape_terrain::{HeightPalette, TerrainGenerator, TerrainOptions};

use crate::config::SceneConfig;

/// Plane yaw, degrees per ms.
pub const PLANE_ROTATION_SPEED: f32 = 0.05;
/// Propeller spin, degrees per ms.
pub const PROPELLER_ROTATION_SPEED: f32 = 1.0;
pub const JELLYFISH_AMPLITUDE: f32 = 15.0;
/// Bob phase gained per ms.
pub const JELLYFISH_RATE: f32 = 0.002;

/// The harbour scene: seabed terrain, a circling biplane with a spinning
/// propeller, a moored boat, a bobbing jellyfish and a lighthouse that doubles
/// as the light source.
#[derive(Debug)]
pub struct DemoScene {
    pub graph: SceneGraph,
    pub pool: VertexPool,
    pub library: MeshLibrary,
    pub terrain: NodeId,
    pub plane: NodeId,
    pub propeller: NodeId,
    pub boat: NodeId,
    pub jellyfish: NodeId,
    pub lighthouse: NodeId,
    /// Nodes the camera cycles through when focusing, in key order.
    pub focus_order: Vec<NodeId>,
    jellyfish_time: f32,
}

impl DemoScene {
    pub fn build(config: &SceneConfig) -> anyhow::Result<Self> {
        let _span = tracing::info_span!("build_demo_scene").entered();

        let options = config.terrain.validate().context("terrain options")?;
        let mut library = MeshLibrary::new();
        let mut pool = VertexPool::new();
        let mut graph = SceneGraph::new();

        let terrain_object = library_object(&mut library, "terrain", terrain(&options, config.palette)?)?;
        let plane_object = library_object(&mut library, "plane", {
            let mesh = cuboid(2.0, 0.5, 3.0);
            let colors = shaded_colors(mesh.vertex_count(), [0.3, 0.5, 0.8]);
            mesh.into_scene_object(colors)?
        })?;
        let propeller_object = library_object(&mut library, "propeller", {
            let mesh = cuboid(1.5, 0.1, 0.05);
            let colors = shaded_colors(mesh.vertex_count(), [0.3, 0.5, 0.8]);
            mesh.into_scene_object(colors)?
        })?;
        let boat_object = library_object(&mut library, "boat", palette_object(cuboid(1.0, 0.4, 2.5), Palette::Brown)?)?;
        let jellyfish_object = library_object(&mut library, "jellyfish", {
            let mesh = cuboid(0.6, 0.8, 0.6);
            let colors = shaded_colors(mesh.vertex_count(), [0.9, 0.1, 0.6]);
            mesh.into_scene_object(colors)?
        })?;
        let lighthouse_object = library_object(&mut library, "lighthouse", {
            let mesh = cuboid(0.3, 1.0, 0.3);
            let colors = lit_colors(&mesh.normals, [1.0, 1.0, 1.0]);
            mesh.into_scene_object(colors)?
        })?;

        let shiny = Lighting::new(true, 32.0, Vector3::new(1.0, 1.0, 1.0))?;
        let dull = Lighting::new(true, 32.0, Vector3::ZERO)?;

        let mut plane = Model::new(pool.push(&plane_object), plane_object, shiny)?;
        plane.model_matrix.scale(3.0, 3.0, 3.0);
        plane
            .world_matrix
            .rotate(-45.0, 0.0, 1.0, 0.0)
            .rotate(20.0, 1.0, 0.0, 0.0)
            .translate(-80.0, 55.0, -80.0);
        let plane = graph.add_model("plane", plane);

        let mut propeller = AssemblyNode::new(pool.push(&propeller_object), propeller_object, plane, dull)?;
        propeller.model_matrix.translate(0.0, 0.0, 3.2);
        let propeller = graph.add_assembly("propeller", propeller)?;

        let mut boat = Model::new(pool.push(&boat_object), boat_object, shiny)?;
        boat.model_matrix.scale(12.0, 12.0, 12.0);
        boat.world_matrix.translate(10.0, -2.0, 0.0);
        let boat = graph.add_model("boat", boat);

        let mut jellyfish = Model::new(pool.push(&jellyfish_object), jellyfish_object, Lighting::unlit())?;
        jellyfish.model_matrix.scale(3.0, 3.0, 3.0);
        jellyfish.world_matrix.translate(-20.0, 10.0, -27.0);
        let jellyfish = graph.add_model("jellyfish", jellyfish);

        let mut lighthouse = Model::new(pool.push(&lighthouse_object), lighthouse_object, Lighting::unlit())?;
        lighthouse.model_matrix.scale(20.0, 20.0, 20.0);
        lighthouse.world_matrix.translate(50.0, -5.0, 10.0);
        let lighthouse = graph.add_model("lighthouse", lighthouse);

        let mut terrain = Model::new(pool.push(&terrain_object), terrain_object, Lighting::unlit())?;
        terrain.model_matrix.scale(4.5, 4.5, 4.5);
        terrain.world_matrix.translate(-450.0, -10.0, -450.0);
        let terrain = graph.add_model("terrain", terrain);

        graph.validate()?;
        tracing::info!(
            nodes = graph.len(),
            meshes = library.len(),
            vertices = pool.vertex_count(),
            "demo scene built"
        );

        Ok(Self {
            graph,
            pool,
            library,
            terrain,
            plane,
            propeller,
            boat,
            jellyfish,
            lighthouse,
            focus_order: vec![lighthouse, plane, boat, jellyfish],
            jellyfish_time: 0.0,
        })
    }

    /// Advance every animated node by `delta_ms`.
    pub fn animate(&mut self, delta_ms: f32) -> anyhow::Result<()> {
        self.jellyfish_time += delta_ms * JELLYFISH_RATE;
        let bob = self.jellyfish_time.sin() * JELLYFISH_AMPLITUDE;
        if let Some(world) = self.world_mut(self.jellyfish)? {
            world.set_translate(-20.0, 10.0 + bob, -27.0);
        }
        if let Some(world) = self.world_mut(self.plane)? {
            world.rotate(PLANE_ROTATION_SPEED * delta_ms, 0.0, 1.0, 0.0);
        }
        self.model_mut(self.propeller)?
            .rotate(PROPELLER_ROTATION_SPEED * delta_ms, 0.0, 0.0, 1.0);
        Ok(())
    }

    /// World positions the camera can focus on, in cycling order.
    pub fn focus_targets(&self) -> anyhow::Result<Vec<Vector3>> {
        self.focus_order
            .iter()
            .map(|id| self.graph.focus_point(*id).map_err(anyhow::Error::from))
            .collect()
    }

    /// The lighthouse lamp: its model origin carried into world space.
    pub fn light(&self) -> anyhow::Result<Vector3> {
        Ok(self.graph.origin(self.lighthouse)?)
    }

    fn world_mut(&mut self, id: NodeId) -> anyhow::Result<Option<&mut Matrix4>> {
        let node = self.graph.get_mut(id).context("demo node missing")?;
        Ok(node.world_matrix_mut())
    }

    fn model_mut(&mut self, id: NodeId) -> anyhow::Result<&mut Matrix4> {
        let node = self.graph.get_mut(id).context("demo node missing")?;
        Ok(node.model_matrix_mut())
    }
}

fn terrain(options: &TerrainOptions, palette: HeightPalette) -> anyhow::Result<SceneObject> {
    let mesh = TerrainGenerator::new().generate(options);
    let colors = mesh.colors(palette, options.height);
    let normals = mesh.flat_normals();
    Ok(SceneObject::new(mesh.positions(), Some(colors), Some(normals))?)
}

fn palette_object(mesh: MeshData, palette: Palette) -> anyhow::Result<SceneObject> {
    let colors = palette_colors(mesh.vertex_count(), palette);
    Ok(mesh.into_scene_object(colors)?)
}

fn library_object(library: &mut MeshLibrary, name: &str, object: SceneObject) -> anyhow::Result<Arc<SceneObject>> {
    let id = library.insert(name, object);
    Ok(library.require(id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidescape_scene::SceneNode;
    use tidescape_terrain::{NoiseFunction, TerrainOptionsInput};

    fn small_config() -> SceneConfig {
        SceneConfig {
            terrain: TerrainOptionsInput::from(TerrainOptions {
                width: 8,
                height: 2.0,
                depth: 8,
                noisefn: NoiseFunction::Simplex,
                seed: 5,
                roughness: 1.5,
            }),
            ..SceneConfig::default()
        }
    }

    #[test]
    fn builds_every_node() {
        let scene = DemoScene::build(&small_config()).unwrap();
        assert_eq!(scene.graph.len(), 6);
        let propeller = scene.graph.get(scene.propeller).and_then(SceneNode::parent);
        assert_eq!(propeller, Some(scene.plane));
        assert_eq!(scene.focus_targets().unwrap().len(), 4);
        assert_eq!(scene.library.len(), 6);
    }

    #[test]
    fn propeller_follows_plane() {
        let mut scene = DemoScene::build(&small_config()).unwrap();
        let before = scene.graph.origin(scene.propeller).unwrap();
        scene.animate(100.0).unwrap();
        let after = scene.graph.origin(scene.propeller).unwrap();
        assert!((before - after).magnitude() > 1e-3);

        let plane = scene.graph.place(scene.plane).unwrap();
        let propeller = scene.graph.place(scene.propeller).unwrap();
        assert_eq!(plane.world, propeller.world);
    }

    #[test]
    fn jellyfish_bobs_within_amplitude() {
        let mut scene = DemoScene::build(&small_config()).unwrap();
        for _ in 0..50 {
            scene.animate(40.0).unwrap();
            let y = scene.graph.focus_point(scene.jellyfish).unwrap().y;
            assert!((y - 10.0).abs() <= JELLYFISH_AMPLITUDE + 1e-3);
        }
    }

    #[test]
    fn light_sits_at_lighthouse() {
        let scene = DemoScene::build(&small_config()).unwrap();
        let light = scene.light().unwrap();
        assert!((light - Vector3::new(50.0, -5.0, 10.0)).magnitude() < 1e-4);
    }

    #[test]
    fn invalid_terrain_is_reported() {
        let mut config = small_config();
        config.terrain.noisefn = Some("fractal".into());
        assert!(DemoScene::build(&config).is_err());
    }
}
