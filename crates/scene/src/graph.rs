use tidescape_algebra::{Matrix4, Vector3};

use crate::{AssemblyNode, DrawParams, Model, SceneError, SceneNode};

/// Index of a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Resolved placement of a node: the composed local pose and the world
/// matrix of the hierarchy root. The effective transform is `world * model`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub model: Matrix4,
    pub world: Matrix4,
}

impl Placement {
    pub fn pose(&self) -> Matrix4 {
        self.world * self.model
    }
}

#[derive(Debug, Clone)]
struct Slot {
    name: String,
    node: SceneNode,
    visible: bool,
}

/// Arena of scene nodes.
///
/// Parents are referenced by [`NodeId`]. A node can only be attached to a
/// parent that already exists, and [`SceneGraph::reparent`] refuses to close
/// a loop, so every parent chain ends at a [`Model`].
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Insert a hierarchy root.
    pub fn add_model(&mut self, name: impl Into<String>, model: Model) -> NodeId {
        self.push(name.into(), SceneNode::Model(model))
    }

    /// Insert a child node; its parent must already be in the graph.
    pub fn add_assembly(
        &mut self,
        name: impl Into<String>,
        node: AssemblyNode,
    ) -> Result<NodeId, SceneError> {
        self.slot(node.parent())?;
        Ok(self.push(name.into(), SceneNode::Assembly(node)))
    }

    fn push(&mut self, name: String, node: SceneNode) -> NodeId {
        let id = NodeId(self.slots.len());
        tracing::debug!(?id, %name, parent = ?node.parent(), "adding scene node");
        self.slots.push(Slot {
            name,
            node,
            visible: true,
        });
        id
    }

    fn slot(&self, id: NodeId) -> Result<&Slot, SceneError> {
        self.slots.get(id.0).ok_or(SceneError::UnknownNode(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots.get(id.0).map(|s| &s.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots.get_mut(id.0).map(|s| &mut s.node)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.slots.get(id.0).map(|s| s.name.as_str())
    }

    /// First node carrying `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.slots.iter().position(|s| s.name == name).map(NodeId)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.slots.len()).map(NodeId)
    }

    /// Ids of the hierarchy roots, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s.node, SceneNode::Model(_)))
            .map(|(i, _)| NodeId(i))
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.slots.get(id.0).is_some_and(|s| s.visible)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), SceneError> {
        let slot = self.slots.get_mut(id.0).ok_or(SceneError::UnknownNode(id))?;
        slot.visible = visible;
        Ok(())
    }

    /// Mount `child` under `parent`, refusing moves that would form a cycle.
    pub fn reparent(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        self.slot(parent)?;
        if !matches!(self.slot(child)?.node, SceneNode::Assembly(_)) {
            return Err(SceneError::NotAnAssembly(child));
        }
        if self.ancestry_contains(parent, child)? {
            return Err(SceneError::Cycle { child, parent });
        }
        if let Some(SceneNode::Assembly(a)) = self.get_mut(child) {
            a.set_parent(parent);
        }
        tracing::debug!(?child, ?parent, "reparented scene node");
        Ok(())
    }

    /// Whether `needle` is `start` or one of its ancestors.
    fn ancestry_contains(&self, start: NodeId, needle: NodeId) -> Result<bool, SceneError> {
        let mut cursor = start;
        for _ in 0..=self.slots.len() {
            if cursor == needle {
                return Ok(true);
            }
            match self.slot(cursor)?.node.parent() {
                Some(p) => cursor = p,
                None => return Ok(false),
            }
        }
        Err(SceneError::Cycle {
            child: needle,
            parent: start,
        })
    }

    /// Check every parent link resolves and every chain ends at a root.
    pub fn validate(&self) -> Result<(), SceneError> {
        for id in self.ids() {
            let Some(parent) = self.slot(id)?.node.parent() else {
                continue;
            };
            if self.ancestry_contains(parent, id)? {
                return Err(SceneError::Cycle { child: id, parent });
            }
        }
        Ok(())
    }

    /// Resolve a node's placement by walking up to its root.
    ///
    /// A root yields its own `(model_matrix, world_matrix)`. A child yields
    /// `(parent_local * model_matrix, root_world)`, where `parent_local` is
    /// the parent's resolved local pose.
    pub fn place(&self, id: NodeId) -> Result<Placement, SceneError> {
        let mut local = *self.slot(id)?.node.model_matrix();
        let mut cursor = id;
        for _ in 0..=self.slots.len() {
            match &self.slot(cursor)?.node {
                SceneNode::Model(m) => {
                    if cursor != id {
                        local = m.model_matrix * local;
                    }
                    return Ok(Placement {
                        model: local,
                        world: m.world_matrix,
                    });
                }
                SceneNode::Assembly(a) => {
                    if cursor != id {
                        local = a.model_matrix * local;
                    }
                    cursor = a.parent();
                }
            }
        }
        Err(SceneError::Cycle {
            child: id,
            parent: cursor,
        })
    }

    /// Effective transform `world * model` of a node.
    pub fn pose(&self, id: NodeId) -> Result<Matrix4, SceneError> {
        Ok(self.place(id)?.pose())
    }

    /// Where the node's local origin lands in world space.
    pub fn origin(&self, id: NodeId) -> Result<Vector3, SceneError> {
        Ok(self.pose(id)?.multiply_vector3(&Vector3::ZERO))
    }

    /// Translation of the node's root world matrix; what the camera aims at
    /// when focusing on the node.
    pub fn focus_point(&self, id: NodeId) -> Result<Vector3, SceneError> {
        Ok(self.place(id)?.world.translation())
    }

    pub fn draw_params(&self, id: NodeId) -> Result<DrawParams, SceneError> {
        let node = &self.slot(id)?.node;
        let placement = self.place(id)?;
        Ok(DrawParams {
            node: id,
            model: placement.model,
            world: placement.world,
            normal_matrix: placement.pose().normal_matrix(),
            range: node.vertex_range(),
            lighting: node.lighting(),
        })
    }

    /// Draw parameters of every visible node, in insertion order.
    pub fn draw_list(&self) -> Result<Vec<DrawParams>, SceneError> {
        let draws = self
            .ids()
            .filter(|id| self.is_visible(*id))
            .map(|id| self.draw_params(id))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::trace!(nodes = self.len(), drawn = draws.len(), "draw list resolved");
        Ok(draws)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{Lighting, SceneObject};

    fn object() -> Arc<SceneObject> {
        Arc::new(SceneObject::from_mesh(vec![0.0; 9]).unwrap())
    }

    fn translation(x: f32, y: f32, z: f32) -> Matrix4 {
        let mut m = Matrix4::new();
        m.set_translate(x, y, z);
        m
    }

    fn rotation(angle: f32) -> Matrix4 {
        let mut m = Matrix4::new();
        m.set_rotate(angle, 0.0, 0.0, 1.0);
        m
    }

    fn root(graph: &mut SceneGraph, model: Matrix4, world: Matrix4) -> NodeId {
        let mut m = Model::new(0, object(), Lighting::unlit()).unwrap();
        m.model_matrix = model;
        m.world_matrix = world;
        graph.add_model("root", m)
    }

    fn child(graph: &mut SceneGraph, parent: NodeId, model: Matrix4) -> NodeId {
        let mut a = AssemblyNode::new(9, object(), parent, Lighting::unlit()).unwrap();
        a.model_matrix = model;
        graph.add_assembly("child", a).unwrap()
    }

    #[test]
    fn root_places_itself() {
        let mut g = SceneGraph::new();
        let r = root(&mut g, translation(1.0, 0.0, 0.0), rotation(30.0));
        let p = g.place(r).unwrap();
        assert_eq!(p.model, translation(1.0, 0.0, 0.0));
        assert_eq!(p.world, rotation(30.0));
    }

    #[test]
    fn child_composes_parent_model() {
        let (t1, t2, t3) = (translation(1.0, 2.0, 3.0), rotation(45.0), rotation(10.0));
        let mut g = SceneGraph::new();
        let m = root(&mut g, t1, t2);
        let a = child(&mut g, m, t3);

        let p = g.place(a).unwrap();
        assert!(p.model.nearly_equals(&(t1 * t3), Matrix4::TOLERANCE));
        assert_eq!(p.world, t2);
        assert!(p.pose().nearly_equals(&(t2 * t1 * t3), Matrix4::TOLERANCE));
    }

    #[test]
    fn grandchild_recurses_through_assemblies() {
        let (t1, t2, t3, t4) = (
            translation(0.0, 1.0, 0.0),
            translation(5.0, 0.0, 0.0),
            rotation(90.0),
            translation(2.0, 0.0, 0.0),
        );
        let mut g = SceneGraph::new();
        let m = root(&mut g, t1, t2);
        let a = child(&mut g, m, t3);
        let b = child(&mut g, a, t4);

        let p = g.place(b).unwrap();
        assert!(p.model.nearly_equals(&(t1 * t3 * t4), Matrix4::TOLERANCE));
        assert_eq!(p.world, t2);

        let origin = g.origin(b).unwrap();
        assert!(origin.nearly_equals(&Vector3::new(5.0, 3.0, 0.0), 1e-5));
        assert_eq!(g.focus_point(b).unwrap(), Vector3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn placement_tracks_parent_animation() {
        let mut g = SceneGraph::new();
        let m = root(&mut g, Matrix4::new(), Matrix4::new());
        let a = child(&mut g, m, translation(1.0, 0.0, 0.0));

        if let Some(world) = g.get_mut(m).and_then(SceneNode::world_matrix_mut) {
            world.translate(0.0, 10.0, 0.0);
        }
        assert_eq!(g.origin(a).unwrap(), Vector3::new(1.0, 10.0, 0.0));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut g = SceneGraph::new();
        let a = AssemblyNode::new(0, object(), NodeId(7), Lighting::unlit()).unwrap();
        assert_eq!(
            g.add_assembly("orphan", a).unwrap_err(),
            SceneError::UnknownNode(NodeId(7))
        );
    }

    #[test]
    fn reparent_refuses_cycles() {
        let mut g = SceneGraph::new();
        let m = root(&mut g, Matrix4::new(), Matrix4::new());
        let a = child(&mut g, m, Matrix4::new());
        let b = child(&mut g, a, Matrix4::new());

        assert_eq!(
            g.reparent(a, b).unwrap_err(),
            SceneError::Cycle { child: a, parent: b }
        );
        assert!(g.reparent(a, a).is_err());
        assert_eq!(g.reparent(m, a).unwrap_err(), SceneError::NotAnAssembly(m));

        let other = root(&mut g, Matrix4::new(), translation(0.0, 0.0, 4.0));
        g.reparent(b, other).unwrap();
        assert_eq!(g.get(b).and_then(SceneNode::parent), Some(other));
        g.validate().unwrap();
    }

    #[test]
    fn draw_list_skips_hidden_nodes() {
        let mut g = SceneGraph::new();
        let m = root(&mut g, Matrix4::new(), Matrix4::new());
        let a = child(&mut g, m, Matrix4::new());
        g.set_visible(m, false).unwrap();

        let draws = g.draw_list().unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].node, a);
        assert_eq!(draws[0].range.first, 3);
        assert_eq!(draws[0].range.count, 3);
    }

    #[test]
    fn normal_matrix_is_inverse_transpose_of_pose() {
        let mut scale = Matrix4::new();
        scale.set_scale(1.0, 4.0, 1.0);
        let mut g = SceneGraph::new();
        let m = root(&mut g, scale, translation(3.0, 0.0, 0.0));
        let d = g.draw_params(m).unwrap();
        assert!((d.normal_matrix[5] - 0.25).abs() < 1e-6);
        assert!(d.normal_matrix[12].abs() < 1e-6);
        assert!((d.normal_matrix[3] + 3.0).abs() < 1e-5);
    }

    #[test]
    fn lookup_by_name_and_roots() {
        let mut g = SceneGraph::new();
        let m = root(&mut g, Matrix4::new(), Matrix4::new());
        let _a = child(&mut g, m, Matrix4::new());
        assert_eq!(g.find("root"), Some(m));
        assert_eq!(g.roots().collect::<Vec<_>>(), vec![m]);
        assert_eq!(g.name(m), Some("root"));
    }
}
