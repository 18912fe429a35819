use crate::NodeId;

/// Errors from building or walking the scene graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("mesh has no vertices")]
    EmptyMesh,
    #[error("mesh length {0} is not a multiple of 3")]
    RaggedMesh(usize),
    #[error("{attribute} has {found} floats, mesh has {expected}")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("vertex offset {0} does not start a vertex")]
    MisalignedOffset(usize),
    #[error("specular power must be a non-negative number, got {0}")]
    InvalidSpecularPower(f32),
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("node {0:?} is a root model and has no parent")]
    NotAnAssembly(NodeId),
    #[error("parenting {child:?} under {parent:?} would form a cycle")]
    Cycle { child: NodeId, parent: NodeId },
}
