/// Errors raised by geometric constructors handed meaningless input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlgebraError {
    #[error("degenerate {projection}: zero {axis} extent")]
    EmptyExtent {
        projection: &'static str,
        axis: &'static str,
    },
    #[error("near and far must be positive (near={near}, far={far})")]
    NonPositiveClip { near: f32, far: f32 },
    #[error("aspect ratio must be non-zero")]
    ZeroAspect,
    #[error("field of view {0} degrees has a zero half-angle sine")]
    ZeroFieldOfView(f32),
    #[error("interpolation parameter {0} outside [0, 1]")]
    InterpolantOutOfRange(f32),
    #[error("expected {expected} elements, found {found}")]
    ElementCount { expected: usize, found: usize },
}
