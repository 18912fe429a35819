//! Rendering adapter: a frame snapshot and renderer-agnostic output.
//!
//! # Invariants
//! - Renderers read a captured [`Frame`]; they never touch the scene graph.
//! - A frame holds one draw per visible node, in scene insertion order.
//! - Every matrix in a frame is resolved at capture time, so later animation
//!   of the scene does not change an already captured frame.

mod frame;
mod renderer;
mod shading;

pub use frame::{Frame, FrameDraw, ProjectionConfig, RenderError};
pub use renderer::{DebugTextRenderer, Renderer};
pub use shading::ShadingModel;

pub fn crate_info() -> &'static str {
    "tidescape-render v0.1.0"
}
