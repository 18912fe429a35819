use std::fmt::Write;

use crate::Frame;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads a captured frame and produces output. It never sees the
/// scene graph, so drawing cannot feed back into scene state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&self, frame: &Frame) -> Self::Output;
}

/// Produces a human-readable listing of a frame. Used for CLI output and
/// for testing the render interface without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also print each draw's composed pose.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &Frame) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame (shading={}, draws={}, in view={}, vertices={}) ===",
            frame.shading,
            frame.draws.len(),
            frame.visible_count(),
            frame.vertex_count()
        );
        let _ = writeln!(out, "Eye: {}", frame.eye);
        let _ = writeln!(out, "Light: {}", frame.light);

        for draw in &frame.draws {
            let ndc = match draw.ndc {
                Some(p) => format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z),
                None => "behind".to_string(),
            };
            let _ = writeln!(
                out,
                "  [{}] vertices {}..{} lit={} spec={:.1} ndc={}",
                draw.name,
                draw.params.range.first,
                draw.params.range.first + draw.params.range.count,
                draw.params.lighting.use_lighting(),
                draw.spec_power,
                ndc
            );
            if self.verbose {
                let pose = draw.params.world * draw.params.model;
                for line in pose.to_string().lines() {
                    let _ = writeln!(out, "      {line}");
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ShadingModel;
    use tidescape_algebra::{Matrix4, Vector3};
    use tidescape_scene::{Lighting, Model, SceneGraph, SceneObject};

    fn frame(graph: &SceneGraph, shading: ShadingModel) -> Frame {
        Frame::capture(graph, &Matrix4::new(), &Matrix4::new(), Vector3::ZERO, shading).unwrap()
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let output = DebugTextRenderer::new().render(&frame(&SceneGraph::new(), ShadingModel::Gooch));
        assert!(output.contains("shading=gooch"));
        assert!(output.contains("draws=0"));
    }

    #[test]
    fn debug_renderer_lists_draws() {
        let mut g = SceneGraph::new();
        let object = Arc::new(SceneObject::from_mesh(vec![0.0; 9]).unwrap());
        let lit = Lighting::new(true, 4.0, Vector3::new(1.0, 1.0, 1.0)).unwrap();
        g.add_model("buoy", Model::new(6, object, lit).unwrap());

        let output = DebugTextRenderer::new().render(&frame(&g, ShadingModel::Mixed));
        assert!(output.contains("draws=1"));
        assert!(output.contains("[buoy] vertices 2..5 lit=true spec=4.0"));
    }

    #[test]
    fn verbose_renderer_prints_pose() {
        let mut g = SceneGraph::new();
        let object = Arc::new(SceneObject::from_mesh(vec![0.0; 9]).unwrap());
        g.add_model("buoy", Model::new(0, object, Lighting::unlit()).unwrap());

        let quiet = DebugTextRenderer::new().render(&frame(&g, ShadingModel::Gooch));
        let loud = DebugTextRenderer::verbose().render(&frame(&g, ShadingModel::Gooch));
        assert!(loud.lines().count() > quiet.lines().count());
    }
}
