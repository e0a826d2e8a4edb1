//! Rendering boundary
//!
//! The simulation never touches a graphics API. Each frame it is turned into
//! a list of [`DrawCommand`]s that an external [`RenderSink`] draws.

pub mod quad;
pub mod scene;

pub use quad::{DrawCommand, QuadInstance, colors, instance_bytes};
pub use scene::{build_frame, cursor_texture, lamp_color, textures};

/// Consumer of finished frames (GPU backend, recorder, headless counter...)
pub trait RenderSink {
    /// Draw one frame. Resource failures are the sink's to log and absorb.
    fn submit(&mut self, frame: &[DrawCommand]);
}

/// Sink that draws nothing and remembers how much it was asked to draw
#[derive(Debug, Default)]
pub struct HeadlessSink {
    pub frames: u64,
    pub last_quads: usize,
}

impl RenderSink for HeadlessSink {
    fn submit(&mut self, frame: &[DrawCommand]) {
        self.frames += 1;
        self.last_quads = frame.len();
        log::trace!("frame {}: {} quads", self.frames, frame.len());
    }
}
