//! Draw requests handed to the render sink

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::sim::TextureHandle;

/// One quad to draw, in the same normalized space as pointer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Solid {
        pos: Vec2,
        size: Vec2,
        rotation: f32,
        color: [f32; 4],
    },
    Textured {
        texture: TextureHandle,
        pos: Vec2,
        size: Vec2,
        rotation: f32,
        tint: [f32; 4],
    },
}

impl DrawCommand {
    pub fn solid(pos: Vec2, size: Vec2, color: [f32; 4]) -> Self {
        DrawCommand::Solid {
            pos,
            size,
            rotation: 0.0,
            color,
        }
    }

    pub fn textured(texture: TextureHandle, pos: Vec2, size: Vec2, tint: [f32; 4]) -> Self {
        DrawCommand::Textured {
            texture,
            pos,
            size,
            rotation: 0.0,
            tint,
        }
    }

    /// Set the rotation (radians, counter-clockwise)
    pub fn rotated(mut self, angle: f32) -> Self {
        match &mut self {
            DrawCommand::Solid { rotation, .. } | DrawCommand::Textured { rotation, .. } => {
                *rotation = angle
            }
        }
        self
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            DrawCommand::Solid { pos, .. } | DrawCommand::Textured { pos, .. } => *pos,
        }
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        match self {
            DrawCommand::Solid { .. } => None,
            DrawCommand::Textured { texture, .. } => Some(*texture),
        }
    }

    /// Flatten into GPU instance data
    pub fn to_instance(&self) -> QuadInstance {
        match *self {
            DrawCommand::Solid {
                pos,
                size,
                rotation,
                color,
            } => QuadInstance {
                pos: pos.to_array(),
                size: size.to_array(),
                color,
                rotation,
                texture: QuadInstance::NO_TEXTURE,
                _pad: [0; 2],
            },
            DrawCommand::Textured {
                texture,
                pos,
                size,
                rotation,
                tint,
            } => QuadInstance {
                pos: pos.to_array(),
                size: size.to_array(),
                color: tint,
                rotation,
                texture: texture.0,
                _pad: [0; 2],
            },
        }
    }
}

/// Per-quad instance layout for a renderer that draws one unit quad many times
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    pub pos: [f32; 2],
    pub size: [f32; 2],
    /// Fill color, or tint for textured quads
    pub color: [f32; 4],
    pub rotation: f32,
    /// Texture id, `NO_TEXTURE` for solid fills
    pub texture: u32,
    pub _pad: [u32; 2],
}

impl QuadInstance {
    pub const NO_TEXTURE: u32 = u32::MAX;
}

/// Pack a frame into bytes ready for an instance buffer upload
pub fn instance_bytes(commands: &[DrawCommand]) -> Vec<u8> {
    let instances: Vec<QuadInstance> = commands.iter().map(DrawCommand::to_instance).collect();
    bytemuck::cast_slice(&instances).to_vec()
}

/// Colors for cabinet elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.05, 0.06, 0.08, 1.0];
    pub const CABINET: [f32; 4] = [0.15, 0.68, 0.74, 1.0];
    pub const CABINET_DARK: [f32; 4] = [0.10, 0.24, 0.34, 1.0];
    pub const TRIM: [f32; 4] = [0.38, 0.27, 0.17, 1.0];
    pub const GLASS: [f32; 4] = [0.75, 0.95, 0.98, 0.20];
    pub const GLASS_SHADE: [f32; 4] = [0.08, 0.10, 0.12, 0.18];
    pub const GLASS_BAND: [f32; 4] = [0.12, 0.20, 0.28, 0.45];
    pub const FLOOR_STRIP: [f32; 4] = [0.06, 0.08, 0.10, 0.35];
    pub const PRIZE_BOX: [f32; 4] = [0.12, 0.20, 0.28, 1.0];
    pub const PRIZE_LIP: [f32; 4] = [0.40, 0.50, 0.55, 1.0];
    pub const SLOT_MOUTH: [f32; 4] = [0.96, 0.80, 0.32, 1.0];
    pub const HOLE_TINT: [f32; 4] = [0.9, 0.9, 0.95, 0.85];
    pub const RAIL: [f32; 4] = [0.18, 0.45, 0.75, 1.0];
    pub const ROPE: [f32; 4] = [0.85, 0.85, 0.90, 1.0];
    pub const CLAW_OPEN: [f32; 4] = [0.90, 0.92, 0.96, 1.0];
    pub const CLAW_CLOSED: [f32; 4] = [0.64, 0.66, 0.72, 1.0];
    pub const CLAW_SHADOW: [f32; 4] = [0.08, 0.10, 0.12, 0.35];
    pub const LAMP_HOUSING: [f32; 4] = [0.08, 0.08, 0.10, 1.0];
    pub const LAMP_OFF: [f32; 4] = [0.15, 0.15, 0.15, 1.0];
    pub const LAMP_BLUE: [f32; 4] = [0.2, 0.5, 1.0, 1.0];
    pub const LAMP_GREEN: [f32; 4] = [0.1, 0.9, 0.3, 1.0];
    pub const LAMP_RED: [f32; 4] = [0.95, 0.1, 0.1, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout_is_tight() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 48);
    }

    #[test]
    fn test_solid_instance_has_no_texture() {
        let cmd = DrawCommand::solid(Vec2::new(0.1, 0.2), Vec2::ONE, colors::WHITE).rotated(0.5);
        let inst = cmd.to_instance();
        assert_eq!(inst.texture, QuadInstance::NO_TEXTURE);
        assert_eq!(inst.pos, [0.1, 0.2]);
        assert_eq!(inst.rotation, 0.5);
    }

    #[test]
    fn test_instance_bytes_length() {
        let frame = [
            DrawCommand::solid(Vec2::ZERO, Vec2::ONE, colors::WHITE),
            DrawCommand::textured(TextureHandle(2), Vec2::ZERO, Vec2::ONE, colors::WHITE),
        ];
        let bytes = instance_bytes(&frame);
        assert_eq!(bytes.len(), 2 * std::mem::size_of::<QuadInstance>());
        let stride = std::mem::size_of::<QuadInstance>();
        let second: QuadInstance = bytemuck::pod_read_unaligned(&bytes[stride..]);
        assert_eq!(second.texture, 2);
    }
}
