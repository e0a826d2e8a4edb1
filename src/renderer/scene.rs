//! Frame assembly
//!
//! Turns a [`Simulation`] into an ordered list of quads, back to front.

use glam::Vec2;

use super::quad::{DrawCommand, colors};
use crate::sim::{GameState, LampMode, Simulation, TextureHandle};

/// Non-toy textures the render sink must provide. Toy skins use
/// `TextureHandle(0..TOY_SKINS)`.
pub mod textures {
    use crate::sim::TextureHandle;

    pub const HOLE: TextureHandle = TextureHandle(16);
    pub const CURSOR_TOKEN: TextureHandle = TextureHandle(17);
    pub const CURSOR_LEVER: TextureHandle = TextureHandle(18);
    pub const LABEL: TextureHandle = TextureHandle(19);
}

/// Build the full draw list for the current state
pub fn build_frame(sim: &Simulation) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(48);
    cabinet(sim, &mut out);
    glass_box(sim, &mut out);
    prize_compartment(sim, &mut out);
    token_slot(sim, &mut out);
    hole(sim, &mut out);
    toys(sim, &mut out);
    rope_and_claw(sim, &mut out);
    lamp(sim, &mut out);
    out.push(DrawCommand::textured(
        textures::LABEL,
        Vec2::new(0.0, 0.82),
        Vec2::new(1.6, 0.28),
        colors::WHITE,
    ));
    cursor(sim, &mut out);
    out
}

fn cabinet(sim: &Simulation, out: &mut Vec<DrawCommand>) {
    let t = &sim.tuning;
    out.push(DrawCommand::solid(Vec2::ZERO, Vec2::splat(2.4), colors::BACKGROUND));

    let center = Vec2::new(0.0, t.box_center.y - 0.03);
    let size = t.box_size + Vec2::new(0.24, 0.36);
    out.push(DrawCommand::solid(center, size, colors::CABINET));

    // Side trims
    let trim = 0.08;
    let trim_size = Vec2::new(trim, t.box_size.y + 0.32);
    out.push(DrawCommand::solid(
        Vec2::new(t.box_left() - trim * 0.5, t.box_center.y),
        trim_size,
        colors::TRIM,
    ));
    out.push(DrawCommand::solid(
        Vec2::new(t.box_right() + trim * 0.5, t.box_center.y),
        trim_size,
        colors::TRIM,
    ));

    // Top cover and bottom control deck
    let band = |y: f32, h: f32, color: [f32; 4]| {
        DrawCommand::solid(Vec2::new(center.x, y), Vec2::new(size.x, h), color)
    };
    out.push(band(t.box_top() + 0.16, 0.18, colors::CABINET_DARK));
    out.push(band(t.box_top() + 0.24, 0.04, colors::TRIM));
    out.push(band(t.box_bottom() - 0.18, 0.26, colors::CABINET_DARK));
    out.push(band(t.box_bottom() - 0.28, 0.06, colors::TRIM));
}

fn glass_box(sim: &Simulation, out: &mut Vec<DrawCommand>) {
    let t = &sim.tuning;
    out.push(DrawCommand::solid(t.box_center, t.box_size, colors::GLASS));
    out.push(DrawCommand::solid(t.box_center, t.box_size, colors::GLASS_SHADE));
    out.push(DrawCommand::solid(
        Vec2::new(t.box_center.x, t.box_top() - 0.04),
        Vec2::new(t.box_size.x, 0.04),
        colors::GLASS_BAND,
    ));
    out.push(DrawCommand::solid(
        Vec2::new(t.box_center.x, t.floor_y() - 0.01),
        Vec2::new(t.box_size.x, 0.04),
        colors::FLOOR_STRIP,
    ));
}

fn prize_compartment(sim: &Simulation, out: &mut Vec<DrawCommand>) {
    let prize = &sim.prize;
    out.push(DrawCommand::solid(prize.pos, prize.size, colors::PRIZE_BOX));
    out.push(DrawCommand::solid(
        prize.pos + Vec2::new(0.0, prize.size.y * 0.20),
        Vec2::new(prize.size.x * 1.05, 0.02),
        colors::PRIZE_LIP,
    ));

    if let Some(toy) = sim.prize_toy() {
        let pulse = 0.45 + 0.35 * (prize.pulse_time * 6.0).sin();
        out.push(DrawCommand::solid(
            prize.pos,
            prize.size * 1.15,
            [0.95, 0.95, 0.35, pulse],
        ));
        out.push(DrawCommand::textured(
            toy.texture,
            prize.pos,
            toy.size * 1.1,
            colors::WHITE,
        ));
    }
}

fn token_slot(sim: &Simulation, out: &mut Vec<DrawCommand>) {
    let slot = &sim.token_slot;
    out.push(DrawCommand::solid(slot.pos, slot.size, colors::TRIM));
    out.push(DrawCommand::solid(
        slot.pos + Vec2::new(0.0, 0.01),
        Vec2::new(slot.size.x * 0.75, 0.012),
        colors::SLOT_MOUTH,
    ));
}

fn hole(sim: &Simulation, out: &mut Vec<DrawCommand>) {
    out.push(DrawCommand::textured(
        textures::HOLE,
        sim.hole.center,
        Vec2::splat(sim.hole.radius * 2.0),
        colors::HOLE_TINT,
    ));
}

fn toys(sim: &Simulation, out: &mut Vec<DrawCommand>) {
    for toy in sim.toys.iter().filter(|t| t.active && !t.in_prize()) {
        out.push(DrawCommand::textured(toy.texture, toy.pos, toy.size, colors::WHITE));
    }
}

fn rope_and_claw(sim: &Simulation, out: &mut Vec<DrawCommand>) {
    let t = &sim.tuning;
    let claw = &sim.claw;
    let body = claw.position();

    let rail_y = t.box_top() - 0.04;
    out.push(DrawCommand::solid(
        Vec2::new(t.box_center.x, rail_y),
        Vec2::new(t.box_size.x, 0.03),
        colors::RAIL,
    ));
    out.push(DrawCommand::solid(
        Vec2::new(claw.anchor.x, rail_y - 0.04),
        Vec2::splat(0.08),
        colors::CABINET_DARK,
    ));

    let rope_center = Vec2::new(claw.anchor.x, (claw.anchor.y + body.y) * 0.5);
    out.push(DrawCommand::solid(
        rope_center,
        Vec2::new(0.012, claw.anchor.y - body.y),
        colors::ROPE,
    ));

    let color = if claw.open {
        colors::CLAW_OPEN
    } else {
        colors::CLAW_CLOSED
    };
    out.push(DrawCommand::solid(
        body + Vec2::new(0.01, -0.01),
        claw.size,
        colors::CLAW_SHADOW,
    ));
    out.push(DrawCommand::solid(body, claw.size, color));

    // Jaws splay outward when open
    let jaw_size = Vec2::new(claw.size.x * 0.18, claw.size.y * 0.6);
    let (offset, drop, angle) = if claw.open {
        (claw.size.x * 0.25, jaw_size.y * 0.25, 0.35)
    } else {
        (claw.size.x * 0.25 * 0.6, jaw_size.y * 0.2, 0.05)
    };
    out.push(DrawCommand::solid(body + Vec2::new(-offset, -drop), jaw_size, color).rotated(angle));
    out.push(DrawCommand::solid(body + Vec2::new(offset, -drop), jaw_size, color).rotated(-angle));
}

/// Current lamp color
pub fn lamp_color(sim: &Simulation) -> [f32; 4] {
    match sim.lamp.mode {
        LampMode::Off => colors::LAMP_OFF,
        LampMode::Blue => colors::LAMP_BLUE,
        LampMode::Blink if sim.lamp.blink_on => colors::LAMP_GREEN,
        LampMode::Blink => colors::LAMP_RED,
    }
}

fn lamp(sim: &Simulation, out: &mut Vec<DrawCommand>) {
    let pos = Vec2::new(sim.tuning.box_center.x, sim.tuning.box_top() + 0.18);
    out.push(DrawCommand::solid(pos, Vec2::new(0.16, 0.10), colors::LAMP_HOUSING));
    out.push(DrawCommand::solid(pos, Vec2::new(0.12, 0.08), lamp_color(sim)));
}

/// Cursor texture for the current state: a token while waiting for one, a lever otherwise
pub fn cursor_texture(state: GameState) -> TextureHandle {
    match state {
        GameState::Idle => textures::CURSOR_TOKEN,
        _ => textures::CURSOR_LEVER,
    }
}

fn cursor(sim: &Simulation, out: &mut Vec<DrawCommand>) {
    let texture = cursor_texture(sim.state);
    let (pos, size) = if sim.state == GameState::Idle {
        (sim.pointer, Vec2::splat(0.08))
    } else {
        let size = Vec2::splat(0.10);
        (sim.pointer + size * 0.5, size)
    };
    out.push(DrawCommand::textured(texture, pos, size, colors::WHITE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PointerClick, TickInput, tick};

    fn textured_at(frame: &[DrawCommand], texture: TextureHandle) -> Vec<Vec2> {
        frame
            .iter()
            .filter(|c| c.texture() == Some(texture))
            .map(|c| c.pos())
            .collect()
    }

    #[test]
    fn test_idle_frame_shows_all_toys_and_token_cursor() {
        let sim = Simulation::new(5);
        let frame = build_frame(&sim);
        let toy_quads = frame
            .iter()
            .filter(|c| matches!(c.texture(), Some(TextureHandle(n)) if n < TextureHandle::TOY_SKINS))
            .count();
        assert_eq!(toy_quads, sim.toys.len());
        assert_eq!(frame.last().and_then(|c| c.texture()), Some(textures::CURSOR_TOKEN));
        assert_eq!(lamp_color(&sim), colors::LAMP_OFF);
    }

    #[test]
    fn test_active_frame_uses_lever_and_blue_lamp() {
        let mut sim = Simulation::new(5);
        let input = TickInput {
            clicks: vec![PointerClick::primary(sim.token_slot.pos)],
            ..Default::default()
        };
        tick(&mut sim, &input, 0.01);
        let frame = build_frame(&sim);
        assert_eq!(frame.last().and_then(|c| c.texture()), Some(textures::CURSOR_LEVER));
        assert_eq!(lamp_color(&sim), colors::LAMP_BLUE);
    }

    #[test]
    fn test_prize_toy_drawn_in_compartment() {
        let mut sim = Simulation::new(5);
        sim.toys[1].state = crate::sim::ToyState::InPrize;
        sim.toys[1].pos = sim.prize.pos;
        sim.prize.toy = Some(1);

        let frame = build_frame(&sim);
        let skin = sim.toys[1].texture;
        let positions = textured_at(&frame, skin);
        // Toy 1's skin appears once in the compartment, never in the play area
        assert!(positions.contains(&sim.prize.pos));
        let play_area_copies = sim
            .toys
            .iter()
            .enumerate()
            .filter(|(i, t)| *i != 1 && t.texture == skin)
            .count();
        assert_eq!(positions.len(), play_area_copies + 1);
    }

    #[test]
    fn test_blink_alternates_colors() {
        let mut sim = Simulation::new(5);
        sim.lamp.mode = LampMode::Blink;
        sim.lamp.blink_on = true;
        assert_eq!(lamp_color(&sim), colors::LAMP_GREEN);
        sim.lamp.blink_on = false;
        assert_eq!(lamp_color(&sim), colors::LAMP_RED);
    }
}
