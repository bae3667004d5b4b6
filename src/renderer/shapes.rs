//! Shape generation for 2D primitives
//!
//! All positions are container pixels (y down); the pipeline maps them to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors, fade, hex};
use crate::consts::{FLASH_HEIGHT, FLASH_WIDTH, PARTICLE_SIZE};
use crate::settings::Settings;
use crate::sim::{Explosion, Rect, SceneState};

/// Quad with a vertical gradient
pub fn quad_vertical(rect: Rect, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let (l, r, t, b) = (rect.left, rect.right(), rect.top, rect.bottom());
    vec![
        Vertex::new(l, t, top),
        Vertex::new(l, b, bottom),
        Vertex::new(r, t, top),
        Vertex::new(r, t, top),
        Vertex::new(l, b, bottom),
        Vertex::new(r, b, bottom),
    ]
}

/// Quad with a horizontal gradient
pub fn quad_horizontal(rect: Rect, left: [f32; 4], right: [f32; 4]) -> Vec<Vertex> {
    let (l, r, t, b) = (rect.left, rect.right(), rect.top, rect.bottom());
    vec![
        Vertex::new(l, t, left),
        Vertex::new(l, b, left),
        Vertex::new(r, t, right),
        Vertex::new(r, t, right),
        Vertex::new(l, b, left),
        Vertex::new(r, b, right),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Beam line: transparent tail, purple middle, indigo head
pub fn beam(rect: Rect) -> Vec<Vertex> {
    let mid = rect.top + rect.height / 2.0;
    let tail = Rect::new(rect.left, rect.top, rect.width, mid - rect.top);
    let head = Rect::new(rect.left, mid, rect.width, rect.bottom() - mid);

    let mut vertices = quad_vertical(tail, hex(colors::PURPLE, 0.0), hex(colors::PURPLE, 1.0));
    vertices.extend(quad_vertical(
        head,
        hex(colors::PURPLE, 1.0),
        hex(colors::INDIGO, 1.0),
    ));
    vertices
}

/// Explosion: horizontal glow plus fading sparks
pub fn explosion(
    explosion: &Explosion,
    container: &Rect,
    settings: &Settings,
) -> Vec<Vertex> {
    let origin = Vec2::new(container.left, container.top) + explosion.origin;
    let age = explosion.age_secs();
    let mut vertices = Vec::new();

    if settings.effective_flash() {
        let alpha = explosion.flash_opacity();
        let half = FLASH_WIDTH / 2.0;
        let glow = hex(colors::INDIGO, 1.0);
        let left = Rect::new(origin.x - half, origin.y - FLASH_HEIGHT / 2.0, half, FLASH_HEIGHT);
        let right = Rect::new(origin.x, left.top, half, FLASH_HEIGHT);
        vertices.extend(quad_horizontal(left, fade(glow, 0.0), fade(glow, alpha)));
        vertices.extend(quad_horizontal(right, fade(glow, alpha), fade(glow, 0.0)));
    }

    if settings.effective_particles() {
        let segments = settings.quality.circle_segments();
        for (i, particle) in explosion.particles.iter().enumerate() {
            if particle.is_finished(age) {
                continue;
            }
            // Alternate the gradient ends across sparks
            let base = if i % 2 == 0 { colors::INDIGO } else { colors::PURPLE };
            let color = hex(base, particle.opacity(age));
            vertices.extend(circle(
                origin + particle.offset(age),
                PARTICLE_SIZE / 2.0,
                color,
                segments,
            ));
        }
    }

    vertices
}

/// Build the full frame for a scene
pub fn scene(state: &SceneState, settings: &Settings) -> Vec<Vertex> {
    let container = state.container;

    let (top, bottom) = if settings.quality.gradient_enabled() {
        (
            hex(colors::BACKGROUND_TOP, 1.0),
            hex(colors::BACKGROUND_BOTTOM, 1.0),
        )
    } else {
        let flat = hex(colors::BACKGROUND_TOP, 1.0);
        (flat, flat)
    };
    let mut vertices = quad_vertical(container, top, bottom);

    if settings.beams {
        for b in &state.beams {
            let rect = b.bounds(state.time_ticks, &container);
            // Cull beams outside the container
            if rect.bottom() < container.top || rect.top > container.bottom() {
                continue;
            }
            vertices.extend(beam(rect));
        }

        for e in &state.explosions {
            vertices.extend(explosion(e, &container, settings));
        }
    }

    // Boundary plane, at least a hairline
    let boundary = Rect::new(
        state.boundary.left,
        state.boundary.top - 1.0,
        state.boundary.width,
        state.boundary.height.max(1.0),
    );
    let edge = hex(colors::BOUNDARY, 0.08);
    vertices.extend(quad_vertical(boundary, edge, edge));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PARTICLE_COUNT;
    use crate::sim::{TickInput, tick};

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 2.0, [1.0; 4], 8).len(), 24);
    }

    #[test]
    fn test_beam_gradient() {
        let vertices = beam(Rect::new(10.0, 0.0, 1.0, 56.0));
        assert_eq!(vertices.len(), 12);
        // Tail fully transparent, head opaque
        assert_eq!(vertices[0].color[3], 0.0);
        assert_eq!(vertices[11].color[3], 1.0);
        assert_eq!(vertices[11].position, [11.0, 56.0]);
    }

    #[test]
    fn test_empty_scene_has_background_and_boundary() {
        let state = SceneState::reference(800.0, 600.0, 1);
        // All beams start above the viewport
        let vertices = scene(&state, &Settings::default());
        assert_eq!(vertices.len(), 12);
    }

    #[test]
    fn test_explosion_mesh_respects_settings() {
        let mut state = SceneState::reference(800.0, 600.0, 1);
        state.spawn_explosion(1, Vec2::new(100.0, 600.0));
        let e = &state.explosions[0];

        let full = explosion(e, &state.container, &Settings::default());
        let per_circle = 3 * Settings::default().quality.circle_segments() as usize;
        assert_eq!(full.len(), 12 + PARTICLE_COUNT * per_circle);

        let calm = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(explosion(e, &state.container, &calm).is_empty());
    }

    #[test]
    fn test_beams_toggle() {
        let mut state = SceneState::reference(800.0, 600.0, 1);
        let input = TickInput::default();
        for _ in 0..(120 * 4) {
            tick(&mut state, &input);
        }
        let on = scene(&state, &Settings::default()).len();
        let off = scene(
            &state,
            &Settings {
                beams: false,
                ..Default::default()
            },
        )
        .len();
        assert!(on > off);
        assert_eq!(off, 12);
    }
}
