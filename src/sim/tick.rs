//! Fixed timestep simulation tick
//!
//! Advances the scene deterministically. Every timer (detector polls, the
//! post-collision cooldown, explosion ages) is a tick counter, so dropping a
//! beam also drops its timers.

use super::collision::DetectorEvent;
use super::scene::{SceneEvent, SceneGeometry, SceneState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
    /// New viewport size (width, height)
    pub resize: Option<(f32, f32)>,
}

/// Advance the scene by one fixed timestep
pub fn tick(state: &mut SceneState, input: &TickInput) {
    if let Some((width, height)) = input.resize {
        state.resize(width, height);
    }

    if input.pause {
        state.paused = !state.paused;
        log::info!("Scene {}", if state.paused { "paused" } else { "resumed" });
    }
    if state.paused {
        return;
    }

    state.time_ticks += 1;
    let now = state.time_ticks;

    for explosion in &mut state.explosions {
        explosion.advance();
    }

    // Poll every detector against the geometry at this instant
    let mut collisions = Vec::new();
    let mut resets = Vec::new();
    {
        let geometry = SceneGeometry {
            beams: &state.beams,
            container: state.container,
            boundary: state.boundary,
            now,
        };
        for detector in &mut state.detectors {
            match detector.advance(&geometry) {
                Some(DetectorEvent::Collided { at }) => collisions.push((detector.beam_id, at)),
                Some(DetectorEvent::CycleReset) => resets.push(detector.beam_id),
                None => {}
            }
        }
    }

    for (beam_id, at) in collisions {
        log::debug!("Beam {} hit boundary at ({:.1}, {:.1})", beam_id, at.x, at.y);
        state.spawn_explosion(beam_id, at);
        state.events.push(SceneEvent::Collision { beam_id, at });
    }

    for beam_id in resets {
        // Explosion unmounts with the collision state
        state.explosions.retain(|e| e.beam_id != beam_id);
        if let Some(beam) = state.beams.iter_mut().find(|b| b.id == beam_id) {
            beam.restart(now);
            log::debug!("Beam {} starting cycle {}", beam_id, beam.cycle_key);
            state.events.push(SceneEvent::CycleReset {
                beam_id,
                cycle_key: beam.cycle_key,
            });
        }
    }

    // Ensure deterministic ordering
    state.normalize_order();
}
