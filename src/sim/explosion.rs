//! Particle bursts spawned where a beam meets the boundary
//!
//! Purely visual. An explosion keeps no state beyond its own age and is
//! dropped when the owning beam's collision state resets.

use glam::Vec2;
use rand::Rng;

use crate::consts::{FLASH_DURATION_SECS, SIM_DT};

/// Ease-out timing curve, cubic-bezier(0, 0, 0.58, 1)
pub fn ease_out(t: f32) -> f32 {
    const X2: f32 = 0.58;

    let t = t.clamp(0.0, 1.0);
    if t <= 0.0 || t >= 1.0 {
        return t;
    }

    // x(s) is monotonic on [0, 1]: bisect for the curve parameter
    let bezier_x = |s: f32| 3.0 * (1.0 - s) * s * s * X2 + s * s * s;
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    for _ in 0..24 {
        let mid = (lo + hi) / 2.0;
        if bezier_x(mid) < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let s = (lo + hi) / 2.0;
    3.0 * (1.0 - s) * s * s + s * s * s
}

/// One spark of a burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Final offset from the explosion origin (pixels, y grows downward)
    pub direction: Vec2,
    /// Fade-out duration in seconds
    pub life_secs: f32,
}

impl Particle {
    /// Random spark: x in [-40, 39], y in [-60, -10] (upward), life in [0.5, 2.0]
    pub fn random(rng: &mut impl Rng) -> Self {
        let dx = (rng.random::<f32>() * 80.0 - 40.0).floor();
        let dy = (rng.random::<f32>() * -50.0 - 10.0).floor();
        let life_secs = rng.random::<f32>() * 1.5 + 0.5;
        Self {
            direction: Vec2::new(dx, dy),
            life_secs,
        }
    }

    fn eased(&self, age_secs: f32) -> f32 {
        ease_out(age_secs / self.life_secs)
    }

    /// Offset from origin at `age_secs`
    pub fn offset(&self, age_secs: f32) -> Vec2 {
        self.direction * self.eased(age_secs)
    }

    pub fn opacity(&self, age_secs: f32) -> f32 {
        1.0 - self.eased(age_secs)
    }

    pub fn is_finished(&self, age_secs: f32) -> bool {
        age_secs >= self.life_secs
    }
}

/// A burst at a collision point
#[derive(Debug, Clone)]
pub struct Explosion {
    pub beam_id: u32,
    /// Container-relative position
    pub origin: Vec2,
    pub particles: Vec<Particle>,
    age_ticks: u32,
}

impl Explosion {
    pub fn spawn(beam_id: u32, origin: Vec2, count: usize, rng: &mut impl Rng) -> Self {
        let particles = (0..count).map(|_| Particle::random(rng)).collect();
        Self {
            beam_id,
            origin,
            particles,
            age_ticks: 0,
        }
    }

    pub fn advance(&mut self) {
        self.age_ticks = self.age_ticks.saturating_add(1);
    }

    pub fn age_secs(&self) -> f32 {
        self.age_ticks as f32 * SIM_DT
    }

    /// Flash glow fades in over its duration and then stays lit
    pub fn flash_opacity(&self) -> f32 {
        ease_out(self.age_secs() / FLASH_DURATION_SECS)
    }

    /// True once every particle has faded out
    pub fn particles_finished(&self) -> bool {
        let age = self.age_secs();
        self.particles.iter().all(|p| p.is_finished(age))
    }
}
