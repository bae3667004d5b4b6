//! Beam Calc - geometry calculators over an animated beam background
//!
//! Core modules:
//! - `sim`: Deterministic background simulation (beams, collisions, explosions)
//! - `calculator`: Shape formulas and form input parsing
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Visual preferences persisted in LocalStorage

pub mod calculator;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use calculator::{CalculatorForm, InputError, Shape};
pub use settings::{QualityPreset, Settings};

/// Scene configuration constants
pub mod consts {
    /// Simulation rate (120 Hz keeps 50 ms polls on a whole tick boundary)
    pub const SIM_HZ: u32 = 120;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Collision detector polling interval
    pub const POLL_INTERVAL_MS: u32 = 50;
    /// Delay between a collision and the beam's next cycle
    pub const COOLDOWN_MS: u32 = 2000;

    /// Beam geometry (w-px, h-14)
    pub const BEAM_WIDTH: f32 = 1.0;
    pub const BEAM_HEIGHT: f32 = 56.0;

    /// Beam timeline defaults when a config leaves them out
    pub const DEFAULT_DURATION_SECS: f32 = 8.0;

    /// Explosion defaults
    pub const PARTICLE_COUNT: usize = 20;
    pub const PARTICLE_SIZE: f32 = 4.0;
    /// Flash fade-in duration
    pub const FLASH_DURATION_SECS: f32 = 1.5;
    pub const FLASH_WIDTH: f32 = 40.0;
    pub const FLASH_HEIGHT: f32 = 8.0;
}

/// Convert a millisecond duration to whole simulation ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = (ms as u64 * consts::SIM_HZ as u64 + 500) / 1000;
    (ticks as u32).max(1)
}

/// Convert simulation ticks to seconds
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 * consts::SIM_DT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(consts::POLL_INTERVAL_MS), 6);
        assert_eq!(ms_to_ticks(consts::COOLDOWN_MS), 240);
        // Never zero, a zero interval would poll forever
        assert_eq!(ms_to_ticks(0), 1);
    }

    #[test]
    fn test_ticks_to_secs() {
        assert!((ticks_to_secs(240) - 2.0).abs() < 1e-5);
    }
}
