//! Scene composition and state
//!
//! The scene owns one beam, one detector and at most one live explosion per
//! configured beam, plus the container and boundary geometry they share.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::beam::{Beam, BeamConfig, BeamVariant, Length};
use super::collision::{BoundsSource, CollisionDetector, Rect};
use super::explosion::Explosion;
use crate::consts::{COOLDOWN_MS, PARTICLE_COUNT, POLL_INTERVAL_MS};
use crate::ms_to_ticks;

/// Detector timing, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub poll_interval_ms: u32,
    pub cooldown_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            poll_interval_ms: POLL_INTERVAL_MS,
            cooldown_ms: COOLDOWN_MS,
        }
    }
}

/// Immutable scene configuration table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub beams: Vec<BeamConfig>,
    /// Height of the boundary bar along the container's bottom edge
    pub boundary_height: f32,
    #[serde(default)]
    pub timing: Timing,
}

impl SceneConfig {
    /// The ten reference beams spread across the width
    pub fn reference() -> Self {
        use Length::{Percent, Px};

        let beams = vec![
            BeamConfig::at(Px(10.0)).duration(7.0).repeat_delay(3.0).delay(2.0),
            BeamConfig::at(Percent(20.0)).duration(5.0).repeat_delay(2.0),
            BeamConfig::at(Percent(40.0)).duration(6.0).repeat_delay(4.0).delay(1.0),
            BeamConfig::at(Percent(60.0)).duration(7.0).repeat_delay(2.0).delay(3.0),
            BeamConfig::at(Percent(80.0))
                .duration(5.0)
                .repeat_delay(3.0)
                .delay(2.0)
                .variant(BeamVariant::H8),
            BeamConfig::at(Percent(90.0)).duration(8.0).repeat_delay(3.0).delay(1.0),
            BeamConfig::at(Percent(30.0))
                .duration(9.0)
                .repeat_delay(4.0)
                .delay(4.0)
                .variant(BeamVariant::H10),
            BeamConfig::at(Percent(70.0))
                .duration(6.0)
                .repeat_delay(5.0)
                .variant(BeamVariant::H6),
            BeamConfig::at(Percent(15.0))
                .duration(7.0)
                .repeat_delay(2.0)
                .delay(3.0)
                .variant(BeamVariant::H12),
            BeamConfig::at(Percent(45.0)).duration(8.0).repeat_delay(3.0).delay(2.0),
        ];

        Self {
            beams,
            boundary_height: 0.0,
            timing: Timing::default(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::reference()
    }
}

/// Scene-level notifications, drained by the driver each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    Collision { beam_id: u32, at: Vec2 },
    CycleReset { beam_id: u32, cycle_key: u32 },
}

/// Live geometry view over the scene at one instant
pub struct SceneGeometry<'a> {
    pub beams: &'a [Beam],
    pub container: Rect,
    pub boundary: Rect,
    pub now: u64,
}

impl BoundsSource for SceneGeometry<'_> {
    fn beam_bounds(&self, beam_id: u32) -> Option<Rect> {
        self.beams
            .iter()
            .find(|b| b.id == beam_id)
            .map(|b| b.bounds(self.now, &self.container))
    }

    fn boundary_bounds(&self) -> Option<Rect> {
        Some(self.boundary)
    }

    fn parent_bounds(&self) -> Option<Rect> {
        Some(self.container)
    }
}

/// Complete scene state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct SceneState {
    pub config: SceneConfig,
    /// Shared positioned container (fills the viewport)
    pub container: Rect,
    /// Collision plane along the container's bottom edge
    pub boundary: Rect,
    /// Beams (sorted by id)
    pub beams: Vec<Beam>,
    /// Detectors (sorted by beam id, one per beam)
    pub detectors: Vec<CollisionDetector>,
    /// Live explosions (at most one per beam)
    pub explosions: Vec<Explosion>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paused: bool,
    /// Events since the last drain
    pub events: Vec<SceneEvent>,
    pub(crate) rng: Pcg32,
}

impl SceneState {
    /// Compose a scene filling a `width` x `height` viewport
    pub fn new(config: SceneConfig, width: f32, height: f32, seed: u64) -> Self {
        let container = Rect::new(0.0, 0.0, width, height);
        let boundary = boundary_rect(&container, config.boundary_height);

        let poll = ms_to_ticks(config.timing.poll_interval_ms);
        let cooldown = ms_to_ticks(config.timing.cooldown_ms);

        let mut beams = Vec::with_capacity(config.beams.len());
        let mut detectors = Vec::with_capacity(config.beams.len());
        for (i, beam_config) in config.beams.iter().enumerate() {
            let id = i as u32 + 1;
            beams.push(Beam::new(id, beam_config.clone(), 0));
            detectors.push(CollisionDetector::new(id, poll, cooldown));
        }

        log::info!(
            "Scene composed: {} beams, {}x{} viewport, seed {}",
            beams.len(),
            width,
            height,
            seed
        );

        Self {
            config,
            container,
            boundary,
            beams,
            detectors,
            explosions: Vec::new(),
            time_ticks: 0,
            paused: false,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reference scene
    pub fn reference(width: f32, height: f32, seed: u64) -> Self {
        Self::new(SceneConfig::reference(), width, height, seed)
    }

    /// Viewport changed size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.container = Rect::new(self.container.left, self.container.top, width, height);
        self.boundary = boundary_rect(&self.container, self.config.boundary_height);
    }

    pub fn geometry(&self) -> SceneGeometry<'_> {
        SceneGeometry {
            beams: &self.beams,
            container: self.container,
            boundary: self.boundary,
            now: self.time_ticks,
        }
    }

    pub fn beam(&self, id: u32) -> Option<&Beam> {
        self.beams.iter().find(|b| b.id == id)
    }

    pub fn detector(&self, beam_id: u32) -> Option<&CollisionDetector> {
        self.detectors.iter().find(|d| d.beam_id == beam_id)
    }

    pub fn explosion(&self, beam_id: u32) -> Option<&Explosion> {
        self.explosions.iter().find(|e| e.beam_id == beam_id)
    }

    /// Tear down a beam along with its detector and explosion
    pub fn remove_beam(&mut self, id: u32) -> bool {
        let before = self.beams.len();
        self.beams.retain(|b| b.id != id);
        self.detectors.retain(|d| d.beam_id != id);
        self.explosions.retain(|e| e.beam_id != id);
        self.beams.len() != before
    }

    pub(crate) fn spawn_explosion(&mut self, beam_id: u32, at: Vec2) {
        let explosion = Explosion::spawn(beam_id, at, PARTICLE_COUNT, &mut self.rng);
        self.explosions.retain(|e| e.beam_id != beam_id);
        self.explosions.push(explosion);
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure deterministic iteration order
    pub fn normalize_order(&mut self) {
        self.beams.sort_by_key(|b| b.id);
        self.detectors.sort_by_key(|d| d.beam_id);
        self.explosions.sort_by_key(|e| e.beam_id);
    }
}

fn boundary_rect(container: &Rect, height: f32) -> Rect {
    Rect::new(
        container.left,
        container.bottom() - height,
        container.width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_scene() {
        let scene = SceneState::reference(1280.0, 720.0, 1);
        assert_eq!(scene.beams.len(), 10);
        assert_eq!(scene.detectors.len(), 10);
        assert!(scene.explosions.is_empty());
        assert_eq!(scene.boundary.top, 720.0);
        assert_eq!(scene.boundary.width, 1280.0);

        // Detector per beam, matching ids
        for (beam, detector) in scene.beams.iter().zip(&scene.detectors) {
            assert_eq!(beam.id, detector.beam_id);
        }
    }

    #[test]
    fn test_reference_table_values() {
        let config = SceneConfig::reference();
        assert_eq!(config.beams[0].initial_x, Length::Px(10.0));
        assert_eq!(config.beams[4].variant, Some(BeamVariant::H8));
        assert_eq!(config.beams[7].repeat_delay_secs, 5.0);
        assert_eq!(config.beams[6].delay_secs, 4.0);
        assert!(config.beams.iter().all(|b| b.translate_y == Length::Vh(200.0)));
    }

    #[test]
    fn test_geometry_lookup() {
        let scene = SceneState::reference(1000.0, 800.0, 1);
        let geometry = scene.geometry();
        assert!(geometry.beam_bounds(1).is_some());
        assert!(geometry.beam_bounds(99).is_none());
        assert_eq!(geometry.parent_bounds(), Some(scene.container));
    }

    #[test]
    fn test_resize_moves_boundary() {
        let mut scene = SceneState::reference(1000.0, 800.0, 1);
        scene.resize(500.0, 400.0);
        assert_eq!(scene.boundary.top, 400.0);
        assert_eq!(scene.boundary.width, 500.0);
    }

    #[test]
    fn test_remove_beam_tears_down_pair() {
        let mut scene = SceneState::reference(1000.0, 800.0, 1);
        scene.spawn_explosion(3, Vec2::new(10.0, 10.0));
        assert!(scene.remove_beam(3));
        assert!(scene.beam(3).is_none());
        assert!(scene.detector(3).is_none());
        assert!(scene.explosion(3).is_none());
        assert!(!scene.remove_beam(3));
    }

    #[test]
    fn test_config_json_defaults_timing() {
        let json = r#"{"beams":[],"boundary_height":4.0}"#;
        let config: SceneConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.timing, Timing::default());
    }
}
