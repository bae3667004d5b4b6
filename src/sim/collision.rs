//! Collision detection between beams and the boundary plane
//!
//! Detection is time-sampled rather than event-driven: every poll interval the
//! detector reads the beam's live bounding box and compares its bottom edge
//! with the boundary's top edge. A beam that travels far enough between two
//! polls is caught late (or, against a thin target, missed entirely). That is
//! fine for a decorative effect.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in container pixel space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }
}

/// Read-only geometry queries a detector polls.
///
/// Any query may come back empty (element not mounted yet, already torn
/// down); the detector skips that poll.
pub trait BoundsSource {
    fn beam_bounds(&self, beam_id: u32) -> Option<Rect>;
    fn boundary_bounds(&self) -> Option<Rect>;
    fn parent_bounds(&self) -> Option<Rect>;
}

/// Pure contact test.
///
/// Returns the contact point relative to `parent`: the beam's horizontal
/// center and its bottom edge.
pub fn check_contact(beam: Rect, boundary: Rect, parent: Rect) -> Option<Vec2> {
    if beam.bottom() >= boundary.top {
        Some(Vec2::new(
            beam.center_x() - parent.left,
            beam.bottom() - parent.top,
        ))
    } else {
        None
    }
}

/// Per-beam collision record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CollisionState {
    pub detected: bool,
    pub coordinates: Option<Vec2>,
}

impl CollisionState {
    pub fn record(&mut self, at: Vec2) {
        self.detected = true;
        self.coordinates = Some(at);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Detector lifecycle within one beam cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectorPhase {
    /// Between cycles, waiting for the next one to begin
    Idle,
    /// Polling for first contact
    Armed,
    /// Contact recorded; waiting out the explosion before resetting
    Cooling { remaining_ticks: u32 },
}

/// What a detector did during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectorEvent {
    /// First contact of the cycle
    Collided { at: Vec2 },
    /// Cooling finished; the collision state has been cleared
    CycleReset,
}

/// Polls one beam against the boundary plane
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    pub beam_id: u32,
    pub phase: DetectorPhase,
    pub state: CollisionState,
    poll_interval_ticks: u32,
    cooldown_ticks: u32,
    /// Ticks until the next poll while armed
    poll_countdown: u32,
}

impl CollisionDetector {
    pub fn new(beam_id: u32, poll_interval_ticks: u32, cooldown_ticks: u32) -> Self {
        Self {
            beam_id,
            phase: DetectorPhase::Idle,
            state: CollisionState::default(),
            poll_interval_ticks: poll_interval_ticks.max(1),
            cooldown_ticks: cooldown_ticks.max(1),
            poll_countdown: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.phase == DetectorPhase::Armed
    }

    /// Advance the detector by one tick
    pub fn advance(&mut self, bounds: &impl BoundsSource) -> Option<DetectorEvent> {
        match self.phase {
            DetectorPhase::Idle => {
                // New cycle: interval timer starts over
                self.phase = DetectorPhase::Armed;
                self.poll_countdown = self.poll_interval_ticks;
                None
            }
            DetectorPhase::Armed => {
                self.poll_countdown = self.poll_countdown.saturating_sub(1);
                if self.poll_countdown > 0 {
                    return None;
                }
                self.poll_countdown = self.poll_interval_ticks;

                let at = self.poll(bounds)?;
                // Detection arms the reset in the same tick
                self.state.record(at);
                self.begin_cooling();
                Some(DetectorEvent::Collided { at })
            }
            DetectorPhase::Cooling { remaining_ticks } => {
                let remaining_ticks = remaining_ticks.saturating_sub(1);
                if remaining_ticks > 0 {
                    self.phase = DetectorPhase::Cooling { remaining_ticks };
                    return None;
                }
                self.state.clear();
                self.phase = DetectorPhase::Idle;
                Some(DetectorEvent::CycleReset)
            }
        }
    }

    /// Sample geometry once. No-op unless armed.
    pub fn poll(&self, bounds: &impl BoundsSource) -> Option<Vec2> {
        if !self.is_armed() || self.state.detected {
            return None;
        }
        let beam = bounds.beam_bounds(self.beam_id)?;
        let boundary = bounds.boundary_bounds()?;
        let parent = bounds.parent_bounds()?;
        check_contact(beam, boundary, parent)
    }

    fn begin_cooling(&mut self) {
        self.phase = DetectorPhase::Cooling {
            remaining_ticks: self.cooldown_ticks,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed geometry with an optional beam
    struct Fixture {
        beam: Option<Rect>,
        boundary: Option<Rect>,
        parent: Option<Rect>,
    }

    impl BoundsSource for Fixture {
        fn beam_bounds(&self, _beam_id: u32) -> Option<Rect> {
            self.beam
        }
        fn boundary_bounds(&self) -> Option<Rect> {
            self.boundary
        }
        fn parent_bounds(&self) -> Option<Rect> {
            self.parent
        }
    }

    fn touching() -> Fixture {
        Fixture {
            beam: Some(Rect::new(100.0, 560.0, 1.0, 56.0)),
            boundary: Some(Rect::new(0.0, 600.0, 800.0, 0.0)),
            parent: Some(Rect::new(0.0, 0.0, 800.0, 600.0)),
        }
    }

    fn run(detector: &mut CollisionDetector, bounds: &Fixture, ticks: u32) -> Vec<DetectorEvent> {
        (0..ticks).filter_map(|_| detector.advance(bounds)).collect()
    }

    #[test]
    fn test_check_contact() {
        let parent = Rect::new(10.0, 20.0, 800.0, 600.0);
        let boundary = Rect::new(10.0, 620.0, 800.0, 0.0);

        let above = Rect::new(110.0, 100.0, 2.0, 56.0);
        assert!(check_contact(above, boundary, parent).is_none());

        // Bottom edge exactly on the plane counts
        let touching = Rect::new(110.0, 564.0, 2.0, 56.0);
        let at = check_contact(touching, boundary, parent).unwrap();
        assert_eq!(at, Vec2::new(101.0, 600.0));
    }

    #[test]
    fn test_first_poll_waits_one_interval() {
        let mut detector = CollisionDetector::new(1, 6, 240);
        let bounds = touching();

        // Idle -> Armed
        assert!(detector.advance(&bounds).is_none());
        assert!(detector.is_armed());

        // Five quiet ticks, sixth polls
        assert!(run(&mut detector, &bounds, 5).is_empty());
        let event = detector.advance(&bounds);
        assert_eq!(
            event,
            Some(DetectorEvent::Collided {
                at: Vec2::new(100.5, 616.0)
            })
        );
        assert!(detector.state.detected);
        assert_eq!(
            detector.phase,
            DetectorPhase::Cooling {
                remaining_ticks: 240
            }
        );
    }

    #[test]
    fn test_single_detection_then_reset_after_cooldown() {
        let mut detector = CollisionDetector::new(1, 6, 240);
        let bounds = touching();

        // Arm + first poll
        let events = run(&mut detector, &bounds, 7);
        assert_eq!(events.len(), 1);

        // Still overlapping for 239 more ticks: no second collision
        assert!(run(&mut detector, &bounds, 239).is_empty());
        assert!(detector.state.detected);

        // Exactly 240 ticks after detection
        assert_eq!(detector.advance(&bounds), Some(DetectorEvent::CycleReset));
        assert_eq!(detector.state, CollisionState::default());
        assert_eq!(detector.phase, DetectorPhase::Idle);
    }

    #[test]
    fn test_missing_reference_skips_poll() {
        let mut detector = CollisionDetector::new(1, 6, 240);
        let mut bounds = touching();
        bounds.parent = None;

        assert!(run(&mut detector, &bounds, 100).is_empty());
        assert!(detector.is_armed());
        assert!(!detector.state.detected);

        // Reference shows up: next poll detects
        bounds.parent = Some(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(run(&mut detector, &bounds, 6).len(), 1);
    }

    #[test]
    fn test_poll_is_noop_while_cooling() {
        let mut detector = CollisionDetector::new(1, 1, 10);
        let bounds = touching();
        run(&mut detector, &bounds, 2);
        assert!(detector.state.detected);
        assert!(detector.poll(&bounds).is_none());
    }

    #[test]
    fn test_no_contact_above_plane() {
        let mut detector = CollisionDetector::new(1, 6, 240);
        let mut bounds = touching();
        bounds.beam = Some(Rect::new(100.0, 0.0, 1.0, 56.0));
        assert!(run(&mut detector, &bounds, 600).is_empty());
    }
}
