//! Deterministic background simulation
//!
//! All animation logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (timers are tick counters)
//! - Seeded RNG only
//! - Stable iteration order (by beam ID)
//! - No rendering or platform dependencies

pub mod beam;
pub mod collision;
pub mod explosion;
pub mod scene;
pub mod tick;

pub use beam::{Beam, BeamConfig, BeamVariant, Length, timeline_progress};
pub use collision::{
    BoundsSource, CollisionDetector, CollisionState, DetectorEvent, DetectorPhase, Rect,
    check_contact,
};
pub use explosion::{Explosion, Particle, ease_out};
pub use scene::{SceneConfig, SceneEvent, SceneGeometry, SceneState, Timing};
pub use tick::{TickInput, tick};
