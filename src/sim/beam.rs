//! Beam units: falling vertical lines with a looping linear timeline
//!
//! A beam never stores its position. Position is a pure function of the time
//! elapsed since its current cycle began, so the collision detector can sample
//! it at any tick.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::{BEAM_HEIGHT, BEAM_WIDTH, DEFAULT_DURATION_SECS};
use crate::ticks_to_secs;

/// A CSS-like length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Length {
    /// Absolute pixels
    Px(f32),
    /// Percentage of a reference extent (depends on the property)
    Percent(f32),
    /// Percentage of the viewport height
    Vh(f32),
}

impl Length {
    /// Resolve to pixels.
    ///
    /// `percent_basis` is whatever the property's percentages refer to: the
    /// container width for `left`, the element's own size for transforms.
    pub fn resolve(self, percent_basis: f32, viewport_height: f32) -> f32 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => percent_basis * pct / 100.0,
            Length::Vh(vh) => viewport_height * vh / 100.0,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

/// Optional style tag selecting the beam height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamVariant {
    H6,
    H8,
    H10,
    H12,
}

impl BeamVariant {
    pub fn height(&self) -> f32 {
        match self {
            BeamVariant::H6 => 24.0,
            BeamVariant::H8 => 32.0,
            BeamVariant::H10 => 40.0,
            BeamVariant::H12 => 48.0,
        }
    }
}

/// Immutable per-beam configuration, fixed when the scene is composed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    /// Left edge, percentages of the container width
    pub initial_x: Length,
    /// Horizontal translation target, percentages of the beam width
    pub translate_x: Length,
    /// Vertical start translation
    pub initial_y: Length,
    /// Vertical end translation
    pub translate_y: Length,
    pub duration_secs: f32,
    pub delay_secs: f32,
    pub repeat_delay_secs: f32,
    #[serde(default)]
    pub variant: Option<BeamVariant>,
}

impl BeamConfig {
    /// A beam at horizontal offset `x` with default timeline (falls from -100vh to 200vh)
    pub fn at(x: Length) -> Self {
        Self {
            initial_x: x,
            translate_x: x,
            initial_y: Length::Vh(-100.0),
            translate_y: Length::Vh(200.0),
            duration_secs: DEFAULT_DURATION_SECS,
            delay_secs: 0.0,
            repeat_delay_secs: 0.0,
            variant: None,
        }
    }

    pub fn duration(mut self, secs: f32) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn delay(mut self, secs: f32) -> Self {
        self.delay_secs = secs;
        self
    }

    pub fn repeat_delay(mut self, secs: f32) -> Self {
        self.repeat_delay_secs = secs;
        self
    }

    pub fn variant(mut self, variant: BeamVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Beam height in pixels
    pub fn height(&self) -> f32 {
        self.variant.map_or(BEAM_HEIGHT, |v| v.height())
    }
}

/// Animation progress (0 = start, 1 = end) `t` seconds into a cycle.
///
/// Holds at the start during the delay, moves linearly for `duration`, holds
/// at the end for `repeat_delay`, then loops.
pub fn timeline_progress(config: &BeamConfig, t: f32) -> f32 {
    if t < config.delay_secs {
        return 0.0;
    }

    let duration = config.duration_secs;
    // Unvalidated input: treat a degenerate duration as an instant move
    if !duration.is_finite() || duration <= 0.0 {
        return 1.0;
    }

    let period = duration + config.repeat_delay_secs.max(0.0);
    let u = (t - config.delay_secs) % period;
    if u < duration { u / duration } else { 1.0 }
}

/// A single animated beam
#[derive(Debug, Clone)]
pub struct Beam {
    pub id: u32,
    pub config: BeamConfig,
    /// Advances once per completed cycle, forcing a fresh timeline
    pub cycle_key: u32,
    /// Tick at which the current cycle began
    cycle_start: u64,
}

impl Beam {
    pub fn new(id: u32, config: BeamConfig, now: u64) -> Self {
        Self {
            id,
            config,
            cycle_key: 0,
            cycle_start: now,
        }
    }

    /// Seconds since the current cycle began
    pub fn cycle_time(&self, now: u64) -> f32 {
        ticks_to_secs(now.saturating_sub(self.cycle_start))
    }

    pub fn progress(&self, now: u64) -> f32 {
        timeline_progress(&self.config, self.cycle_time(now))
    }

    /// Live bounding box inside `container`
    pub fn bounds(&self, now: u64, container: &Rect) -> Rect {
        let t = self.progress(now);
        let vh = container.height;
        let height = self.config.height();

        // Transform percentages resolve against the element's own box
        let shift_x0 = self.config.initial_x.resolve(BEAM_WIDTH, vh);
        let shift_x1 = self.config.translate_x.resolve(BEAM_WIDTH, vh);
        let left = container.left
            + self.config.initial_x.resolve(container.width, vh)
            + shift_x0
            + (shift_x1 - shift_x0) * t;

        let y0 = self.config.initial_y.resolve(height, vh);
        let y1 = self.config.translate_y.resolve(height, vh);
        let top = container.top + y0 + (y1 - y0) * t;

        Rect::new(left, top, BEAM_WIDTH, height)
    }

    /// Start a new cycle at `now` (timeline restarts, delay included)
    pub fn restart(&mut self, now: u64) {
        self.cycle_key += 1;
        self.cycle_start = now;
    }
}
