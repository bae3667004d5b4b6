//! Visual settings and preferences
//!
//! Persisted in LocalStorage on the web build.

use serde::{Deserialize, Serialize};

use crate::consts::{COOLDOWN_MS, POLL_INTERVAL_MS};
use crate::sim::Timing;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Next preset in the Low -> Medium -> High cycle
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Triangle fan segments per particle circle
    pub fn circle_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 4,
            QualityPreset::Medium => 8,
            QualityPreset::High => 16,
        }
    }

    /// Whether the background gets its vertical gradient
    pub fn gradient_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Visual settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Background beams at all
    pub beams: bool,
    /// Explosion particles
    pub particles: bool,
    /// Explosion flash glow
    pub flash: bool,

    // === Timing ===
    /// Collision detector polling interval
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u32,
    /// Delay between a collision and the beam's next cycle
    #[serde(default = "default_cooldown")]
    pub cooldown_ms: u32,

    // === Accessibility ===
    /// Reduced motion (no particles, no flash)
    pub reduced_motion: bool,
}

fn default_poll_interval() -> u32 {
    POLL_INTERVAL_MS
}

fn default_cooldown() -> u32 {
    COOLDOWN_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            // Visual effects - all on by default
            beams: true,
            particles: true,
            flash: true,

            poll_interval_ms: POLL_INTERVAL_MS,
            cooldown_ms: COOLDOWN_MS,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        // Low preset drops the flash glow
        self.flash = preset != QualityPreset::Low;
    }

    /// Step to the next quality preset
    pub fn cycle_quality(&mut self) -> QualityPreset {
        let preset = self.quality.next();
        self.apply_preset(preset);
        preset
    }

    /// Effective particles (respects reduced_motion)
    pub fn effective_particles(&self) -> bool {
        self.particles && !self.reduced_motion
    }

    /// Effective flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        self.flash && !self.reduced_motion
    }

    /// Detector timing for a new scene
    pub fn timing(&self) -> Timing {
        Timing {
            poll_interval_ms: self.poll_interval_ms,
            cooldown_ms: self.cooldown_ms,
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "beam_calc_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scene_timing() {
        let settings = Settings::default();
        assert_eq!(settings.timing(), Timing::default());
        assert!(settings.effective_particles());
        assert!(settings.effective_flash());
    }

    #[test]
    fn test_reduced_motion_disables_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_particles());
        assert!(!settings.effective_flash());
    }

    #[test]
    fn test_low_preset() {
        let mut settings = Settings::default();
        settings.apply_preset(QualityPreset::Low);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(!settings.flash);
        assert!(settings.particles);
    }

    #[test]
    fn test_cycle_quality_wraps_and_restores_flash() {
        let mut settings = Settings::default();
        assert_eq!(settings.cycle_quality(), QualityPreset::High);
        assert!(settings.flash);
        assert_eq!(settings.cycle_quality(), QualityPreset::Low);
        assert!(!settings.effective_flash());
        assert_eq!(settings.cycle_quality(), QualityPreset::Medium);
        assert!(settings.flash);
        assert_eq!(settings.quality.as_str(), "Medium");
    }

    #[test]
    fn test_older_json_fills_timing_defaults() {
        let json = r#"{"quality":"High","beams":true,"particles":false,"flash":true,"reduced_motion":false}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(!settings.particles);
        assert_eq!(settings.poll_interval_ms, POLL_INTERVAL_MS);
        assert_eq!(settings.cooldown_ms, COOLDOWN_MS);
    }
}
