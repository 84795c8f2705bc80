//! Effect settings and quality presets
//!
//! Loaded from JSON on native targets; every field has a default so partial
//! files are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Effect quality preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EffectQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl EffectQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectQuality::Low => "Low",
            EffectQuality::Medium => "Medium",
            EffectQuality::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(EffectQuality::Low),
            "medium" | "med" => Some(EffectQuality::Medium),
            "high" => Some(EffectQuality::High),
            _ => None,
        }
    }

    /// Quantization levels per channel
    pub fn color_levels(&self) -> u32 {
        match self {
            EffectQuality::Low => 2,
            EffectQuality::Medium => 3,
            EffectQuality::High => 4,
        }
    }

    /// Whether sprites get chromatic fringing
    pub fn aberration_enabled(&self) -> bool {
        !matches!(self, EffectQuality::Low)
    }
}

/// Post-processing tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    /// Discrete levels per color channel (>= 2)
    pub color_levels: u32,
    /// Bayer perturbation strength (0 disables the pattern)
    pub dither_strength: f32,
    /// Apply chromatic aberration around moving sprites
    pub aberration: bool,
    /// Red/blue sample offset in pixels
    pub aberration_strength: f32,
    /// Background fill before sprites are drawn, RGB
    pub background: [u8; 3],
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            color_levels: 3,
            dither_strength: 0.7,
            aberration: true,
            aberration_strength: 4.0,
            background: [0xeb, 0xeb, 0xeb],
        }
    }
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Effect quality preset
    pub quality: EffectQuality,
    /// Post-processing tunables
    pub effects: EffectSettings,
    /// Sprites spawned when the stage starts
    pub initial_sprites: usize,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: EffectQuality::Medium,
            effects: EffectSettings::default(),
            initial_sprites: 5,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: EffectQuality) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: EffectQuality) {
        self.quality = preset;
        self.effects.color_levels = preset.color_levels();
        self.effects.aberration = preset.aberration_enabled();
    }

    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults on any error
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let fx = &self.effects;
        if fx.color_levels < 2 {
            return Err(SettingsError::Invalid(format!(
                "color_levels must be at least 2, got {}",
                fx.color_levels
            )));
        }
        if !(0.0..=1.0).contains(&fx.dither_strength) {
            return Err(SettingsError::Invalid(format!(
                "dither_strength must be within [0, 1], got {}",
                fx.dither_strength
            )));
        }
        if !fx.aberration_strength.is_finite() || fx.aberration_strength < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "aberration_strength must be non-negative, got {}",
                fx.aberration_strength
            )));
        }
        Ok(())
    }
}
