//! Visual preferences
//!
//! Only the renderer reads these; gameplay is unaffected. Values come from
//! the page URL (`?quality=low&reduced_motion=1`) and are never stored.

use serde::{Deserialize, Serialize};

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

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum trees sent to the GPU for this preset
    pub fn max_trees(&self) -> usize {
        match self {
            QualityPreset::Low => 32,
            QualityPreset::Medium => 64,
            QualityPreset::High => 128,
        }
    }

    /// Whether distance fog is blended in
    pub fn fog_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Whether the shader marches shadow rays
    pub fn shadows_enabled(&self) -> bool {
        matches!(self, QualityPreset::High)
    }
}

/// Render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Hide cosmetic motion (body bob, lane-change tilt)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse a URL query string such as `?quality=high&reduced_motion=1`
    ///
    /// Unknown keys and bad values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "quality" => match QualityPreset::parse(value) {
                    Some(preset) => settings.quality = preset,
                    None => log::warn!("Unknown quality preset: {}", value),
                },
                "reduced_motion" => {
                    settings.reduced_motion = matches!(value, "1" | "true" | "yes");
                }
                _ => {}
            }
        }
        settings
    }

    /// Effective body bob (respects reduced_motion)
    pub fn effective_bob(&self, bob_y: f32, rest_y: f32) -> f32 {
        if self.reduced_motion { rest_y } else { bob_y }
    }

    /// Effective tilt (respects reduced_motion)
    pub fn effective_tilt(&self, rotation_z: f32) -> f32 {
        if self.reduced_motion { 0.0 } else { rotation_z }
    }

    /// Effective tree cap
    pub fn max_trees(&self) -> usize {
        self.quality.max_trees()
    }
}
