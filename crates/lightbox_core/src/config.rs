//! Lightbox configuration
//!
//! Tuning for the transition physics and the image viewer, loadable from a
//! `lightbox.toml` document. Every field has a default, so partial documents
//! are accepted:
//!
//! ```toml
//! [transition]
//! spring = 420.0
//! friction = 30.0
//!
//! [viewer]
//! maximum_zoom_scale = 4.0
//! dismiss_button_position = "top_trailing"
//! ```

use crate::error::{LightboxError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// =============================================================================
// Top-level
// =============================================================================

/// Complete configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct LightboxConfig {
    #[serde(default)]
    pub transition: TransitionConfig,
    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl LightboxConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: LightboxConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded lightbox configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.transition.validate()?;
        self.viewer.validate()
    }
}

// =============================================================================
// Transition
// =============================================================================

/// Spring physics and presentation constants for photo transitions
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TransitionConfig {
    /// Spring constant of the damped oscillator
    #[serde(default = "default_spring")]
    pub spring: f32,
    /// Friction (damping) constant of the damped oscillator
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Drag distance on either axis past which releasing completes a dismissal
    #[serde(default = "default_dismiss_threshold")]
    pub dismiss_translation_threshold: f32,
    /// Nominal duration reported to the host presentation system
    #[serde(default = "default_transition_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_shadow_offset_y")]
    pub shadow_offset_y: f32,
    #[serde(default = "default_shadow_radius")]
    pub shadow_radius: f32,
    #[serde(default = "default_shadow_opacity")]
    pub shadow_opacity: f32,
}

fn default_spring() -> f32 {
    500.0
}

fn default_friction() -> f32 {
    36.5
}

fn default_dismiss_threshold() -> f32 {
    50.0
}

fn default_transition_ms() -> u64 {
    235
}

fn default_shadow_offset_y() -> f32 {
    20.0
}

fn default_shadow_radius() -> f32 {
    20.0
}

fn default_shadow_opacity() -> f32 {
    0.35
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            spring: default_spring(),
            friction: default_friction(),
            dismiss_translation_threshold: default_dismiss_threshold(),
            duration_ms: default_transition_ms(),
            shadow_offset_y: default_shadow_offset_y(),
            shadow_radius: default_shadow_radius(),
            shadow_opacity: default_shadow_opacity(),
        }
    }
}

impl TransitionConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.spring > 0.0) {
            return Err(invalid("transition.spring", "must be greater than zero"));
        }
        if !(self.friction >= 0.0) {
            return Err(invalid("transition.friction", "must not be negative"));
        }
        if !(self.dismiss_translation_threshold >= 0.0) {
            return Err(invalid(
                "transition.dismiss_translation_threshold",
                "must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.shadow_opacity) {
            return Err(invalid("transition.shadow_opacity", "must be within 0.0..=1.0"));
        }
        Ok(())
    }
}

// =============================================================================
// Viewer
// =============================================================================

/// Corner the dismiss button is pinned to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissButtonPosition {
    #[default]
    TopLeading,
    TopTrailing,
}

/// Paging and zooming behaviour of the viewer
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ViewerConfig {
    #[serde(default = "default_min_zoom")]
    pub minimum_zoom_scale: f32,
    #[serde(default = "default_max_zoom")]
    pub maximum_zoom_scale: f32,
    #[serde(default = "default_zoom_ms")]
    pub zoom_animation_ms: u64,
    /// Horizontal gap between pages
    #[serde(default = "default_spacing")]
    pub spacing_between_images: f32,
    /// Number of downloaded images kept in memory
    #[serde(default = "default_cache_capacity")]
    pub remote_cache_capacity: usize,
    #[serde(default)]
    pub dismiss_button_position: DismissButtonPosition,
}

fn default_min_zoom() -> f32 {
    1.0
}

fn default_max_zoom() -> f32 {
    3.0
}

fn default_zoom_ms() -> u64 {
    300
}

fn default_spacing() -> f32 {
    40.0
}

fn default_cache_capacity() -> usize {
    64
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            minimum_zoom_scale: default_min_zoom(),
            maximum_zoom_scale: default_max_zoom(),
            zoom_animation_ms: default_zoom_ms(),
            spacing_between_images: default_spacing(),
            remote_cache_capacity: default_cache_capacity(),
            dismiss_button_position: DismissButtonPosition::default(),
        }
    }
}

impl ViewerConfig {
    pub fn zoom_animation(&self) -> Duration {
        Duration::from_millis(self.zoom_animation_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.minimum_zoom_scale > 0.0) {
            return Err(invalid("viewer.minimum_zoom_scale", "must be greater than zero"));
        }
        if !(self.maximum_zoom_scale >= self.minimum_zoom_scale) {
            return Err(invalid(
                "viewer.maximum_zoom_scale",
                "must not be smaller than minimum_zoom_scale",
            ));
        }
        if self.remote_cache_capacity == 0 {
            return Err(invalid("viewer.remote_cache_capacity", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> LightboxError {
    LightboxError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}
