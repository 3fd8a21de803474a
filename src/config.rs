// config.rs - Per-presentation settings
use serde::{Deserialize, Serialize};

use crate::error::{PresentationError, Result};

/// Settings snapshot owned by a single presentation.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresentationConfig {
    /// Container width divided by this gives the perspective depth
    pub perspective_ratio: f32,
    pub transition_duration_ms: f32,
    pub viewport_default_width: f32,
    pub viewport_default_height: f32,
    /// Z distance a zoom key moves the active step while editing
    pub key_zoom_amount: f32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            perspective_ratio: 1.0,
            transition_duration_ms: 600.0,
            viewport_default_width: 640.0,
            viewport_default_height: 360.0,
            key_zoom_amount: 10.0,
        }
    }
}

impl PresentationConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.perspective_ratio) {
            return Err(invalid("perspectiveRatio", self.perspective_ratio));
        }
        if !self.transition_duration_ms.is_finite() || self.transition_duration_ms < 0.0 {
            return Err(invalid("transitionDurationMs", self.transition_duration_ms));
        }
        if !positive(self.viewport_default_width) {
            return Err(invalid("viewportDefaultWidth", self.viewport_default_width));
        }
        if !positive(self.viewport_default_height) {
            return Err(invalid("viewportDefaultHeight", self.viewport_default_height));
        }
        if !self.key_zoom_amount.is_finite() {
            return Err(invalid("keyZoomAmount", self.key_zoom_amount));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: f32) -> PresentationError {
    PresentationError::InvalidConfig(format!("{field} = {value}"))
}
