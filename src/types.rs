use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{PresentationError, Result};

/// Unique, monotonically allocated step identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub u32);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hex colour, stored with a leading `#`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbHex(String);

impl RgbHex {
    /// Accepts `rrggbb`, `#rrggbb` and the three-digit short forms
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.trim().trim_start_matches('#');
        let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
        valid.then(|| Self(format!("#{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RgbHex {
    type Error = String;

    fn try_from(raw: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&raw).ok_or_else(|| format!("'{raw}' is not a hex colour"))
    }
}

impl From<RgbHex> for String {
    fn from(color: RgbHex) -> Self {
        color.0
    }
}

/// Reference to an image asset resolved by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    /// Intrinsic pixel size, when the host recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

/// Opaque content descriptor handed to the content host untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRef {
    pub library: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Step background. Colour and image are kept when transparent but never rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSpec {
    pub transparent: bool,
    pub color: Option<RgbHex>,
    pub image: Option<ImageRef>,
    pub width: f32,
    pub height: f32,
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        Self {
            transparent: true,
            color: None,
            image: None,
            width: 640.0,
            height: 360.0,
        }
    }
}

/// What a backend should paint behind a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundFill<'a> {
    None,
    Image {
        image: &'a ImageRef,
        /// Stretch to the background height rather than its width
        fit_to_height: bool,
    },
    Color(&'a RgbHex),
}

impl BackgroundSpec {
    /// Opaque background with a solid colour
    pub fn color(color: RgbHex, width: f32, height: f32) -> Self {
        Self {
            transparent: false,
            color: Some(color),
            image: None,
            width,
            height,
        }
    }

    /// Resolve the visible fill: images win over colours
    pub fn fill(&self) -> BackgroundFill<'_> {
        if self.transparent {
            return BackgroundFill::None;
        }
        match (&self.image, &self.color) {
            (Some(image), _) => BackgroundFill::Image {
                image,
                fit_to_height: match (image.width, image.height) {
                    (Some(width), Some(height)) => self.fits_to_height(width, height),
                    _ => false,
                },
            },
            (None, Some(color)) => BackgroundFill::Color(color),
            (None, None) => BackgroundFill::None,
        }
    }

    /// True when an image of the given size should be stretched to the background height
    pub fn fits_to_height(&self, image_width: f32, image_height: f32) -> bool {
        if image_height <= 0.0 || self.height <= 0.0 {
            return false;
        }
        image_width / image_height < self.width / self.height
    }

    fn validate(&self) -> Result<()> {
        if self.transparent {
            return Ok(());
        }
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if usable(self.width) && usable(self.height) {
            Ok(())
        } else {
            Err(PresentationError::InvalidBackground {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Caller-supplied data for a new step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInput {
    pub position: Vec3,
    /// Rotation in degrees around X, Y and Z
    pub rotation: Vec3,
    pub absolute_rotation: Option<f32>,
    pub scale: Option<f32>,
    pub center_text: bool,
    pub background: BackgroundSpec,
    pub action: Option<ContentRef>,
    pub include_in_path: bool,
}

impl Default for StepInput {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            absolute_rotation: None,
            scale: None,
            center_text: true,
            background: BackgroundSpec::default(),
            action: None,
            include_in_path: true,
        }
    }
}

impl StepInput {
    /// Run the checks `StepDescriptor::new` applies, without allocating an id
    pub fn validate(&self) -> Result<()> {
        StepDescriptor::new(StepId(0), self.clone()).map(drop)
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Self::default()
        }
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_background(mut self, background: BackgroundSpec) -> Self {
        self.background = background;
        self
    }

    pub fn with_action(mut self, action: ContentRef) -> Self {
        self.action = Some(action);
        self
    }

    /// Keep the step out of next/prev navigation
    pub fn outside_path(mut self) -> Self {
        self.include_in_path = false;
        self
    }
}

/// A registered step
#[derive(Debug, Clone, PartialEq)]
pub struct StepDescriptor {
    pub id: StepId,
    pub position: Vec3,
    pub rotation: Vec3,
    pub absolute_rotation: Option<f32>,
    pub scale: Option<f32>,
    pub center_text: bool,
    pub background: BackgroundSpec,
    pub action: Option<ContentRef>,
    pub include_in_path: bool,
}

impl StepDescriptor {
    pub fn new(id: StepId, input: StepInput) -> Result<Self> {
        let step = Self {
            id,
            position: input.position,
            rotation: input.rotation,
            absolute_rotation: input.absolute_rotation,
            scale: input.scale,
            center_text: input.center_text,
            background: input.background,
            action: input.action,
            include_in_path: input.include_in_path,
        };
        step.validate()?;
        Ok(step)
    }

    /// Uniform scale, defaulting to 1
    pub fn effective_scale(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }

    /// Z rotation including the absolute rotation offset
    pub fn effective_rotation(&self) -> Vec3 {
        let mut rotation = self.rotation;
        rotation.z += self.absolute_rotation.unwrap_or(0.0);
        rotation
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("position.x", self.position.x),
            ("position.y", self.position.y),
            ("position.z", self.position.z),
            ("rotation.x", self.rotation.x),
            ("rotation.y", self.rotation.y),
            ("rotation.z", self.rotation.z),
            ("absolute_rotation", self.absolute_rotation.unwrap_or(0.0)),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(PresentationError::InvalidGeometry { field, value });
            }
        }
        // Zero scale has no inverse, so the camera could never center the step
        if let Some(scale) = self.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(PresentationError::InvalidGeometry { field: "scale", value: scale });
            }
        }
        self.background.validate()
    }

    /// Merge a partial update, returning the candidate without touching `self`
    pub fn merged(&self, update: &StepUpdate) -> Self {
        let mut next = self.clone();
        if let Some(position) = update.position {
            next.position = position;
        }
        if let Some(rotation) = update.rotation {
            next.rotation = rotation;
        }
        if let Some(absolute_rotation) = update.absolute_rotation {
            next.absolute_rotation = absolute_rotation;
        }
        if let Some(scale) = update.scale {
            next.scale = scale;
        }
        if let Some(center_text) = update.center_text {
            next.center_text = center_text;
        }
        if let Some(background) = &update.background {
            next.background = background.clone();
        }
        if let Some(action) = &update.action {
            next.action = action.clone();
        }
        if let Some(include_in_path) = update.include_in_path {
            next.include_in_path = include_in_path;
        }
        next
    }
}

/// Partial step update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepUpdate {
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub absolute_rotation: Option<Option<f32>>,
    pub scale: Option<Option<f32>>,
    pub center_text: Option<bool>,
    pub background: Option<BackgroundSpec>,
    pub action: Option<Option<ContentRef>>,
    pub include_in_path: Option<bool>,
}

impl StepUpdate {
    pub fn position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn rotation(rotation: Vec3) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    /// True when the update may move the step's transform
    pub fn touches_geometry(&self) -> bool {
        self.position.is_some()
            || self.rotation.is_some()
            || self.absolute_rotation.is_some()
            || self.scale.is_some()
    }
}
