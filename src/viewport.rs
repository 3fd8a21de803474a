use serde::Serialize;

use crate::error::{PresentationError, Result};

/// Height of the viewport relative to its width
pub const ASPECT_RATIO: f32 = 9.0 / 16.0;

/// Viewport dimensions and perspective depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
    pub perspective: f32,
}

impl ViewportState {
    /// Fit a 16:9 viewport to the container width
    pub fn from_container(width: f32, perspective_ratio: f32) -> Self {
        Self {
            width,
            height: width * ASPECT_RATIO,
            perspective: width / perspective_ratio,
        }
    }
}

/// Maps the container size onto the viewport
#[derive(Debug, Clone)]
pub struct ViewportManager {
    perspective_ratio: f32,
    default_width: f32,
    default_height: f32,
    state: Option<ViewportState>,
}

impl ViewportManager {
    pub fn new(perspective_ratio: f32, default_width: f32, default_height: f32) -> Self {
        Self {
            perspective_ratio,
            default_width,
            default_height,
            state: None,
        }
    }

    pub fn state(&self) -> Option<ViewportState> {
        self.state
    }

    /// Establish the viewport from the container width, or the configured
    /// defaults when the container has no usable width yet
    pub fn attach(&mut self, container_width: Option<f32>) -> ViewportState {
        let state = match container_width.filter(|w| usable(*w)) {
            Some(width) => ViewportState::from_container(width, self.perspective_ratio),
            None => ViewportState {
                width: self.default_width,
                height: self.default_height,
                perspective: self.default_width / self.perspective_ratio,
            },
        };
        self.state = Some(state);
        state
    }

    /// Recompute the viewport for a new container width
    pub fn resize(&mut self, container_width: f32) -> Result<ViewportState> {
        if self.state.is_none() {
            return Err(PresentationError::NotAttached);
        }
        if !usable(container_width) {
            return Err(PresentationError::InvalidGeometry {
                field: "container.width",
                value: container_width,
            });
        }
        let state = ViewportState::from_container(container_width, self.perspective_ratio);
        self.state = Some(state);
        Ok(state)
    }

    pub fn detach(&mut self) {
        self.state = None;
    }
}

fn usable(width: f32) -> bool {
    width.is_finite() && width > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_uses_defaults_without_container() {
        let mut viewport = ViewportManager::new(1.0, 640.0, 360.0);
        let state = viewport.attach(None);
        assert_eq!(
            state,
            ViewportState {
                width: 640.0,
                height: 360.0,
                perspective: 640.0,
            }
        );
    }

    #[test]
    fn attach_fits_container_to_sixteen_nine() {
        let mut viewport = ViewportManager::new(2.0, 640.0, 360.0);
        let state = viewport.attach(Some(1280.0));
        assert_eq!(state.height, 720.0);
        assert_eq!(state.perspective, 640.0);
    }

    #[test]
    fn resize_recomputes_perspective() {
        let mut viewport = ViewportManager::new(1.0, 640.0, 360.0);
        viewport.attach(Some(640.0));
        let state = viewport.resize(800.0).unwrap();
        assert_eq!((state.width, state.height, state.perspective), (800.0, 450.0, 800.0));
    }

    #[test]
    fn resize_rejects_unusable_width() {
        let mut viewport = ViewportManager::new(1.0, 640.0, 360.0);
        viewport.attach(None);
        assert!(viewport.resize(0.0).is_err());
        assert!(viewport.resize(f32::NAN).is_err());
        assert_eq!(viewport.state().unwrap().width, 640.0);
    }

    #[test]
    fn resize_before_attach_fails() {
        let mut viewport = ViewportManager::new(1.0, 640.0, 360.0);
        assert!(matches!(viewport.resize(800.0), Err(PresentationError::NotAttached)));
    }
}
