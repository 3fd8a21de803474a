use log::info;

use crate::math::Transform;
use crate::types::{StepDescriptor, StepId};
use crate::viewport::ViewportState;

/// Element a transform is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// The canvas holding every step, moved to center the active one
    Camera,
    Step(StepId),
}

/// Rendering backend - projects presentation state, never feeds back into it
pub trait RenderBackend {
    /// Place an element
    fn apply_transform(&mut self, element: ElementId, transform: &Transform);

    /// A step was registered and needs a visual element
    fn on_step_created(&mut self, step: &StepDescriptor);

    /// A step was removed; drop its element
    fn on_step_removed(&mut self, id: StepId);

    /// Viewport dimensions changed
    fn on_viewport_changed(&mut self, _viewport: &ViewportState) {}
}

/// Backend that draws nothing
#[derive(Debug, Default)]
pub struct NullBackend;

impl RenderBackend for NullBackend {
    fn apply_transform(&mut self, _element: ElementId, _transform: &Transform) {}

    fn on_step_created(&mut self, _step: &StepDescriptor) {}

    fn on_step_removed(&mut self, _id: StepId) {}
}

/// Backend that logs every call as CSS, for headless runs
#[derive(Debug, Default)]
pub struct LoggingBackend {
    applied: u64,
}

impl LoggingBackend {
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

impl RenderBackend for LoggingBackend {
    fn apply_transform(&mut self, element: ElementId, transform: &Transform) {
        self.applied += 1;
        info!("{element:?}: {}", transform.to_css());
    }

    fn on_step_created(&mut self, step: &StepDescriptor) {
        info!(
            "step {} created (center text: {}, background: {:?})",
            step.id,
            step.center_text,
            step.background.fill()
        );
    }

    fn on_step_removed(&mut self, id: StepId) {
        info!("step {id} removed");
    }

    fn on_viewport_changed(&mut self, viewport: &ViewportState) {
        info!(
            "viewport {}x{} perspective {}",
            viewport.width, viewport.height, viewport.perspective
        );
    }
}
