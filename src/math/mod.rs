mod easing;
mod transform;

pub use easing::Easing;
pub use transform::{compute_camera_transform, compute_step_transform, Composition, Transform};
