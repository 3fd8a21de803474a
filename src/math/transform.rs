use glam::{Mat4, Vec3};
use serde::Serialize;

use crate::types::StepDescriptor;
use crate::viewport::ViewportState;

/// Order in which the transform components are composed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Composition {
    /// translate, rotate X, Y, Z, scale: places a step in the scene
    Forward,
    /// scale, rotate Z, Y, X, translate: moves the scene in front of the camera
    Inverse,
}

/// Translate/rotate/scale values projected onto a step or the camera.
///
/// Rotations are in degrees. `depth` is an extra Z translation applied
/// outermost, used for the perspective offset of the camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub translate: Vec3,
    pub rotate: Vec3,
    pub scale: f32,
    pub depth: f32,
    pub composition: Composition,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate: Vec3::ZERO,
        rotate: Vec3::ZERO,
        scale: 1.0,
        depth: 0.0,
        composition: Composition::Forward,
    };

    /// Build the 4x4 matrix in this transform's composition order
    pub fn to_matrix(&self) -> Mat4 {
        let translate = Mat4::from_translation(self.translate);
        let rotate_x = Mat4::from_rotation_x(self.rotate.x.to_radians());
        let rotate_y = Mat4::from_rotation_y(self.rotate.y.to_radians());
        let rotate_z = Mat4::from_rotation_z(self.rotate.z.to_radians());
        let scale = Mat4::from_scale(Vec3::splat(self.scale));
        let depth = Mat4::from_translation(Vec3::new(0.0, 0.0, self.depth));

        match self.composition {
            Composition::Forward => depth * translate * rotate_x * rotate_y * rotate_z * scale,
            Composition::Inverse => depth * scale * rotate_z * rotate_y * rotate_x * translate,
        }
    }

    /// Component-wise interpolation; the result takes the target's composition
    pub fn lerp(&self, to: &Transform, t: f32) -> Transform {
        Transform {
            translate: self.translate.lerp(to.translate, t),
            rotate: self.rotate.lerp(to.rotate, t),
            scale: self.scale + (to.scale - self.scale) * t,
            depth: self.depth + (to.depth - self.depth) * t,
            composition: to.composition,
        }
    }

    /// CSS transform function list equivalent to `to_matrix`
    pub fn to_css(&self) -> String {
        let translate = format!(
            "translate3d({}px, {}px, {}px)",
            self.translate.x, self.translate.y, self.translate.z
        );
        let rotate = |axis: &str, deg: f32| format!("rotate{axis}({deg}deg)");
        let scale = format!("scale({})", self.scale);

        let parts = match self.composition {
            Composition::Forward => vec![
                translate,
                rotate("X", self.rotate.x),
                rotate("Y", self.rotate.y),
                rotate("Z", self.rotate.z),
                scale,
            ],
            Composition::Inverse => vec![
                scale,
                rotate("Z", self.rotate.z),
                rotate("Y", self.rotate.y),
                rotate("X", self.rotate.x),
                translate,
            ],
        };

        if self.depth == 0.0 {
            parts.join(" ")
        } else {
            format!("translateZ({}px) {}", self.depth, parts.join(" "))
        }
    }
}

/// Transform placing a step in scene space
pub fn compute_step_transform(step: &StepDescriptor) -> Transform {
    Transform {
        translate: step.position,
        rotate: step.effective_rotation(),
        scale: step.effective_scale(),
        depth: 0.0,
        composition: Composition::Forward,
    }
}

/// Camera transform that centers `step` in the viewport
pub fn compute_camera_transform(step: &StepDescriptor, viewport: &ViewportState) -> Transform {
    let placed = compute_step_transform(step);
    Transform {
        translate: -placed.translate,
        rotate: -placed.rotate,
        scale: 1.0 / placed.scale,
        depth: -viewport.perspective,
        composition: Composition::Inverse,
    }
}
