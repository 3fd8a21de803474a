use std::collections::BTreeMap;

use log::debug;

use crate::error::{PresentationError, Result};
use crate::types::{StepDescriptor, StepId, StepInput, StepUpdate};

/// Owns every step of a presentation.
///
/// Ids grow monotonically and are never handed out twice, so map order is
/// also insertion order.
pub struct StepRegistry {
    steps: BTreeMap<StepId, StepDescriptor>,
    next_id: u32,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self {
            steps: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Validate and store a step, returning its freshly allocated id
    pub fn create(&mut self, input: StepInput) -> Result<StepId> {
        let id = StepId(self.next_id);
        let step = StepDescriptor::new(id, input)?;
        self.next_id += 1;
        self.steps.insert(id, step);
        debug!("registered step {id}");
        Ok(id)
    }

    pub fn get(&self, id: StepId) -> Result<&StepDescriptor> {
        self.steps.get(&id).ok_or(PresentationError::StepNotFound(id))
    }

    pub fn contains(&self, id: StepId) -> bool {
        self.steps.contains_key(&id)
    }

    /// Remove a step; absent ids are ignored
    pub fn remove(&mut self, id: StepId) -> Option<StepDescriptor> {
        let removed = self.steps.remove(&id)?;
        debug!("removed step {id}");
        Some(removed)
    }

    /// Merge and re-validate; the stored step is untouched on error
    pub fn update(&mut self, id: StepId, update: &StepUpdate) -> Result<&StepDescriptor> {
        let candidate = self.get(id)?.merged(update);
        candidate.validate()?;
        self.steps.insert(id, candidate);
        self.get(id)
    }

    /// Record route membership; geometry is unaffected so no event fires
    pub fn set_in_path(&mut self, id: StepId, include_in_path: bool) -> Result<()> {
        let step = self
            .steps
            .get_mut(&id)
            .ok_or(PresentationError::StepNotFound(id))?;
        step.include_in_path = include_in_path;
        Ok(())
    }

    /// Steps in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = StepId> + '_ {
        self.steps.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn ids_are_never_reused() {
        let mut registry = StepRegistry::new();
        let a = registry.create(StepInput::default()).unwrap();
        let b = registry.create(StepInput::default()).unwrap();
        registry.remove(b);
        let c = registry.create(StepInput::default()).unwrap();

        assert_eq!((a, b, c), (StepId(0), StepId(1), StepId(2)));
    }

    #[test]
    fn invalid_step_does_not_consume_an_id() {
        let mut registry = StepRegistry::new();
        assert!(registry.create(StepInput::at(0.0, f32::INFINITY, 0.0)).is_err());
        assert!(registry.is_empty());
        assert_eq!(registry.create(StepInput::default()).unwrap(), StepId(0));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut registry = StepRegistry::new();
        let id = registry.create(StepInput::default()).unwrap();
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert!(registry.remove(StepId(42)).is_none());
    }

    #[test]
    fn enumeration_keeps_insertion_order() {
        let mut registry = StepRegistry::new();
        for x in [3.0, 1.0, 2.0] {
            registry.create(StepInput::at(x, 0.0, 0.0)).unwrap();
        }
        let xs: Vec<f32> = registry.iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn failed_update_leaves_step_untouched() {
        let mut registry = StepRegistry::new();
        let id = registry.create(StepInput::at(1.0, 1.0, 1.0)).unwrap();
        let err = registry
            .update(id, &StepUpdate::position(Vec3::new(f32::NAN, 0.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, PresentationError::InvalidGeometry { .. }));
        assert_eq!(registry.get(id).unwrap().position, Vec3::ONE);
    }

    #[test]
    fn missing_step_is_not_found() {
        let registry = StepRegistry::new();
        assert!(matches!(
            registry.get(StepId(7)),
            Err(PresentationError::StepNotFound(StepId(7)))
        ));
    }
}
