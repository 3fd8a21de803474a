use crate::types::{ContentRef, StepId};

/// Opaque handle to content instantiated by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHandle(pub u64);

/// Content host - turns a content descriptor into something renderable.
/// The presentation only stores and forwards the handle.
pub trait ContentHost {
    /// Instantiate the content for a step
    fn instantiate(&mut self, step: StepId, content: &ContentRef) -> ContentHandle;

    /// The owning step was removed or its content replaced
    fn release(&mut self, _handle: ContentHandle) {}
}
