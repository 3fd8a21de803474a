pub mod cli;
pub mod config;
pub mod core;
pub mod document;
pub mod error;
pub mod events;
pub mod math;
pub mod navigation;
pub mod presentation;
pub mod registry;
pub mod route;
pub mod traits;
pub mod types;
pub mod viewport;

// Re-export the types most callers need
pub use config::PresentationConfig;
pub use document::PresentationDocument;
pub use error::{PresentationError, Result};
pub use events::{Observable, SubscriptionId};
pub use math::{compute_camera_transform, compute_step_transform, Transform};
pub use navigation::{ActiveFallback, NavigationState};
pub use presentation::{Presentation, PresentationEvent, PresentationEventKind};
pub use traits::{ContentHandle, ContentHost, ElementId, LoggingBackend, NullBackend, RenderBackend};
pub use types::{BackgroundSpec, ContentRef, StepDescriptor, StepId, StepInput, StepUpdate};
pub use viewport::ViewportState;
