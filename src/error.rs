use thiserror::Error;

use crate::types::StepId;

/// Errors surfaced synchronously to the caller of a presentation operation.
#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("invalid geometry: {field} = {value}")]
    InvalidGeometry { field: &'static str, value: f32 },
    #[error("invalid background: {width}x{height} must be positive for an opaque background")]
    InvalidBackground { width: f32, height: f32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("step {0} does not exist")]
    StepNotFound(StepId),
    #[error("step {0} is not part of the route")]
    StepNotInRoute(StepId),
    #[error("route is empty")]
    EmptyRoute,
    #[error("presentation is not attached")]
    NotAttached,
    #[error("route entry {0} does not name a step in the document")]
    UnknownRouteEntry(usize),
    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PresentationError>;
