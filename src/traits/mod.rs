pub mod content;
pub mod controller;
pub mod renderer;

pub use content::*;
pub use controller::*;
pub use renderer::*;
