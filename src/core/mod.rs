pub mod clock;
pub mod timer;
pub mod transition;

pub use clock::{Clock, Pacing};
pub use timer::Countdown;
pub use transition::{TransitionController, TransitionEvent};
