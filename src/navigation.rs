//! Route-driven navigation state machine.
//!
//! The navigator decides *where* to go; the transition controller decides how
//! the camera gets there. `active` only changes when a transition completes or
//! when the active step drops out of the route.

use log::{debug, warn};
use serde::Serialize;

use crate::error::{PresentationError, Result};
use crate::route::Route;
use crate::types::StepId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPhase {
    Idle,
    Transitioning { target: StepId },
}

/// Accepted navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationRequest {
    pub target: StepId,
    /// Target of the transition this request cut short, if any
    pub interrupted: Option<StepId>,
}

/// The active step left the route and was replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFallback {
    pub removed: StepId,
    pub fallback: Option<StepId>,
}

/// Consequences of a step leaving the route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteLoss {
    pub active_fallback: Option<ActiveFallback>,
    /// The in-flight transition was heading to the removed step
    pub target_dropped: bool,
}

/// Snapshot of navigation for callers and serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub active_step: Option<StepId>,
    pub route: Vec<StepId>,
    pub transition_in_progress: bool,
}

pub struct Navigator {
    route: Route,
    active: Option<StepId>,
    phase: NavigationPhase,
}

impl Navigator {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            active: None,
            phase: NavigationPhase::Idle,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn active(&self) -> Option<StepId> {
        self.active
    }

    pub fn phase(&self) -> NavigationPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, NavigationPhase::Transitioning { .. })
    }

    /// Where the next relative move starts from: the in-flight target, else the active step
    pub fn cursor(&self) -> Option<StepId> {
        match self.phase {
            NavigationPhase::Transitioning { target } => Some(target),
            NavigationPhase::Idle => self.active,
        }
    }

    /// Point at the first route entry; called on attach
    pub fn initialize(&mut self) -> Option<StepId> {
        self.phase = NavigationPhase::Idle;
        self.active = self.route.first();
        self.active
    }

    /// Forget the active step and any transition; the route is kept
    pub fn teardown(&mut self) {
        self.phase = NavigationPhase::Idle;
        self.active = None;
    }

    /// Adopt the first route entry when nothing is active yet
    pub fn adopt_first(&mut self) -> Option<StepId> {
        if self.active.is_some() || self.is_transitioning() {
            return None;
        }
        self.active = self.route.first();
        self.active
    }

    pub fn go_to(&mut self, target: StepId) -> Result<NavigationRequest> {
        if !self.route.contains(target) {
            return Err(PresentationError::StepNotInRoute(target));
        }
        let interrupted = match self.phase {
            NavigationPhase::Transitioning { target } => Some(target),
            NavigationPhase::Idle => None,
        };
        self.phase = NavigationPhase::Transitioning { target };
        debug!("navigating to {target} (interrupted: {interrupted:?})");
        Ok(NavigationRequest {
            target,
            interrupted,
        })
    }

    pub fn next(&mut self) -> Result<NavigationRequest> {
        let target = self.neighbour(Route::next_of)?;
        self.go_to(target)
    }

    pub fn prev(&mut self) -> Result<NavigationRequest> {
        let target = self.neighbour(Route::prev_of)?;
        self.go_to(target)
    }

    fn neighbour(&self, step: fn(&Route, StepId) -> Option<StepId>) -> Result<StepId> {
        let first = self.route.first().ok_or(PresentationError::EmptyRoute)?;
        Ok(self
            .cursor()
            .and_then(|cursor| step(&self.route, cursor))
            .unwrap_or(first))
    }

    /// Finish the transition to `target`. Stale completions are ignored.
    pub fn complete(&mut self, target: StepId) -> bool {
        if self.phase != (NavigationPhase::Transitioning { target }) {
            return false;
        }
        self.phase = NavigationPhase::Idle;
        self.active = Some(target);
        debug!("arrived at {target}");
        true
    }

    /// Drop the in-flight transition without moving `active`
    pub fn abort(&mut self) {
        self.phase = NavigationPhase::Idle;
    }

    /// Returns false if `id` was already in the route
    pub fn add_to_route(&mut self, id: StepId, after: Option<StepId>) -> bool {
        self.route.add(id, after)
    }

    pub fn remove_from_route(&mut self, id: StepId) -> RouteLoss {
        if !self.route.remove(id) {
            return RouteLoss::default();
        }

        let mut loss = RouteLoss::default();
        if self.phase == (NavigationPhase::Transitioning { target: id }) {
            self.phase = NavigationPhase::Idle;
            loss.target_dropped = true;
        }
        if self.active == Some(id) {
            self.active = self.route.first();
            warn!(
                "active step {id} left the route, falling back to {:?}",
                self.active
            );
            loss.active_fallback = Some(ActiveFallback {
                removed: id,
                fallback: self.active,
            });
        }
        loss
    }

    pub fn snapshot(&self) -> NavigationState {
        NavigationState {
            active_step: self.active,
            route: self.route.ids().to_vec(),
            transition_in_progress: self.is_transitioning(),
        }
    }
}
