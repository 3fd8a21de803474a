//! A presentation instance: owns the steps, the route, the camera and the
//! viewport, and keeps them consistent while steps are edited at runtime.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::config::PresentationConfig;
use crate::core::transition::{TransitionController, TransitionEvent};
use crate::error::{PresentationError, Result};
use crate::events::{Event, EventEmitter, Observable};
use crate::math::{compute_camera_transform, compute_step_transform, Transform};
use crate::navigation::{ActiveFallback, NavigationPhase, NavigationRequest, NavigationState, Navigator, RouteLoss};
use crate::registry::StepRegistry;
use crate::route::Route;
use crate::traits::{ContentHandle, ContentHost, ElementId, Key, KeyAction, KeyBindings, NullBackend, RenderBackend};
use crate::types::{StepDescriptor, StepId, StepInput, StepUpdate};
use crate::viewport::{ViewportManager, ViewportState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresentationEvent {
    StepCreated(StepId),
    StepRemoved(StepId),
    StepUpdated(StepId),
    NavigationStarted {
        target: StepId,
        interrupted: Option<StepId>,
    },
    NavigationCompleted(StepId),
    TransitionCancelled {
        target: StepId,
        at: Transform,
    },
    ActiveStepFallback(ActiveFallback),
    ViewportChanged(ViewportState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationEventKind {
    StepCreated,
    StepRemoved,
    StepUpdated,
    NavigationStarted,
    NavigationCompleted,
    TransitionCancelled,
    ActiveStepFallback,
    ViewportChanged,
}

impl Event for PresentationEvent {
    type Kind = PresentationEventKind;

    fn kind(&self) -> PresentationEventKind {
        match self {
            PresentationEvent::StepCreated(_) => PresentationEventKind::StepCreated,
            PresentationEvent::StepRemoved(_) => PresentationEventKind::StepRemoved,
            PresentationEvent::StepUpdated(_) => PresentationEventKind::StepUpdated,
            PresentationEvent::NavigationStarted { .. } => PresentationEventKind::NavigationStarted,
            PresentationEvent::NavigationCompleted(_) => PresentationEventKind::NavigationCompleted,
            PresentationEvent::TransitionCancelled { .. } => PresentationEventKind::TransitionCancelled,
            PresentationEvent::ActiveStepFallback(_) => PresentationEventKind::ActiveStepFallback,
            PresentationEvent::ViewportChanged(_) => PresentationEventKind::ViewportChanged,
        }
    }
}

pub struct Presentation {
    config: PresentationConfig,
    registry: StepRegistry,
    navigator: Navigator,
    transitions: TransitionController,
    viewport: ViewportManager,
    backend: Box<dyn RenderBackend>,
    content_host: Option<Box<dyn ContentHost>>,
    content: BTreeMap<StepId, ContentHandle>,
    bindings: KeyBindings,
    events: EventEmitter<PresentationEvent>,
    attached: bool,
    editing: bool,
}

impl Presentation {
    pub fn new(config: PresentationConfig) -> Result<Self> {
        config.validate()?;
        let viewport = ViewportManager::new(
            config.perspective_ratio,
            config.viewport_default_width,
            config.viewport_default_height,
        );
        Ok(Self {
            config,
            registry: StepRegistry::new(),
            navigator: Navigator::new(Route::new()),
            transitions: TransitionController::default(),
            viewport,
            backend: Box::new(NullBackend),
            content_host: None,
            content: BTreeMap::new(),
            bindings: KeyBindings::default(),
            events: EventEmitter::new(),
            attached: false,
            editing: false,
        })
    }

    pub fn with_backend(mut self, backend: impl RenderBackend + 'static) -> Self {
        self.backend = Box::new(backend);
        self
    }

    pub fn with_content_host(mut self, host: impl ContentHost + 'static) -> Self {
        self.content_host = Some(Box::new(host));
        self
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Establish the viewport and show the first route entry
    pub fn attach(&mut self, container_width: Option<f32>) -> ViewportState {
        let viewport = self.viewport.attach(container_width);
        self.attached = true;
        self.backend.on_viewport_changed(&viewport);
        self.events.emit(&PresentationEvent::ViewportChanged(viewport));

        if let Some(first) = self.navigator.initialize() {
            self.snap_to(first);
        }
        debug!("attached with viewport {viewport:?}");
        viewport
    }

    /// Tear down navigation state; steps and route are kept
    pub fn detach(&mut self) {
        self.transitions.cancel();
        self.navigator.teardown();
        self.viewport.detach();
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    // ========================================================================
    // Steps
    // ========================================================================

    pub fn create_step(&mut self, input: StepInput) -> Result<StepId> {
        let id = self.registry.create(input)?;
        let step = self.registry.get(id)?;

        self.backend.on_step_created(step);
        self.backend
            .apply_transform(ElementId::Step(id), &compute_step_transform(step));
        if let (Some(host), Some(action)) = (self.content_host.as_mut(), step.action.as_ref()) {
            self.content.insert(id, host.instantiate(id, action));
        }
        let in_path = step.include_in_path;

        if in_path {
            self.navigator.add_to_route(id, None);
        }
        self.events.emit(&PresentationEvent::StepCreated(id));
        self.adopt_first();
        Ok(id)
    }

    pub fn get_step(&self, id: StepId) -> Result<&StepDescriptor> {
        self.registry.get(id)
    }

    /// Steps in creation order
    pub fn steps(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.registry.iter()
    }

    pub fn step_count(&self) -> usize {
        self.registry.len()
    }

    /// Remove a step and its route entry. Absent ids are a no-op.
    /// Returns the fallback when the active step was the one removed.
    pub fn remove_step(&mut self, id: StepId) -> Option<ActiveFallback> {
        self.registry.remove(id)?;
        let loss = self.navigator.remove_from_route(id);

        self.release_content(id);
        self.backend.on_step_removed(id);
        self.events.emit(&PresentationEvent::StepRemoved(id));
        self.recover(loss)
    }

    pub fn update_step(&mut self, id: StepId, update: StepUpdate) -> Result<()> {
        let was_in_path = self.registry.get(id)?.include_in_path;
        let step = self.registry.update(id, &update)?;

        self.backend
            .apply_transform(ElementId::Step(id), &compute_step_transform(step));
        let in_path = step.include_in_path;
        if let Some(action) = &update.action {
            self.release_content(id);
            if let (Some(host), Some(action)) = (self.content_host.as_mut(), action.as_ref()) {
                self.content.insert(id, host.instantiate(id, action));
            }
        }
        self.events.emit(&PresentationEvent::StepUpdated(id));

        match (was_in_path, in_path) {
            (false, true) => {
                self.navigator.add_to_route(id, None);
                self.adopt_first();
            }
            (true, false) => {
                let loss = self.navigator.remove_from_route(id);
                self.recover(loss);
            }
            _ => {}
        }

        if update.touches_geometry() {
            self.refresh_camera_for(id);
        }
        Ok(())
    }

    pub fn content_handle(&self, id: StepId) -> Option<ContentHandle> {
        self.content.get(&id).copied()
    }

    // ========================================================================
    // Route
    // ========================================================================

    /// Insert `id` after `after` (or at the end). Returns false if already routed.
    pub fn add_to_route(&mut self, id: StepId, after: Option<StepId>) -> Result<bool> {
        self.registry.get(id)?;
        if !self.navigator.add_to_route(id, after) {
            return Ok(false);
        }
        self.registry.set_in_path(id, true)?;
        self.adopt_first();
        Ok(true)
    }

    /// Take `id` out of next/prev navigation. Absent ids are a no-op.
    pub fn remove_from_route(&mut self, id: StepId) -> Option<ActiveFallback> {
        let loss = self.navigator.remove_from_route(id);
        if self.registry.contains(id) {
            // Cannot fail: presence checked above
            let _ = self.registry.set_in_path(id, false);
        }
        self.recover(loss)
    }

    pub fn route(&self) -> &[StepId] {
        self.navigator.route().ids()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn go_to(&mut self, id: StepId) -> Result<StepId> {
        self.ensure_attached()?;
        let request = self.navigator.go_to(id)?;
        self.begin_transition(request)
    }

    pub fn next(&mut self) -> Result<StepId> {
        self.ensure_attached()?;
        let request = self.navigator.next()?;
        self.begin_transition(request)
    }

    pub fn prev(&mut self) -> Result<StepId> {
        self.ensure_attached()?;
        let request = self.navigator.prev()?;
        self.begin_transition(request)
    }

    /// Advance the running transition by one display frame
    pub fn tick(&mut self, delta_ms: f32) {
        if !self.attached {
            return;
        }

        match self.transitions.tick(delta_ms) {
            None => {}
            Some(TransitionEvent::Frame(camera)) => {
                self.backend.apply_transform(ElementId::Camera, &camera);
            }
            Some(TransitionEvent::Complete(camera)) => {
                self.backend.apply_transform(ElementId::Camera, &camera);
                if let NavigationPhase::Transitioning { target } = self.navigator.phase() {
                    self.navigator.complete(target);
                    self.events.emit(&PresentationEvent::NavigationCompleted(target));
                }
            }
        }
    }

    /// Tick until the running transition completes; returns the frames consumed
    pub fn settle(&mut self, frame_ms: f32) -> u32 {
        let mut frames = 0;
        while self.transitions.is_running() && frame_ms > 0.0 {
            self.tick(frame_ms);
            frames += 1;
        }
        frames
    }

    pub fn active_step(&self) -> Option<StepId> {
        self.navigator.active()
    }

    pub fn is_transitioning(&self) -> bool {
        self.navigator.is_transitioning()
    }

    pub fn navigation_state(&self) -> NavigationState {
        self.navigator.snapshot()
    }

    /// Camera transform as last applied
    pub fn camera(&self) -> Transform {
        self.transitions.current()
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    /// Fit the viewport to a new container width and recenter the camera.
    /// Unusable sizes are logged and ignored.
    pub fn resize(&mut self, container_width: f32) {
        let viewport = match self.viewport.resize(container_width) {
            Ok(viewport) => viewport,
            Err(err) => {
                warn!("ignoring resize to {container_width}: {err}");
                return;
            }
        };
        self.backend.on_viewport_changed(&viewport);
        self.events.emit(&PresentationEvent::ViewportChanged(viewport));

        match self.navigator.phase() {
            NavigationPhase::Transitioning { target } => {
                if let Ok(camera) = self.camera_for(target) {
                    self.transitions.retarget(camera);
                }
            }
            NavigationPhase::Idle => {
                if let Some(active) = self.navigator.active() {
                    self.snap_to(active);
                }
            }
        }
    }

    pub fn viewport(&self) -> Option<ViewportState> {
        self.viewport.state()
    }

    // ========================================================================
    // Editing
    // ========================================================================

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Move the active step toward the viewer. Only acts while editing.
    pub fn zoom_in(&mut self) -> Result<bool> {
        self.zoom_by(self.config.key_zoom_amount)
    }

    /// Move the active step away from the viewer. Only acts while editing.
    pub fn zoom_out(&mut self) -> Result<bool> {
        self.zoom_by(-self.config.key_zoom_amount)
    }

    fn zoom_by(&mut self, amount: f32) -> Result<bool> {
        let Some(active) = self.navigator.active().filter(|_| self.editing) else {
            return Ok(false);
        };
        let mut position = self.registry.get(active)?.position;
        position.z += amount;
        self.update_step(active, StepUpdate::position(position))?;
        Ok(true)
    }

    /// Dispatch a key through the bindings; unbound keys are ignored
    pub fn handle_key(&mut self, key: Key) -> Result<()> {
        match self.bindings.action(key) {
            Some(KeyAction::Next) => self.next().map(drop),
            Some(KeyAction::Prev) => self.prev().map(drop),
            Some(KeyAction::ZoomIn) => self.zoom_in().map(drop),
            Some(KeyAction::ZoomOut) => self.zoom_out().map(drop),
            None => Ok(()),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_attached(&self) -> Result<()> {
        if self.attached {
            Ok(())
        } else {
            Err(PresentationError::NotAttached)
        }
    }

    fn camera_for(&self, id: StepId) -> Result<Transform> {
        let step = self.registry.get(id)?;
        let viewport = self.viewport.state().ok_or(PresentationError::NotAttached)?;
        Ok(compute_camera_transform(step, &viewport))
    }

    fn begin_transition(&mut self, request: NavigationRequest) -> Result<StepId> {
        let camera = match self.camera_for(request.target) {
            Ok(camera) => camera,
            Err(err) => {
                self.navigator.abort();
                self.transitions.cancel();
                return Err(err);
            }
        };

        if let Some(interrupted) = request.interrupted {
            if let Some(at) = self.transitions.cancel() {
                self.events.emit(&PresentationEvent::TransitionCancelled {
                    target: interrupted,
                    at,
                });
            }
        }
        self.transitions
            .start_from_current(camera, self.config.transition_duration_ms);
        self.events.emit(&PresentationEvent::NavigationStarted {
            target: request.target,
            interrupted: request.interrupted,
        });
        Ok(request.target)
    }

    /// Place the camera on a step without animating
    fn snap_to(&mut self, id: StepId) {
        match self.camera_for(id) {
            Ok(camera) => {
                self.transitions.snap(camera);
                self.backend.apply_transform(ElementId::Camera, &camera);
            }
            Err(err) => warn!("cannot center step {id}: {err}"),
        }
    }

    /// Keep the camera on a step whose geometry just changed
    fn refresh_camera_for(&mut self, id: StepId) {
        if !self.attached {
            return;
        }
        match self.navigator.phase() {
            NavigationPhase::Transitioning { target } if target == id => {
                if let Ok(camera) = self.camera_for(id) {
                    self.transitions.retarget(camera);
                }
            }
            NavigationPhase::Idle if self.navigator.active() == Some(id) => self.snap_to(id),
            _ => {}
        }
    }

    /// Show the first route entry if nothing is active yet
    fn adopt_first(&mut self) {
        if !self.attached {
            return;
        }
        if let Some(first) = self.navigator.adopt_first() {
            self.snap_to(first);
        }
    }

    fn recover(&mut self, loss: RouteLoss) -> Option<ActiveFallback> {
        if loss.target_dropped {
            self.transitions.cancel();
        }
        let settle = loss.target_dropped
            || (loss.active_fallback.is_some() && !self.navigator.is_transitioning());
        if settle && self.attached {
            if let Some(active) = self.navigator.active() {
                self.snap_to(active);
            }
        }
        if let Some(fallback) = loss.active_fallback {
            self.events.emit(&PresentationEvent::ActiveStepFallback(fallback));
        }
        loss.active_fallback
    }

    fn release_content(&mut self, id: StepId) {
        if let (Some(handle), Some(host)) = (self.content.remove(&id), self.content_host.as_mut()) {
            host.release(handle);
        }
    }
}

impl Observable<PresentationEvent> for Presentation {
    fn emitter(&mut self) -> &mut EventEmitter<PresentationEvent> {
        &mut self.events
    }
}
