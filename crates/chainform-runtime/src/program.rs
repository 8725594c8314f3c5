#![forbid(unsafe_code)]

//! Form program: the cooperative loop that owns every piece of a form.
//!
//! `FormProgram` holds the field controllers, the coordinator, the bus and
//! the backend, and is the only place where [`Cmd`]s meet the outside world.
//! Messages are processed strictly one at a time in arrival order; a message
//! produced while handling another is queued behind it.
//!
//! # Message flow
//!
//! ```text
//! backend ──input/completion──▶ Msg ──▶ controller ──Cmd──▶ backend
//!                                  │                 └────▶ coordinator ──SurfaceOp──▶ backend
//!                                  └─jump landed──▶ coordinator ──signal──▶ bus ──▶ every controller
//! ```
//!
//! # Invariants
//!
//! 1. Jump completions go to the coordinator; all other completions go to
//!    the controller that owns the animation.
//! 2. A landed jump is broadcast to every subscribed field, then the
//!    overlay is hidden, whether or not any field took the signal.
//! 3. Messages naming an unknown field are logged and dropped.

use std::collections::VecDeque;
use std::time::Duration;

use ahash::AHashMap;

use chainform_core::{AnimationCompletion, CompletionTag, FieldId, InputEvent};

use crate::backend::{Backend, Layer, Surface};
use crate::builder::Form;
use crate::bus::{Broadcast, CrossFieldSignal, SubId};
use crate::cmd::Cmd;
use crate::field::{ChainState, FieldController};
use crate::form::{FormCoordinator, FormDelegate, SurfaceOp};
use crate::headless::HeadlessBackend;

/// Messages processed by a [`FormProgram`].
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Focus or submit input for a field.
    Input(InputEvent),
    /// An animation stopped playing.
    AnimationStopped(AnimationCompletion),
    /// A hand-off signal injected from outside the form.
    Signal(CrossFieldSignal),
}

impl Msg {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input(_) => "Input",
            Self::AnimationStopped(_) => "AnimationStopped",
            Self::Signal(_) => "Signal",
        }
    }
}

impl From<InputEvent> for Msg {
    fn from(ev: InputEvent) -> Self {
        Self::Input(ev)
    }
}

impl From<AnimationCompletion> for Msg {
    fn from(c: AnimationCompletion) -> Self {
        Self::AnimationStopped(c)
    }
}

/// Single-threaded driver for one form.
pub struct FormProgram<B: Backend> {
    fields: AHashMap<FieldId, FieldController>,
    order: Vec<FieldId>,
    subs: AHashMap<SubId, FieldId>,
    coordinator: FormCoordinator,
    bus: Broadcast<CrossFieldSignal>,
    backend: B,
    queue: VecDeque<Msg>,
    processed: u64,
}

impl<B: Backend> FormProgram<B> {
    /// Take ownership of a built form and subscribe every field to the bus.
    pub fn new(form: Form, backend: B) -> Self {
        let mut bus = Broadcast::new();
        let controllers = form.into_controllers();
        let mut fields = AHashMap::with_capacity(controllers.len());
        let mut order = Vec::with_capacity(controllers.len());
        let mut subs = AHashMap::with_capacity(controllers.len());
        for controller in controllers {
            let id = controller.id();
            subs.insert(bus.subscribe(), id);
            order.push(id);
            fields.insert(id, controller);
        }
        tracing::debug!(target: "chainform.program", fields = order.len(), "program ready");
        Self {
            fields,
            order,
            subs,
            coordinator: FormCoordinator::new(),
            bus,
            backend,
            queue: VecDeque::new(),
            processed: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Chain state of `field`.
    pub fn state(&self, field: FieldId) -> Option<ChainState> {
        self.fields.get(&field).map(FieldController::state)
    }

    pub fn controller(&self, field: FieldId) -> Option<&FieldController> {
        self.fields.get(&field)
    }

    /// Controllers in visual order.
    pub fn controllers(&self) -> impl Iterator<Item = &FieldController> {
        self.order.iter().filter_map(|id| self.fields.get(id))
    }

    #[inline]
    pub fn coordinator(&self) -> &FormCoordinator {
        &self.coordinator
    }

    #[inline]
    pub fn bus(&self) -> &Broadcast<CrossFieldSignal> {
        &self.bus
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Messages handled so far.
    #[inline]
    pub fn processed(&self) -> u64 {
        self.processed
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Handle `msg` and everything it causes.
    pub fn dispatch(&mut self, msg: impl Into<Msg>) {
        self.queue.push_back(msg.into());
        while let Some(msg) = self.queue.pop_front() {
            self.update(msg);
        }
    }

    /// Drain the backend until it reports nothing new.
    ///
    /// Returns the number of backend events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let before = handled;
            while let Some(completion) = self.backend.poll_completion() {
                self.dispatch(Msg::AnimationStopped(completion));
                handled += 1;
            }
            while let Some(ev) = self.backend.poll_input() {
                self.dispatch(Msg::Input(ev));
                handled += 1;
            }
            if handled == before {
                return handled;
            }
        }
    }

    /// Unsubscribe every field and clear the overlay.
    pub fn shutdown(&mut self) {
        for sub in self.subs.keys() {
            self.bus.unsubscribe(*sub);
        }
        self.subs.clear();
        self.coordinator.on_hide_jump();
        self.apply_surface_ops();
        tracing::debug!(target: "chainform.program", processed = self.processed, "program shut down");
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    fn update(&mut self, msg: Msg) {
        self.processed += 1;
        let _span = tracing::debug_span!(target: "chainform.program", "update", msg = msg.name())
            .entered();
        match msg {
            Msg::Input(ev) => {
                let Some(controller) = self.fields.get_mut(&ev.field) else {
                    tracing::warn!(target: "chainform.program", field = %ev.field, "input for unknown field");
                    return;
                };
                let cmd = controller.handle_input(ev.input);
                self.execute_cmd(cmd);
            }
            Msg::AnimationStopped(completion) if completion.tag == CompletionTag::Jump => {
                if let Some(signal) = self.coordinator.jump_stopped(completion) {
                    self.broadcast(signal);
                    self.coordinator.on_hide_jump();
                    self.apply_surface_ops();
                }
            }
            Msg::AnimationStopped(completion) => {
                let Some(controller) = self.fields.get_mut(&completion.owner) else {
                    tracing::warn!(
                        target: "chainform.program",
                        field = %completion.owner,
                        animation = %completion.id,
                        "completion for unknown field"
                    );
                    return;
                };
                let cmd = controller.animation_stopped(completion);
                self.execute_cmd(cmd);
            }
            Msg::Signal(signal) => self.broadcast(signal),
        }
    }

    fn broadcast(&mut self, signal: CrossFieldSignal) {
        self.bus.publish(signal);
        for (sub, signal) in self.bus.drain() {
            let Some(field) = self.subs.get(&sub).copied() else {
                continue;
            };
            let Some(controller) = self.fields.get_mut(&field) else {
                continue;
            };
            let cmd = controller.receive(&signal);
            self.execute_cmd(cmd);
        }
    }

    fn execute_cmd(&mut self, cmd: Cmd) {
        tracing::trace!(target: "chainform.program", cmd = cmd.type_name(), "execute");
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.execute_cmd(c);
                }
            }
            Cmd::Play(request) => {
                self.backend.play(Surface::Field(request.owner), &request);
                if let Some(controller) = self.fields.get_mut(&request.owner) {
                    controller.animation_started(request.id);
                }
            }
            Cmd::Remove { field, layer } => {
                self.backend.remove(Surface::Field(field), layer);
            }
            Cmd::RequestFocus(field) => self.backend.request_focus(field),
            Cmd::ShowJump { request, successor } => {
                self.coordinator.on_show_jump(request, successor);
                self.apply_surface_ops();
            }
            Cmd::HideJump => {
                self.coordinator.on_hide_jump();
                self.apply_surface_ops();
            }
            Cmd::AllChainsComplete => {
                self.coordinator.on_all_chains_complete();
                self.apply_surface_ops();
            }
        }
    }

    fn apply_surface_ops(&mut self) {
        for op in self.coordinator.drain_ops() {
            match op {
                SurfaceOp::AttachJump(request) => self.backend.play(Surface::Overlay, &request),
                SurfaceOp::DetachJump(_) => self.backend.remove(Surface::Overlay, Layer::Jump),
                SurfaceOp::ReleaseFocus => self.backend.release_focus(),
            }
        }
    }
}

impl<B: Backend + std::fmt::Debug> std::fmt::Debug for FormProgram<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormProgram")
            .field("order", &self.order)
            .field("coordinator", &self.coordinator)
            .field("backend", &self.backend)
            .field("queued", &self.queue.len())
            .field("processed", &self.processed)
            .finish()
    }
}

impl FormProgram<HeadlessBackend> {
    /// Advance simulated time by `dt` and handle everything that results.
    pub fn advance(&mut self, dt: Duration) -> usize {
        self.backend.advance(dt);
        self.pump()
    }

    /// Step time by `step` until the backend is quiescent.
    ///
    /// Returns the number of steps taken, or `None` if `max_steps` ran out
    /// first.
    pub fn settle(&mut self, step: Duration, max_steps: usize) -> Option<usize> {
        self.pump();
        for taken in 0..=max_steps {
            if self.backend.is_quiescent() {
                return Some(taken);
            }
            if taken == max_steps {
                break;
            }
            self.advance(step);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FieldSpec;
    use crate::headless::BackendOp;
    use chainform_core::{AnimationKind, Rect};

    const A: FieldId = FieldId(1);
    const B: FieldId = FieldId(2);
    const FRAME: Duration = Duration::from_millis(16);

    fn program() -> FormProgram<HeadlessBackend> {
        let form = Form::builder()
            .field(FieldSpec::new(A, Rect::new(20.0, 100.0, 240.0, 30.0)))
            .field(FieldSpec::new(B, Rect::new(20.0, 160.0, 240.0, 30.0)))
            .link_in_order()
            .build()
            .unwrap();
        FormProgram::new(form, HeadlessBackend::new())
    }

    #[test]
    fn every_field_is_subscribed() {
        let p = program();
        assert_eq!(p.bus().subscriber_count(), 2);
        let ids: Vec<_> = p.controllers().map(FieldController::id).collect();
        assert_eq!(ids, vec![A, B]);
    }

    #[test]
    fn tap_plays_border_and_settles_shown() {
        let mut p = program();
        p.backend_mut().tap(A);
        p.pump();
        assert_eq!(p.state(A), Some(ChainState::Focused));
        assert_eq!(p.settle(FRAME, 100), Some(32));
        assert_eq!(p.state(A), Some(ChainState::BorderShown));
    }

    #[test]
    fn submit_moves_to_loading_once_circle_plays() {
        let mut p = program();
        p.dispatch(InputEvent::focus_gained(A));
        p.dispatch(InputEvent::submit(A));
        assert_eq!(p.state(A), Some(ChainState::Loading));
        assert_eq!(p.backend().plays_of(AnimationKind::CircleFill), 1);
    }

    #[test]
    fn unknown_field_is_dropped() {
        let mut p = program();
        p.dispatch(InputEvent::focus_gained(FieldId(99)));
        assert!(p.backend().log().is_empty());
        assert_eq!(p.processed(), 1);
    }

    #[test]
    fn injected_signal_wakes_only_the_named_field() {
        let mut p = program();
        p.dispatch(Msg::Signal(CrossFieldSignal::new(B)));
        assert_eq!(p.state(A), Some(ChainState::Idle));
        assert_eq!(p.state(B), Some(ChainState::Focused));
        assert!(p.backend().log().contains(&BackendOp::RequestFocus(B)));
    }

    #[test]
    fn shutdown_unsubscribes_everyone() {
        let mut p = program();
        p.shutdown();
        assert_eq!(p.bus().subscriber_count(), 0);
        p.dispatch(Msg::Signal(CrossFieldSignal::new(B)));
        assert_eq!(p.state(B), Some(ChainState::Idle));
    }
}
