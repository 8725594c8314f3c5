#![forbid(unsafe_code)]

//! Field controller: the animation chain state machine for one input field.
//!
//! ```text
//! Idle ─focus─▶ Focused ─border done─▶ BorderShown
//!                  │                       │
//!                  └────────submit─────────┘
//!                              ▼
//!                          Submitted ─started─▶ Loading ─circle done─▶ CheckMarked
//!                                                                        │ tick done
//!                                              successor? ┌──────────────┴─────────────┐
//!                                                  yes    ▼                            ▼ no
//!                                                     JumpingOut                   Completed
//! ```
//!
//! # Invariants
//!
//! 1. At most one chain animation is in flight per field (`in_flight`).
//! 2. The successor link is fixed at construction; there is no setter.
//! 3. `direction` is derived from the field identity and never changes.
//! 4. A completion is acted on only if it finished, belongs to the current
//!    epoch, is the in-flight animation, and its tag fits the current state.
//!    Anything else is dropped and the chain stays where it is.
//! 5. A cross-field signal naming another field never changes state.
//!
//! # Failure Modes
//!
//! - Interrupted animation (`finished == false`): dropped; the chain stalls
//!   until focus leaves the field, which resets it to `Idle`.
//! - Submit outside `Focused`/`BorderShown`: ignored.

use std::fmt;
use std::time::Duration;

use web_time::Instant;

use chainform_core::{
    AnimationCompletion, AnimationId, AnimationKind, AnimationRequest, ChainDirection,
    CompletionTag, FieldId, FieldInput, Geometry, JumpArc, Rect,
};

use crate::backend::Layer;
use crate::bus::CrossFieldSignal;
use crate::cmd::Cmd;
use crate::config::{ChainConfig, StepTiming, TICK_STROKE_FROM};

/// Where a field is in its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainState {
    /// Not focused, no border.
    Idle,
    /// Focused; border slide requested.
    Focused,
    /// Focused; border fully shown.
    BorderShown,
    /// Submit accepted; loader requested but not yet playing.
    Submitted,
    /// Loader circle filling.
    Loading,
    /// Checkmark stroking.
    CheckMarked,
    /// Chain finished and handed to the successor through a jump.
    JumpingOut,
    /// Chain finished with no successor.
    Completed,
}

impl ChainState {
    /// Whether a submit would be accepted.
    #[inline]
    #[must_use]
    pub const fn is_accepting_submit(self) -> bool {
        matches!(self, Self::Focused | Self::BorderShown)
    }

    /// Whether the chain is past submit and not yet finished.
    #[inline]
    #[must_use]
    pub const fn is_mid_chain(self) -> bool {
        matches!(self, Self::Submitted | Self::Loading | Self::CheckMarked)
    }

    /// Whether the chain has finished, one way or the other.
    #[inline]
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::JumpingOut | Self::Completed)
    }

    /// Whether the field can be woken by a cross-field signal.
    ///
    /// A finished chain is at rest whether it jumped or completed.
    #[inline]
    #[must_use]
    pub const fn is_at_rest(self) -> bool {
        matches!(self, Self::Idle | Self::JumpingOut | Self::Completed)
    }

    /// Whether the field's bottom border is (or is becoming) visible.
    #[inline]
    #[must_use]
    pub const fn shows_border(self) -> bool {
        matches!(
            self,
            Self::Focused | Self::BorderShown | Self::Submitted | Self::Loading | Self::CheckMarked
        )
    }
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlight {
    id: AnimationId,
    tag: CompletionTag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Successor {
    id: FieldId,
    frame: Rect,
}

/// Chain state machine for one field.
#[derive(Debug, Clone)]
pub struct FieldController {
    id: FieldId,
    frame: Rect,
    successor: Option<Successor>,
    direction: ChainDirection,
    config: ChainConfig,
    state: ChainState,
    epoch: u32,
    next_seq: u32,
    in_flight: Option<InFlight>,
    chain_started: Option<Instant>,
    chains_completed: u64,
    handoffs: u64,
    dropped_completions: u64,
}

impl FieldController {
    /// Create a controller with no successor.
    #[must_use]
    pub fn new(id: FieldId, frame: Rect, config: ChainConfig) -> Self {
        Self {
            id,
            frame,
            successor: None,
            direction: id.chain_direction(),
            config,
            state: ChainState::Idle,
            epoch: 0,
            next_seq: 0,
            in_flight: None,
            chain_started: None,
            chains_completed: 0,
            handoffs: 0,
            dropped_completions: 0,
        }
    }

    /// Create a controller that hands off to `successor` (laid out at `successor_frame`).
    #[must_use]
    pub fn with_successor(
        id: FieldId,
        frame: Rect,
        config: ChainConfig,
        successor: FieldId,
        successor_frame: Rect,
    ) -> Self {
        let mut controller = Self::new(id, frame, config);
        controller.successor = Some(Successor {
            id: successor,
            frame: successor_frame,
        });
        controller
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn id(&self) -> FieldId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    #[inline]
    #[must_use]
    pub fn successor(&self) -> Option<FieldId> {
        self.successor.map(|s| s.id)
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> ChainDirection {
        self.direction
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Incremented whenever a chain is abandoned.
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Id of the chain animation currently in flight, if any.
    #[inline]
    #[must_use]
    pub fn in_flight(&self) -> Option<AnimationId> {
        self.in_flight.map(|f| f.id)
    }

    /// Chains that ended in `Completed`.
    #[inline]
    #[must_use]
    pub fn chains_completed(&self) -> u64 {
        self.chains_completed
    }

    /// Chains that ended in a jump to the successor.
    #[inline]
    #[must_use]
    pub fn handoffs(&self) -> u64 {
        self.handoffs
    }

    /// Completions ignored as interrupted, stale, or out of place.
    #[inline]
    #[must_use]
    pub fn dropped_completions(&self) -> u64 {
        self.dropped_completions
    }

    // -----------------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------------

    /// React to a focus or submit input.
    pub fn handle_input(&mut self, input: FieldInput) -> Cmd {
        match input {
            FieldInput::FocusGained => self.focus_gained(),
            FieldInput::FocusLost => self.focus_lost(),
            FieldInput::Submit => self.submit(),
        }
    }

    /// The backend has started playing `id`.
    ///
    /// Moves `Submitted` to `Loading` once the loader is actually on screen.
    pub fn animation_started(&mut self, id: AnimationId) {
        if self.state == ChainState::Submitted
            && self
                .in_flight
                .is_some_and(|f| f.id == id && f.tag == CompletionTag::Circle)
        {
            self.transition(ChainState::Loading);
        }
    }

    /// React to one of this field's animations stopping.
    pub fn animation_stopped(&mut self, completion: AnimationCompletion) -> Cmd {
        if !completion.finished {
            return self.drop_completion(completion, "interrupted");
        }
        if completion.epoch != self.epoch {
            return self.drop_completion(completion, "stale epoch");
        }
        if self.in_flight.map(|f| f.id) != Some(completion.id) {
            return self.drop_completion(completion, "not in flight");
        }

        match (self.state, completion.tag) {
            (ChainState::Focused, CompletionTag::Border) => {
                self.in_flight = None;
                self.transition(ChainState::BorderShown);
                Cmd::none()
            }
            (ChainState::Submitted | ChainState::Loading, CompletionTag::Circle) => {
                let request = self.request(
                    AnimationKind::CheckmarkStroke,
                    self.config.tick,
                    Geometry::Stroke {
                        from: TICK_STROKE_FROM,
                        to: 1.0,
                    },
                );
                self.transition(ChainState::CheckMarked);
                self.start(request)
            }
            (ChainState::CheckMarked, CompletionTag::Tick) => {
                self.in_flight = None;
                self.finish_chain()
            }
            _ => self.drop_completion(completion, "tag does not fit state"),
        }
    }

    /// React to a cross-field signal from the bus.
    ///
    /// Only a signal naming this field is considered, and only while the
    /// field is at rest.
    pub fn receive(&mut self, signal: &CrossFieldSignal) -> Cmd {
        if !signal.is_for(self.id) {
            return Cmd::none();
        }
        if !self.state.is_at_rest() {
            tracing::debug!(
                target: "chainform.field",
                field = %self.id,
                state = %self.state,
                "hand-off ignored; field is busy"
            );
            return Cmd::none();
        }

        tracing::debug!(target: "chainform.field", field = %self.id, "taking over from predecessor");
        let border = self.border_request();
        self.transition(ChainState::Focused);
        Cmd::batch(vec![
            self.start(border),
            Cmd::RequestFocus(self.id),
            Cmd::HideJump,
        ])
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    fn focus_gained(&mut self) -> Cmd {
        match self.state {
            ChainState::Idle | ChainState::JumpingOut | ChainState::Completed => {
                let border = self.border_request();
                self.transition(ChainState::Focused);
                self.start(border)
            }
            // Border already shown or on its way; a focus echo is harmless.
            _ => Cmd::none(),
        }
    }

    fn focus_lost(&mut self) -> Cmd {
        if !self.state.shows_border() {
            return Cmd::none();
        }
        let was_mid_chain = self.state.is_mid_chain();
        self.abandon_chain();
        let remove_border = Cmd::Remove {
            field: self.id,
            layer: Layer::Border,
        };
        if was_mid_chain {
            Cmd::batch(vec![
                remove_border,
                Cmd::Remove {
                    field: self.id,
                    layer: Layer::Loader,
                },
            ])
        } else {
            remove_border
        }
    }

    fn submit(&mut self) -> Cmd {
        if !self.state.is_accepting_submit() {
            tracing::trace!(
                target: "chainform.field",
                field = %self.id,
                state = %self.state,
                "submit ignored"
            );
            return Cmd::none();
        }
        self.chain_started = Some(Instant::now());
        let request = self.request(
            AnimationKind::CircleFill,
            self.config.circle,
            Geometry::Stroke { from: 0.0, to: 1.0 },
        );
        self.transition(ChainState::Submitted);
        self.start(request)
    }

    fn finish_chain(&mut self) -> Cmd {
        let elapsed_ms = self
            .chain_started
            .take()
            .map(|t| saturating_millis(t.elapsed()));
        let remove_border = Cmd::Remove {
            field: self.id,
            layer: Layer::Border,
        };

        match self.successor {
            Some(successor) => {
                let arc = JumpArc::between(self.frame, successor.frame, self.direction);
                let request =
                    self.request(AnimationKind::JumpArc, self.config.jump, Geometry::Arc(arc));
                self.handoffs += 1;
                self.transition(ChainState::JumpingOut);
                tracing::info!(
                    target: "chainform.field",
                    field = %self.id,
                    successor = %successor.id,
                    direction = %self.direction,
                    elapsed_ms = elapsed_ms,
                    "chain complete; jumping to successor"
                );
                Cmd::batch(vec![
                    remove_border,
                    Cmd::ShowJump {
                        request,
                        successor: successor.id,
                    },
                ])
            }
            None => {
                self.chains_completed += 1;
                self.transition(ChainState::Completed);
                tracing::info!(
                    target: "chainform.field",
                    field = %self.id,
                    elapsed_ms = elapsed_ms,
                    "last chain complete"
                );
                Cmd::batch(vec![remove_border, Cmd::AllChainsComplete])
            }
        }
    }

    fn abandon_chain(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.in_flight = None;
        self.chain_started = None;
        self.transition(ChainState::Idle);
    }

    fn transition(&mut self, to: ChainState) {
        tracing::debug!(
            target: "chainform.field",
            field = %self.id,
            from = %self.state,
            to = %to,
            epoch = self.epoch,
            "chain transition"
        );
        self.state = to;
    }

    fn drop_completion(&mut self, completion: AnimationCompletion, reason: &'static str) -> Cmd {
        self.dropped_completions += 1;
        tracing::trace!(
            target: "chainform.field",
            field = %self.id,
            animation = %completion.id,
            tag = %completion.tag,
            state = %self.state,
            reason,
            "completion dropped"
        );
        Cmd::none()
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    fn border_request(&mut self) -> AnimationRequest {
        let frame = self.frame.border_frame(self.config.line_width);
        self.request(
            AnimationKind::BorderSlide,
            self.config.border,
            Geometry::Slide {
                direction: self.direction,
                frame,
            },
        )
    }

    fn request(
        &mut self,
        kind: AnimationKind,
        timing: StepTiming,
        geometry: Geometry,
    ) -> AnimationRequest {
        let id = AnimationId::for_field(self.id, self.next_seq);
        self.next_seq = self.next_seq.wrapping_add(1);
        AnimationRequest::new(id, self.id, kind, geometry)
            .timing(timing.duration(), timing.easing)
            .epoch(self.epoch)
    }

    /// Mark a field-local request as the one in flight and play it.
    fn start(&mut self, request: AnimationRequest) -> Cmd {
        self.in_flight = Some(InFlight {
            id: request.id,
            tag: request.tag,
        });
        Cmd::Play(request)
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: FieldId = FieldId(1);
    const B: FieldId = FieldId(2);

    fn frame_a() -> Rect {
        Rect::new(20.0, 100.0, 240.0, 30.0)
    }

    fn frame_b() -> Rect {
        Rect::new(20.0, 160.0, 240.0, 30.0)
    }

    fn leaf(id: FieldId) -> FieldController {
        FieldController::new(id, frame_a(), ChainConfig::default())
    }

    fn linked() -> FieldController {
        FieldController::with_successor(A, frame_a(), ChainConfig::default(), B, frame_b())
    }

    fn played(cmd: &Cmd) -> Vec<AnimationRequest> {
        cmd.clone()
            .into_leaves()
            .into_iter()
            .filter_map(|c| match c {
                Cmd::Play(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    fn only_play(cmd: &Cmd) -> AnimationRequest {
        let reqs = played(cmd);
        assert_eq!(reqs.len(), 1, "expected one Play in {cmd:?}");
        reqs.into_iter().next().unwrap()
    }

    /// Drive a field from Idle to CheckMarked; returns the checkmark request.
    fn run_to_checkmark(field: &mut FieldController) -> AnimationRequest {
        let border = only_play(&field.handle_input(FieldInput::FocusGained));
        field.animation_stopped(border.finished());
        let circle = only_play(&field.handle_input(FieldInput::Submit));
        field.animation_started(circle.id);
        only_play(&field.animation_stopped(circle.finished()))
    }

    #[test]
    fn focus_requests_border_slide() {
        let mut f = leaf(A);
        let req = only_play(&f.handle_input(FieldInput::FocusGained));
        assert_eq!(req.kind, AnimationKind::BorderSlide);
        assert_eq!(f.state(), ChainState::Focused);
        match req.geometry {
            Geometry::Slide { direction, .. } => assert_eq!(direction, ChainDirection::LeftToRight),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn repeated_focus_does_not_redraw_border() {
        let mut f = leaf(A);
        f.handle_input(FieldInput::FocusGained);
        assert!(f.handle_input(FieldInput::FocusGained).is_none());
        assert_eq!(f.state(), ChainState::Focused);
    }

    #[test]
    fn border_completion_marks_border_shown() {
        let mut f = leaf(A);
        let border = only_play(&f.handle_input(FieldInput::FocusGained));
        assert!(f.animation_stopped(border.finished()).is_none());
        assert_eq!(f.state(), ChainState::BorderShown);
        assert_eq!(f.in_flight(), None);
    }

    #[test]
    fn submit_requests_circle_then_loading_on_start() {
        let mut f = leaf(A);
        f.handle_input(FieldInput::FocusGained);
        let circle = only_play(&f.handle_input(FieldInput::Submit));
        assert_eq!(circle.kind, AnimationKind::CircleFill);
        assert_eq!(f.state(), ChainState::Submitted);
        f.animation_started(circle.id);
        assert_eq!(f.state(), ChainState::Loading);
    }

    #[test]
    fn submit_while_idle_is_noop() {
        let mut f = leaf(A);
        assert!(f.handle_input(FieldInput::Submit).is_none());
        assert_eq!(f.state(), ChainState::Idle);
    }

    #[test]
    fn submit_while_loading_is_noop() {
        let mut f = leaf(A);
        f.handle_input(FieldInput::FocusGained);
        let circle = only_play(&f.handle_input(FieldInput::Submit));
        f.animation_started(circle.id);
        let before = (f.state(), f.in_flight(), f.epoch());
        assert!(f.handle_input(FieldInput::Submit).is_none());
        assert_eq!((f.state(), f.in_flight(), f.epoch()), before);
    }

    #[test]
    fn circle_completion_requests_tick_from_point_eight() {
        let mut f = leaf(A);
        let tick = run_to_checkmark(&mut f);
        assert_eq!(tick.kind, AnimationKind::CheckmarkStroke);
        assert_eq!(tick.tag, CompletionTag::Tick);
        assert_eq!(tick.geometry, Geometry::Stroke { from: 0.8, to: 1.0 });
        assert_eq!(f.state(), ChainState::CheckMarked);
    }

    #[test]
    fn leaf_chain_reports_all_complete() {
        let mut f = leaf(B);
        let tick = run_to_checkmark(&mut f);
        let cmd = f.animation_stopped(tick.finished());
        let leaves = cmd.into_leaves();
        assert_eq!(
            leaves,
            vec![
                Cmd::Remove {
                    field: B,
                    layer: Layer::Border
                },
                Cmd::AllChainsComplete,
            ]
        );
        assert_eq!(f.state(), ChainState::Completed);
        assert_eq!(f.chains_completed(), 1);
        assert_eq!(f.handoffs(), 0);
    }

    #[test]
    fn linked_chain_removes_border_then_shows_jump() {
        let mut f = linked();
        let tick = run_to_checkmark(&mut f);
        let leaves = f.animation_stopped(tick.finished()).into_leaves();
        assert_eq!(leaves.len(), 2);
        assert_eq!(
            leaves[0],
            Cmd::Remove {
                field: A,
                layer: Layer::Border
            }
        );
        match &leaves[1] {
            Cmd::ShowJump { request, successor } => {
                assert_eq!(*successor, B);
                assert_eq!(request.kind, AnimationKind::JumpArc);
                assert_eq!(request.owner, A);
                match request.geometry {
                    Geometry::Arc(arc) => {
                        assert!(arc.clockwise, "odd id jumps clockwise");
                        assert!((arc.radius - 30.0).abs() < 1e-4);
                    }
                    other => panic!("unexpected geometry {other:?}"),
                }
            }
            other => panic!("expected ShowJump, got {other:?}"),
        }
        assert_eq!(f.state(), ChainState::JumpingOut);
        assert_eq!(f.handoffs(), 1);
    }

    #[test]
    fn interrupted_completion_stalls_chain() {
        let mut f = leaf(A);
        f.handle_input(FieldInput::FocusGained);
        let circle = only_play(&f.handle_input(FieldInput::Submit));
        f.animation_started(circle.id);
        assert!(f.animation_stopped(circle.interrupted()).is_none());
        assert_eq!(f.state(), ChainState::Loading);
        assert_eq!(f.dropped_completions(), 1);
    }

    #[test]
    fn focus_lost_mid_chain_resets_and_drops_late_completion() {
        let mut f = leaf(A);
        f.handle_input(FieldInput::FocusGained);
        let circle = only_play(&f.handle_input(FieldInput::Submit));
        f.animation_started(circle.id);

        let cmd = f.handle_input(FieldInput::FocusLost);
        assert_eq!(cmd.count(), 2);
        assert_eq!(f.state(), ChainState::Idle);
        assert_eq!(f.epoch(), 1);

        assert!(f.animation_stopped(circle.finished()).is_none());
        assert_eq!(f.state(), ChainState::Idle);
        assert_eq!(f.dropped_completions(), 1);
    }

    #[test]
    fn focus_lost_before_submit_only_removes_border() {
        let mut f = leaf(A);
        f.handle_input(FieldInput::FocusGained);
        let cmd = f.handle_input(FieldInput::FocusLost);
        assert_eq!(
            cmd,
            Cmd::Remove {
                field: A,
                layer: Layer::Border
            }
        );
        assert_eq!(f.state(), ChainState::Idle);
    }

    #[test]
    fn focus_lost_after_handoff_keeps_state() {
        let mut f = linked();
        let tick = run_to_checkmark(&mut f);
        f.animation_stopped(tick.finished());
        assert!(f.handle_input(FieldInput::FocusLost).is_none());
        assert_eq!(f.state(), ChainState::JumpingOut);
    }

    #[test]
    fn refocus_after_completion_restarts_chain() {
        let mut f = leaf(A);
        let tick = run_to_checkmark(&mut f);
        f.animation_stopped(tick.finished());
        let req = only_play(&f.handle_input(FieldInput::FocusGained));
        assert_eq!(req.kind, AnimationKind::BorderSlide);
        assert_eq!(f.state(), ChainState::Focused);
    }

    #[test]
    fn signal_for_other_field_is_ignored() {
        let mut f = leaf(A);
        assert!(f.receive(&CrossFieldSignal::new(B)).is_none());
        assert_eq!(f.state(), ChainState::Idle);
        assert_eq!(f.in_flight(), None);
    }

    #[test]
    fn signal_for_self_takes_over() {
        let mut f = leaf(B);
        let leaves = f.receive(&CrossFieldSignal::new(B)).into_leaves();
        assert_eq!(leaves.len(), 3);
        assert!(matches!(&leaves[0], Cmd::Play(req) if req.kind == AnimationKind::BorderSlide));
        assert_eq!(leaves[1], Cmd::RequestFocus(B));
        assert_eq!(leaves[2], Cmd::HideJump);
        assert_eq!(f.state(), ChainState::Focused);
    }

    #[test]
    fn signal_after_handoff_takes_over_again() {
        let mut f = linked();
        let tick = run_to_checkmark(&mut f);
        f.animation_stopped(tick.finished());
        assert_eq!(f.state(), ChainState::JumpingOut);

        let leaves = f.receive(&CrossFieldSignal::new(A)).into_leaves();
        assert!(matches!(&leaves[0], Cmd::Play(req) if req.kind == AnimationKind::BorderSlide));
        assert_eq!(f.state(), ChainState::Focused);
    }

    #[test]
    fn finished_states_are_at_rest() {
        assert!(ChainState::Idle.is_at_rest());
        assert!(ChainState::JumpingOut.is_at_rest());
        assert!(ChainState::Completed.is_at_rest());
        assert!(!ChainState::BorderShown.is_at_rest());
        assert!(!ChainState::Loading.is_at_rest());
    }

    #[test]
    fn signal_while_busy_is_ignored() {
        let mut f = leaf(B);
        f.handle_input(FieldInput::FocusGained);
        f.handle_input(FieldInput::Submit);
        let before = f.state();
        assert!(f.receive(&CrossFieldSignal::new(B)).is_none());
        assert_eq!(f.state(), before);
    }

    #[test]
    fn even_field_slides_right_to_left() {
        let mut f = leaf(B);
        let req = only_play(&f.handle_input(FieldInput::FocusGained));
        assert!(matches!(
            req.geometry,
            Geometry::Slide {
                direction: ChainDirection::RightToLeft,
                ..
            }
        ));
    }

    #[test]
    fn request_ids_are_unique_per_field() {
        let mut f = leaf(A);
        let a = only_play(&f.handle_input(FieldInput::FocusGained));
        f.handle_input(FieldInput::FocusLost);
        let b = only_play(&f.handle_input(FieldInput::FocusGained));
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.owner(), A);
        assert_eq!(b.epoch, 1);
    }

    #[test]
    fn elapsed_millis_saturate() {
        assert_eq!(saturating_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn completion_with_wrong_tag_is_dropped() {
        let mut f = leaf(A);
        let border = only_play(&f.handle_input(FieldInput::FocusGained));
        let mut forged = border.finished();
        forged.tag = CompletionTag::Tick;
        assert!(f.animation_stopped(forged).is_none());
        assert_eq!(f.state(), ChainState::Focused);
        assert_eq!(f.dropped_completions(), 1);
    }
}
