#![forbid(unsafe_code)]

//! Deterministic in-memory backend.
//!
//! `HeadlessBackend` plays every request as a [`Tween`] and advances them only
//! when told to, so tests and the demo can step a form frame by frame or
//! complete animations one at a time. Focus is emulated the way a real input
//! backend behaves: moving focus reports `FocusLost` for the old field before
//! `FocusGained` for the new one.
//!
//! # Invariants
//!
//! 1. Exactly one completion is queued per played request.
//! 2. Playing on an occupied `(surface, layer)` or removing that layer
//!    interrupts the animation there (`finished == false`).
//! 3. Completions queued by one `advance` keep the order the requests were played.

use std::collections::VecDeque;
use std::time::Duration;

use ahash::AHashSet;

use chainform_core::{
    Animation, AnimationCompletion, AnimationId, AnimationKind, AnimationRequest, FieldId,
    InputEvent, KeyEvent, Tween,
};

use crate::backend::{AnimationBackend, FocusBackend, Layer, Surface};

/// Everything the runtime asked the backend to do, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOp {
    Play {
        surface: Surface,
        kind: AnimationKind,
        id: AnimationId,
    },
    Remove {
        surface: Surface,
        layer: Layer,
    },
    RequestFocus(FieldId),
    ReleaseFocus,
}

#[derive(Debug)]
struct Playing {
    surface: Surface,
    layer: Layer,
    request: AnimationRequest,
    tween: Tween,
}

/// Backend that keeps all state in memory and never touches a screen.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    playing: Vec<Playing>,
    visible: AHashSet<(Surface, Layer)>,
    completions: VecDeque<AnimationCompletion>,
    inputs: VecDeque<InputEvent>,
    focused: Option<FieldId>,
    log: Vec<BackendOp>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Simulated user
    // -----------------------------------------------------------------------

    /// The user taps a field.
    pub fn tap(&mut self, field: FieldId) {
        self.move_focus(Some(field));
    }

    /// The user presses a key in the focused field.
    ///
    /// Keys that do not map to a field input are ignored, as is any key while
    /// nothing is focused.
    pub fn press_key(&mut self, key: KeyEvent) {
        if let Some(field) = self.focused
            && let Some(ev) = InputEvent::from_key(field, key)
        {
            self.inputs.push_back(ev);
        }
    }

    /// Queue a raw input event.
    pub fn push_input(&mut self, ev: InputEvent) {
        self.inputs.push_back(ev);
    }

    // -----------------------------------------------------------------------
    // Time
    // -----------------------------------------------------------------------

    /// Advance every playing animation by `dt`, queueing completions.
    pub fn advance(&mut self, dt: Duration) {
        for playing in &mut self.playing {
            playing.tween.tick(dt);
        }
        let mut i = 0;
        while i < self.playing.len() {
            if self.playing[i].tween.is_complete() {
                let done = self.playing.remove(i);
                self.completions.push_back(done.request.finished());
            } else {
                i += 1;
            }
        }
    }

    /// Stop the oldest playing animation now. Returns its id.
    pub fn complete_next(&mut self, finished: bool) -> Option<AnimationId> {
        if self.playing.is_empty() {
            return None;
        }
        let done = self.playing.remove(0);
        if !finished {
            self.visible.remove(&(done.surface, done.layer));
        }
        self.completions
            .push_back(AnimationCompletion::for_request(&done.request, finished));
        Some(done.request.id)
    }

    /// Time until the next animation completes, if anything is playing.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.playing.iter().map(|p| p.tween.remaining()).min()
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Currently focused field.
    #[inline]
    pub fn focused(&self) -> Option<FieldId> {
        self.focused
    }

    /// Whether `layer` is on `surface`.
    pub fn is_visible(&self, surface: Surface, layer: Layer) -> bool {
        self.visible.contains(&(surface, layer))
    }

    /// Requests still playing, oldest first.
    pub fn playing(&self) -> impl Iterator<Item = &AnimationRequest> {
        self.playing.iter().map(|p| &p.request)
    }

    /// Progress value of a playing animation.
    pub fn value_of(&self, id: AnimationId) -> Option<f32> {
        self.playing
            .iter()
            .find(|p| p.request.id == id)
            .map(|p| p.tween.value())
    }

    /// Every op requested so far.
    #[inline]
    pub fn log(&self) -> &[BackendOp] {
        &self.log
    }

    /// Take the op log, leaving it empty.
    pub fn take_log(&mut self) -> Vec<BackendOp> {
        std::mem::take(&mut self.log)
    }

    /// Number of `Play` ops of `kind` so far.
    pub fn plays_of(&self, kind: AnimationKind) -> usize {
        self.log
            .iter()
            .filter(|op| matches!(op, BackendOp::Play { kind: k, .. } if *k == kind))
            .count()
    }

    /// Whether nothing is playing and nothing is queued.
    pub fn is_quiescent(&self) -> bool {
        self.playing.is_empty() && self.completions.is_empty() && self.inputs.is_empty()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn interrupt(&mut self, surface: Surface, layer: Layer) {
        if let Some(pos) = self
            .playing
            .iter()
            .position(|p| p.surface == surface && p.layer == layer)
        {
            let cut = self.playing.remove(pos);
            self.completions.push_back(cut.request.interrupted());
        }
    }

    fn move_focus(&mut self, to: Option<FieldId>) {
        if self.focused == to {
            return;
        }
        if let Some(old) = self.focused.take() {
            self.inputs.push_back(InputEvent::focus_lost(old));
        }
        if let Some(new) = to {
            self.inputs.push_back(InputEvent::focus_gained(new));
        }
        self.focused = to;
    }
}

impl AnimationBackend for HeadlessBackend {
    fn play(&mut self, surface: Surface, request: &AnimationRequest) {
        let layer = Layer::for_kind(request.kind);
        self.interrupt(surface, layer);
        self.log.push(BackendOp::Play {
            surface,
            kind: request.kind,
            id: request.id,
        });
        self.visible.insert((surface, layer));
        self.playing.push(Playing {
            surface,
            layer,
            request: request.clone(),
            tween: request.tween(),
        });
    }

    fn remove(&mut self, surface: Surface, layer: Layer) {
        self.log.push(BackendOp::Remove { surface, layer });
        self.interrupt(surface, layer);
        self.visible.remove(&(surface, layer));
    }

    fn poll_completion(&mut self) -> Option<AnimationCompletion> {
        self.completions.pop_front()
    }
}

impl FocusBackend for HeadlessBackend {
    fn request_focus(&mut self, field: FieldId) {
        self.log.push(BackendOp::RequestFocus(field));
        self.move_focus(Some(field));
    }

    fn release_focus(&mut self) {
        self.log.push(BackendOp::ReleaseFocus);
        self.move_focus(None);
    }

    fn poll_input(&mut self) -> Option<InputEvent> {
        self.inputs.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainform_core::{Easing, FieldInput, Geometry, KeyCode, Rect};

    const A: FieldId = FieldId(1);
    const B: FieldId = FieldId(2);

    fn border(owner: FieldId, seq: u32, ms: u64) -> AnimationRequest {
        AnimationRequest::new(
            AnimationId::for_field(owner, seq),
            owner,
            AnimationKind::BorderSlide,
            Geometry::Slide {
                direction: owner.chain_direction(),
                frame: Rect::from_size(100.0, 2.0),
            },
        )
        .timing(Duration::from_millis(ms), Easing::EaseInOut)
    }

    #[test]
    fn advance_completes_in_play_order() {
        let mut be = HeadlessBackend::new();
        let a = border(A, 0, 100);
        let b = border(B, 0, 50);
        be.play(Surface::Field(A), &a);
        be.play(Surface::Field(B), &b);
        be.advance(Duration::from_millis(60));
        assert_eq!(be.poll_completion(), Some(b.finished()));
        assert_eq!(be.poll_completion(), None);
        be.advance(Duration::from_millis(60));
        assert_eq!(be.poll_completion(), Some(a.finished()));
        assert!(be.is_visible(Surface::Field(A), Layer::Border));
    }

    #[test]
    fn replaying_a_layer_interrupts_the_old_animation() {
        let mut be = HeadlessBackend::new();
        let first = border(A, 0, 100);
        let second = border(A, 1, 100);
        be.play(Surface::Field(A), &first);
        be.play(Surface::Field(A), &second);
        assert_eq!(be.poll_completion(), Some(first.interrupted()));
        assert_eq!(be.playing().count(), 1);
    }

    #[test]
    fn remove_interrupts_and_hides() {
        let mut be = HeadlessBackend::new();
        let req = border(A, 0, 100);
        be.play(Surface::Field(A), &req);
        be.remove(Surface::Field(A), Layer::Border);
        assert_eq!(be.poll_completion(), Some(req.interrupted()));
        assert!(!be.is_visible(Surface::Field(A), Layer::Border));
    }

    #[test]
    fn complete_next_can_report_interruption() {
        let mut be = HeadlessBackend::new();
        let req = border(A, 0, 100);
        be.play(Surface::Field(A), &req);
        assert_eq!(be.complete_next(false), Some(req.id));
        assert_eq!(be.poll_completion(), Some(req.interrupted()));
        assert_eq!(be.complete_next(true), None);
    }

    #[test]
    fn focus_moves_report_lost_before_gained() {
        let mut be = HeadlessBackend::new();
        be.tap(A);
        be.request_focus(B);
        be.release_focus();
        let inputs: Vec<_> = std::iter::from_fn(|| be.poll_input()).collect();
        assert_eq!(
            inputs,
            vec![
                InputEvent::focus_gained(A),
                InputEvent::focus_lost(A),
                InputEvent::focus_gained(B),
                InputEvent::focus_lost(B),
            ]
        );
        assert_eq!(be.focused(), None);
    }

    #[test]
    fn tapping_the_focused_field_is_silent() {
        let mut be = HeadlessBackend::new();
        be.tap(A);
        be.poll_input();
        be.tap(A);
        assert_eq!(be.poll_input(), None);
    }

    #[test]
    fn enter_submits_focused_field_only() {
        let mut be = HeadlessBackend::new();
        be.press_key(KeyEvent::new(KeyCode::Enter));
        assert_eq!(be.poll_input(), None);
        be.tap(B);
        be.poll_input();
        be.press_key(KeyEvent::new(KeyCode::Char('x')));
        be.press_key(KeyEvent::new(KeyCode::Enter));
        assert_eq!(
            be.poll_input(),
            Some(InputEvent::new(B, FieldInput::Submit))
        );
    }

    #[test]
    fn next_deadline_tracks_shortest_remaining() {
        let mut be = HeadlessBackend::new();
        assert_eq!(be.next_deadline(), None);
        be.play(Surface::Field(A), &border(A, 0, 100));
        be.play(Surface::Field(B), &border(B, 0, 40));
        assert_eq!(be.next_deadline(), Some(Duration::from_millis(40)));
    }
}
