#![forbid(unsafe_code)]

//! Form coordinator: owner of the shared overlay surface.
//!
//! The coordinator has no chain of its own. It relays three requests from
//! field controllers ([`FormDelegate`]) and owns the lifetime of the one jump
//! animation that may be on the overlay at a time. Backend work is recorded
//! as [`SurfaceOp`]s that the program applies in order.
//!
//! # Invariants
//!
//! 1. At most one jump overlay is attached; showing a new one first detaches
//!    the previous one.
//! 2. Hiding with nothing attached is a no-op and records no op.
//! 3. A jump completion produces a hand-off signal only if it finished and
//!    matches the attached overlay.

use chainform_core::{AnimationCompletion, AnimationId, AnimationRequest, FieldId};

use crate::bus::CrossFieldSignal;

/// Requests from a field controller to the form that contains it.
pub trait FormDelegate {
    /// Put `request` on the shared overlay, remembering `successor` for the hand-off.
    fn on_show_jump(&mut self, request: AnimationRequest, successor: FieldId);

    /// Clear the shared overlay. Idempotent.
    fn on_hide_jump(&mut self);

    /// The last chain has finished; release focus from the whole form.
    fn on_all_chains_complete(&mut self);
}

/// Backend work recorded by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    /// Play a jump animation on the overlay.
    AttachJump(AnimationRequest),
    /// Remove the jump animation from the overlay.
    DetachJump(AnimationId),
    /// Release input focus from every field.
    ReleaseFocus,
}

/// The jump currently attached to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpOverlay {
    pub animation: AnimationId,
    /// Field whose chain produced the jump.
    pub origin: FieldId,
    /// Field to notify when the jump lands.
    pub successor: FieldId,
    /// Whether the jump animation has finished playing.
    pub landed: bool,
}

/// Relay between field controllers and the shared overlay.
#[derive(Debug, Default)]
pub struct FormCoordinator {
    overlay: Option<JumpOverlay>,
    ops: Vec<SurfaceOp>,
    teardowns: u64,
    completions: u64,
}

impl FormCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The attached jump, if any.
    #[inline]
    pub fn overlay(&self) -> Option<&JumpOverlay> {
        self.overlay.as_ref()
    }

    /// Overlay teardowns performed so far.
    #[inline]
    pub fn teardowns(&self) -> u64 {
        self.teardowns
    }

    /// Times `on_all_chains_complete` has fired.
    #[inline]
    pub fn completions(&self) -> u64 {
        self.completions
    }

    /// Take recorded backend work in order.
    pub fn drain_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// A jump animation stopped. Returns the hand-off signal to broadcast.
    pub fn jump_stopped(&mut self, completion: AnimationCompletion) -> Option<CrossFieldSignal> {
        let Some(overlay) = self.overlay.as_mut() else {
            tracing::trace!(
                target: "chainform.form",
                animation = %completion.id,
                "jump stopped with no overlay attached"
            );
            return None;
        };
        if overlay.animation != completion.id {
            tracing::trace!(
                target: "chainform.form",
                animation = %completion.id,
                attached = %overlay.animation,
                "stale jump completion"
            );
            return None;
        }
        if !completion.finished {
            tracing::debug!(
                target: "chainform.form",
                animation = %completion.id,
                "jump interrupted; no hand-off"
            );
            return None;
        }
        overlay.landed = true;
        tracing::debug!(
            target: "chainform.form",
            origin = %overlay.origin,
            successor = %overlay.successor,
            "jump landed"
        );
        Some(CrossFieldSignal::new(overlay.successor))
    }

    fn detach(&mut self) -> bool {
        match self.overlay.take() {
            Some(old) => {
                self.teardowns += 1;
                self.ops.push(SurfaceOp::DetachJump(old.animation));
                tracing::debug!(
                    target: "chainform.form",
                    animation = %old.animation,
                    landed = old.landed,
                    "overlay cleared"
                );
                if !old.landed {
                    tracing::debug!(
                        target: "chainform.form",
                        origin = %old.origin,
                        successor = %old.successor,
                        "jump cleared before landing; successor not notified"
                    );
                }
                true
            }
            None => false,
        }
    }
}

impl FormDelegate for FormCoordinator {
    fn on_show_jump(&mut self, request: AnimationRequest, successor: FieldId) {
        self.detach();
        self.overlay = Some(JumpOverlay {
            animation: request.id,
            origin: request.owner,
            successor,
            landed: false,
        });
        tracing::debug!(
            target: "chainform.form",
            origin = %request.owner,
            successor = %successor,
            animation = %request.id,
            "overlay jump attached"
        );
        self.ops.push(SurfaceOp::AttachJump(request));
    }

    fn on_hide_jump(&mut self) {
        if !self.detach() {
            tracing::trace!(target: "chainform.form", "hide with empty overlay");
        }
    }

    fn on_all_chains_complete(&mut self) {
        self.completions += 1;
        tracing::info!(target: "chainform.form", "all chains complete; releasing focus");
        self.ops.push(SurfaceOp::ReleaseFocus);
    }
}
