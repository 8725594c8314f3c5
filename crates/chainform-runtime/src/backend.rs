#![forbid(unsafe_code)]

//! Backend traits: the boundary between the chain runtime and whatever
//! actually draws and owns keyboard focus.
//!
//! The runtime never plays an animation or moves focus itself. It hands
//! requests to an [`AnimationBackend`] and asks a [`FocusBackend`] for focus
//! changes. Both report back through polling, so completions and inputs are
//! serialized onto the program's single logical thread.

use chainform_core::{AnimationCompletion, AnimationKind, AnimationRequest, FieldId, InputEvent};

/// Where an animation is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Inside a field's own bounds.
    Field(FieldId),
    /// The form-wide overlay above all fields.
    Overlay,
}

/// Visual layer an animation occupies on its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Bottom border of a field.
    Border,
    /// Loader accessory, reused by the checkmark.
    Loader,
    /// Jump arc on the overlay.
    Jump,
}

impl Layer {
    /// Layer used by animations of `kind`.
    #[must_use]
    pub const fn for_kind(kind: AnimationKind) -> Self {
        match kind {
            AnimationKind::BorderSlide => Self::Border,
            AnimationKind::CircleFill | AnimationKind::CheckmarkStroke => Self::Loader,
            AnimationKind::JumpArc => Self::Jump,
        }
    }
}

/// Animation half of the backend boundary.
///
/// Implementations must report exactly one [`AnimationCompletion`] per played
/// request, with `finished == false` when the animation was removed or
/// replaced before reaching its end.
pub trait AnimationBackend {
    /// Start playing `request` on `surface`.
    fn play(&mut self, surface: Surface, request: &AnimationRequest);

    /// Remove a layer (and any animation on it) from `surface`.
    fn remove(&mut self, surface: Surface, layer: Layer);

    /// Next pending completion, if any.
    fn poll_completion(&mut self) -> Option<AnimationCompletion>;
}

/// Focus/input half of the backend boundary.
pub trait FocusBackend {
    /// Move input focus to `field`.
    fn request_focus(&mut self, field: FieldId);

    /// Release input focus from the whole form.
    fn release_focus(&mut self);

    /// Next pending input event, if any.
    fn poll_input(&mut self) -> Option<InputEvent>;
}

/// Unified backend combining animation and focus.
pub trait Backend: AnimationBackend + FocusBackend {}

impl<T: AnimationBackend + FocusBackend> Backend for T {}
