#![forbid(unsafe_code)]

//! Core: field identity, geometry, input events, and animation descriptors.
//!
//! # Role in chainform
//! `chainform-core` is the vocabulary layer. It owns the value types that the
//! runtime passes between field controllers, the form coordinator, and the
//! rendering backend. Nothing in this crate holds chain state.
//!
//! # Primary responsibilities
//! - **FieldId / ChainDirection**: stable identity and the direction derived from it.
//! - **Geometry**: layout rectangles and the jump arc between two fields.
//! - **Event**: focus and submit inputs, plus key-to-submit mapping.
//! - **Animation**: easing, tweens, and the `AnimationRequest` descriptor.
//!
//! # How it fits in the system
//! The runtime (`chainform-runtime`) consumes `InputEvent` values, drives the
//! per-field chain state machines, and hands `AnimationRequest` values to a
//! backend. Backends report back with `AnimationCompletion`.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod id;

pub use animation::{
    Animation, AnimationCompletion, AnimationId, AnimationKind, AnimationRequest, CompletionTag,
    Easing, Geometry, Tween,
};
pub use event::{FieldInput, InputEvent, KeyCode, KeyEvent, Modifiers};
pub use geometry::{JumpArc, Point, Rect};
pub use id::{ChainDirection, FieldId};
