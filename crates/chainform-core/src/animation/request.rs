#![forbid(unsafe_code)]

//! Animation request and completion descriptors.
//!
//! Each request carries a [`CompletionTag`] fixed at creation time, so the
//! owner dispatches on the tag by direct enum matching when the completion
//! comes back. The `epoch` lets an owner recognise completions that belong
//! to a chain it has since abandoned.

use std::fmt;
use std::time::Duration;

use super::{Easing, Tween};
use crate::geometry::{JumpArc, Rect};
use crate::id::{ChainDirection, FieldId};

/// Unique identifier for one played animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Compose an id from the owning field and a per-field sequence number.
    ///
    /// Ids built this way are unique across a form as long as field
    /// identities are.
    #[inline]
    #[must_use]
    pub const fn for_field(owner: FieldId, seq: u32) -> Self {
        Self(((owner.0 as u64) << 32) | seq as u64)
    }

    /// Field identity encoded by [`AnimationId::for_field`].
    #[inline]
    #[must_use]
    pub const fn owner(self) -> FieldId {
        FieldId((self.0 >> 32) as u32)
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim-{}", self.0)
    }
}

/// The four animations a chain can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Bottom border pushed in from the chain direction.
    BorderSlide,
    /// Circular loader stroked from empty to full.
    CircleFill,
    /// Checkmark stroke replacing the loader.
    CheckmarkStroke,
    /// Arc from a completed field to its successor, drawn on the overlay surface.
    JumpArc,
}

impl AnimationKind {
    /// Tag reported back when an animation of this kind stops.
    #[inline]
    #[must_use]
    pub const fn completion_tag(self) -> CompletionTag {
        match self {
            Self::BorderSlide => CompletionTag::Border,
            Self::CircleFill => CompletionTag::Circle,
            Self::CheckmarkStroke => CompletionTag::Tick,
            Self::JumpArc => CompletionTag::Jump,
        }
    }

    /// Whether this kind plays on the shared overlay rather than inside a field.
    #[inline]
    #[must_use]
    pub const fn is_overlay(self) -> bool {
        matches!(self, Self::JumpArc)
    }
}

/// Identifies which chain step just finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionTag {
    Border,
    Circle,
    Tick,
    Jump,
}

impl fmt::Display for CompletionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Border => "border",
            Self::Circle => "circle",
            Self::Tick => "tick",
            Self::Jump => "jump",
        };
        f.write_str(name)
    }
}

/// Direction/geometry descriptor for a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// A push transition of `frame` entering from the chain direction's start side.
    Slide {
        direction: ChainDirection,
        frame: Rect,
    },
    /// A path stroked from `from` to `to` (fractions of the path length).
    Stroke { from: f32, to: f32 },
    /// The jump arc between two fields.
    Arc(JumpArc),
}

/// One animation to play.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRequest {
    pub id: AnimationId,
    /// Field whose chain requested the animation.
    pub owner: FieldId,
    pub kind: AnimationKind,
    pub tag: CompletionTag,
    pub duration: Duration,
    pub easing: Easing,
    pub geometry: Geometry,
    /// Chain epoch of the owner at request time.
    pub epoch: u32,
}

impl AnimationRequest {
    /// Create a request with a zero duration and linear easing.
    ///
    /// The tag is derived from `kind`.
    #[must_use]
    pub fn new(id: AnimationId, owner: FieldId, kind: AnimationKind, geometry: Geometry) -> Self {
        Self {
            id,
            owner,
            kind,
            tag: kind.completion_tag(),
            duration: Duration::ZERO,
            easing: Easing::Linear,
            geometry,
            epoch: 0,
        }
    }

    /// Set duration and easing (builder pattern).
    #[must_use]
    pub fn timing(mut self, duration: Duration, easing: Easing) -> Self {
        self.duration = duration;
        self.easing = easing;
        self
    }

    /// Set the owner's chain epoch (builder pattern).
    #[must_use]
    pub fn epoch(mut self, epoch: u32) -> Self {
        self.epoch = epoch;
        self
    }

    /// The tween a backend should play for this request.
    ///
    /// Stroke geometry maps onto the tween's value range; everything else
    /// runs 0.0 → 1.0.
    #[must_use]
    pub fn tween(&self) -> Tween {
        let tween = Tween::new(self.duration).easing(self.easing);
        match self.geometry {
            Geometry::Stroke { from, to } => tween.range(from, to),
            Geometry::Slide { .. } | Geometry::Arc(_) => tween,
        }
    }

    /// Completion reporting that this request ran to the end.
    #[must_use]
    pub fn finished(&self) -> AnimationCompletion {
        AnimationCompletion::for_request(self, true)
    }

    /// Completion reporting that this request was interrupted.
    #[must_use]
    pub fn interrupted(&self) -> AnimationCompletion {
        AnimationCompletion::for_request(self, false)
    }
}

/// Delivered exactly once per played request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationCompletion {
    pub id: AnimationId,
    pub owner: FieldId,
    pub tag: CompletionTag,
    pub epoch: u32,
    /// `false` when the animation was removed before it reached its end.
    pub finished: bool,
}

impl AnimationCompletion {
    #[must_use]
    pub fn for_request(request: &AnimationRequest, finished: bool) -> Self {
        Self {
            id: request.id,
            owner: request.owner,
            tag: request.tag,
            epoch: request.epoch,
            finished,
        }
    }
}
