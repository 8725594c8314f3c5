#![forbid(unsafe_code)]

//! Animation primitives: the [`Animation`] trait, easing, and [`Tween`].
//!
//! The chain never interpolates anything itself. These primitives exist so a
//! backend can play an [`AnimationRequest`] deterministically (the headless
//! backend ticks a [`Tween`] per request) and so renderers agree on what
//! "progress" means for each step.
//!
//! # Invariants
//!
//! 1. `value()` stays within the `from..=to` range of the tween.
//! 2. `tick()` after completion is a no-op.
//! 3. Zero durations are clamped to 1ns, so a zero-length tween completes on
//!    its first non-zero tick.

mod request;

pub use request::{
    AnimationCompletion, AnimationId, AnimationKind, AnimationRequest, CompletionTag, Geometry,
};

use std::time::Duration;

/// A time-driven animation.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value.
    fn value(&self) -> f32;

    /// Rewind to the start.
    fn reset(&mut self);
}

/// Timing curve applied to linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Slow start and end (cubic).
    EaseInOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1].
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }

    /// Stable lowercase name, used by configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseInOut => "ease_in_out",
        }
    }

    /// Parse a name produced by [`Easing::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Self::Linear),
            "ease_in_out" | "ease-in-out" => Some(Self::EaseInOut),
            _ => None,
        }
    }
}

/// Interpolates `from..to` over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    duration: Duration,
    elapsed: Duration,
    from: f32,
    to: f32,
    easing: Easing,
}

impl Tween {
    /// A 0.0 → 1.0 tween.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            elapsed: Duration::ZERO,
            from: 0.0,
            to: 1.0,
            easing: Easing::Linear,
        }
    }

    /// Set the value range (builder pattern).
    #[must_use]
    pub fn range(mut self, from: f32, to: f32) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress in [0, 1], before easing.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time left until completion.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        if self.is_complete() {
            return;
        }
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.easing.apply(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_500: Duration = Duration::from_millis(500);

    #[test]
    fn easing_endpoints_are_stable() {
        for easing in [Easing::Linear, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.0), 1.0);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric_at_midpoint() {
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::EaseInOut.apply(0.25) < 0.25);
        assert!(Easing::EaseInOut.apply(0.75) > 0.75);
    }

    #[test]
    fn easing_names_round_trip() {
        for easing in [Easing::Linear, Easing::EaseInOut] {
            assert_eq!(Easing::from_name(easing.name()), Some(easing));
        }
        assert_eq!(Easing::from_name("bounce"), None);
    }

    #[test]
    fn tween_completes_after_duration() {
        let mut tween = Tween::new(MS_500);
        for _ in 0..4 {
            tween.tick(MS_100);
        }
        assert!(!tween.is_complete());
        assert!((tween.value() - 0.8).abs() < 1e-4);
        tween.tick(MS_100);
        assert!(tween.is_complete());
        assert_eq!(tween.remaining(), Duration::ZERO);
    }

    #[test]
    fn tween_range_is_respected() {
        let mut tween = Tween::new(MS_500).range(0.8, 1.0);
        assert!((tween.value() - 0.8).abs() < 1e-6);
        tween.tick(Duration::from_secs(5));
        assert!((tween.value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut tween = Tween::new(Duration::ZERO);
        assert!(!tween.is_complete());
        tween.tick(Duration::from_nanos(1));
        assert!(tween.is_complete());
    }

    #[test]
    fn reset_rewinds() {
        let mut tween = Tween::new(MS_100).easing(Easing::EaseInOut);
        tween.tick(MS_100);
        assert!(tween.is_complete());
        tween.reset();
        assert!(!tween.is_complete());
        assert_eq!(tween.value(), 0.0);
    }
}
