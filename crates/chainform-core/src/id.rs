#![forbid(unsafe_code)]

//! Field identity and the chain direction derived from it.

use std::fmt;

/// Stable identity of a form field.
///
/// Identities are assigned at form construction and never change. They double
/// as the addressing key for cross-field signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl FieldId {
    /// Create a new field identity.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric tag.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Direction this field's chain animates in.
    #[inline]
    #[must_use]
    pub const fn chain_direction(self) -> ChainDirection {
        ChainDirection::for_field(self)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Horizontal direction of a field's border slide and jump arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainDirection {
    /// Border slides in from the left; the jump leaves from the right edge.
    LeftToRight,
    /// Border slides in from the right; the jump leaves from the left edge.
    RightToLeft,
}

impl ChainDirection {
    /// Odd identities run left-to-right, even identities right-to-left.
    #[inline]
    #[must_use]
    pub const fn for_field(id: FieldId) -> Self {
        if id.0 % 2 != 0 {
            Self::LeftToRight
        } else {
            Self::RightToLeft
        }
    }

    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::LeftToRight => Self::RightToLeft,
            Self::RightToLeft => Self::LeftToRight,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_left_to_right(self) -> bool {
        matches!(self, Self::LeftToRight)
    }
}

impl fmt::Display for ChainDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftToRight => f.write_str("left-to-right"),
            Self::RightToLeft => f.write_str("right-to-left"),
        }
    }
}
