#![forbid(unsafe_code)]

//! Canonical input events delivered to field controllers.
//!
//! The focus/input backend reports three things per field: focus gained,
//! focus lost, and submit. Raw key events are only interesting insofar as
//! they map to a submit; ordinary typing never reaches the chain.
//!
//! # Design Notes
//!
//! - Only a plain Enter (no Ctrl or Alt) submits. Shift+Enter still submits,
//!   matching soft keyboards that report Shift for capitalised return keys.
//! - Submit never closes the field itself; the chain owns dismissal.

use bitflags::bitflags;

use crate::id::FieldId;

/// Per-field input reported by the focus backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldInput {
    /// The field became the input focus.
    FocusGained,
    /// The field stopped being the input focus.
    FocusLost,
    /// The user pressed return/enter in the field.
    Submit,
}

impl FieldInput {
    /// Map a key event to a field input, if it is one.
    ///
    /// Returns `None` for anything that is plain text editing.
    #[must_use]
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        match key.code {
            KeyCode::Enter if !key.ctrl() && !key.alt() => Some(Self::Submit),
            _ => None,
        }
    }
}

/// An input addressed to a specific field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEvent {
    pub field: FieldId,
    pub input: FieldInput,
}

impl InputEvent {
    #[inline]
    #[must_use]
    pub const fn new(field: FieldId, input: FieldInput) -> Self {
        Self { field, input }
    }

    #[inline]
    #[must_use]
    pub const fn focus_gained(field: FieldId) -> Self {
        Self::new(field, FieldInput::FocusGained)
    }

    #[inline]
    #[must_use]
    pub const fn focus_lost(field: FieldId) -> Self {
        Self::new(field, FieldInput::FocusLost)
    }

    #[inline]
    #[must_use]
    pub const fn submit(field: FieldId) -> Self {
        Self::new(field, FieldInput::Submit)
    }

    /// Build an input event from a key press in `field`, if the key submits.
    #[must_use]
    pub fn from_key(field: FieldId, key: KeyEvent) -> Option<Self> {
        FieldInput::from_key(key).map(|input| Self::new(field, input))
    }
}

/// A keyboard event inside a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Alt modifier is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Key codes that matter to a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Backspace key.
    Backspace,

    /// Tab key.
    Tab,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Cmd key.
        const SUPER = 0b1000;
    }
}
