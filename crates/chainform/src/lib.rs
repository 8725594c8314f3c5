#![forbid(unsafe_code)]

//! chainform public facade crate.
//!
//! Re-exports the types needed to declare a form, drive it and plug in a
//! backend, plus a prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use chainform_core::{
    Animation, AnimationCompletion, AnimationId, AnimationKind, AnimationRequest, ChainDirection,
    CompletionTag, Easing, FieldId, FieldInput, Geometry, InputEvent, JumpArc, KeyCode, KeyEvent,
    Modifiers, Point, Rect, Tween,
};

// --- Runtime re-exports ----------------------------------------------------

pub use chainform_runtime::{
    AnimationBackend, Backend, BackendOp, ChainConfig, ChainState, ConfigError, CrossFieldSignal,
    FieldSpec, FocusBackend, Form, FormBuilder, FormError, FormProgram, HeadlessBackend, Layer,
    Msg, StepTiming, Surface,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for chainform hosts.
#[derive(Debug)]
pub enum Error {
    /// The form could not be built.
    Form(FormError),
    /// The chain configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Form(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Form(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        Self::Form(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for chainform APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Layout helpers -------------------------------------------------------

/// Declare `count` fields stacked top to bottom and link them in order.
///
/// Ids start at `first_id`; each row is `height` tall with `spacing`
/// between rows. Fails with [`FormError::IdRangeOverflow`] if the ids would
/// run past `u32::MAX`.
pub fn stacked_form(
    config: ChainConfig,
    first_id: u32,
    count: u32,
    origin: Point,
    width: f32,
    height: f32,
    spacing: f32,
) -> Result<Form> {
    let mut builder = Form::builder().config(config);
    for i in 0..count {
        let id = first_id
            .checked_add(i)
            .ok_or(FormError::IdRangeOverflow {
                first: first_id,
                count,
            })?;
        let y = origin.y + i as f32 * (height + spacing);
        builder = builder.field(FieldSpec::new(
            FieldId(id),
            Rect::new(origin.x, y, width, height),
        ));
    }
    Ok(builder.link_in_order().build()?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Backend, ChainConfig, ChainState, Error, FieldId, FieldSpec, Form, FormProgram,
        HeadlessBackend, InputEvent, KeyCode, KeyEvent, Msg, Rect, Result, stacked_form,
    };

    pub use crate::{core, runtime};
}

pub use chainform_core as core;
pub use chainform_runtime as runtime;
