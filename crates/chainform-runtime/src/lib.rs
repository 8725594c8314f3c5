#![forbid(unsafe_code)]

//! chainform Runtime
//!
//! This crate drives the per-field animation chains of a form and the
//! hand-off between them.
//!
//! # Key Components
//!
//! - [`FieldController`] - Chain state machine for one input field
//! - [`FormCoordinator`] - Owner of the shared overlay surface; relays jump and completion signals
//! - [`Broadcast`] - Typed fan-out bus carrying [`CrossFieldSignal`]s
//! - [`FormProgram`] - Cooperative single-threaded loop tying controllers, coordinator, bus, and backend together
//! - [`Cmd`] - Side effects returned by controllers
//! - [`HeadlessBackend`] - Deterministic in-memory backend for tests and demos
//!
//! # How it fits in the system
//! Input events and animation completions enter through [`FormProgram`].
//! Controllers never touch the backend or each other; they return [`Cmd`]s
//! that the program executes, and reach other fields only through the bus.

pub mod backend;
pub mod builder;
pub mod bus;
pub mod cmd;
pub mod config;
pub mod field;
pub mod form;
pub mod headless;
pub mod program;

pub use backend::{AnimationBackend, Backend, FocusBackend, Layer, Surface};
pub use builder::{FieldSpec, Form, FormBuilder, FormError};
pub use bus::{Broadcast, CrossFieldSignal, SubId};
pub use cmd::Cmd;
pub use config::{ChainConfig, ConfigError, StepTiming};
pub use field::{ChainState, FieldController};
pub use form::{FormCoordinator, FormDelegate, JumpOverlay, SurfaceOp};
pub use headless::{BackendOp, HeadlessBackend};
pub use program::{FormProgram, Msg};
