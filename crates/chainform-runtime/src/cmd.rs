#![forbid(unsafe_code)]

//! Commands returned by field controllers.
//!
//! Controllers are pure state machines: every handler returns a [`Cmd`]
//! describing the side effects it wants, and [`FormProgram`](crate::FormProgram)
//! executes them against the backend and the coordinator in order.

use chainform_core::{AnimationRequest, FieldId};

use crate::backend::Layer;

/// Side effects requested by a field controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// No operation.
    None,
    /// Execute commands in order.
    Batch(Vec<Cmd>),
    /// Play an animation inside the owning field.
    Play(AnimationRequest),
    /// Remove a visual layer from a field.
    Remove { field: FieldId, layer: Layer },
    /// Ask the focus backend to focus a field.
    RequestFocus(FieldId),
    /// Hand a jump animation to the coordinator for the shared overlay.
    ShowJump {
        request: AnimationRequest,
        successor: FieldId,
    },
    /// Ask the coordinator to clear the shared overlay.
    HideJump,
    /// Tell the coordinator the last chain has finished.
    AllChainsComplete,
}

impl Cmd {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a batch of commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Number of leaf commands, ignoring `None`.
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Batch(cmds) => cmds.iter().map(Self::count).sum(),
            _ => 1,
        }
    }

    /// Flatten into leaf commands in execution order.
    pub fn into_leaves(self) -> Vec<Self> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(self, out: &mut Vec<Self>) {
        match self {
            Self::None => {}
            Self::Batch(cmds) => {
                for cmd in cmds {
                    cmd.collect_leaves(out);
                }
            }
            leaf => out.push(leaf),
        }
    }

    /// Short name for logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Batch(_) => "Batch",
            Self::Play(_) => "Play",
            Self::Remove { .. } => "Remove",
            Self::RequestFocus(_) => "RequestFocus",
            Self::ShowJump { .. } => "ShowJump",
            Self::HideJump => "HideJump",
            Self::AllChainsComplete => "AllChainsComplete",
        }
    }
}
