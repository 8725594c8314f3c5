#![forbid(unsafe_code)]

//! Form construction and successor wiring.
//!
//! Fields are declared in visual order, then linked. Links are validated and
//! frozen into the controllers when the form is built; nothing can rewire a
//! field afterwards.

use std::fmt;

use ahash::{AHashMap, AHashSet};

use chainform_core::{FieldId, Rect};

use crate::config::ChainConfig;
use crate::field::FieldController;

/// Declaration of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub id: FieldId,
    /// Frame in form coordinates.
    pub frame: Rect,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(id: FieldId, frame: Rect) -> Self {
        Self { id, frame }
    }
}

/// Errors detected while building a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Two fields share an identity.
    DuplicateField(FieldId),
    /// A link names a field that was never declared.
    UnknownField(FieldId),
    /// A field was linked to itself.
    SelfLink(FieldId),
    /// A field was given two successors.
    DuplicateLink(FieldId),
    /// Following successors from this field returns to it.
    SuccessorCycle(FieldId),
    /// The chain configuration is invalid.
    InvalidConfig(Vec<String>),
    /// `count` consecutive ids starting at `first` do not fit in a `u32`.
    IdRangeOverflow { first: u32, count: u32 },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateField(id) => write!(f, "field {id} declared twice"),
            Self::UnknownField(id) => write!(f, "link names undeclared field {id}"),
            Self::SelfLink(id) => write!(f, "field {id} cannot succeed itself"),
            Self::DuplicateLink(id) => write!(f, "field {id} already has a successor"),
            Self::SuccessorCycle(id) => write!(f, "successor chain from {id} loops back"),
            Self::InvalidConfig(errors) => {
                write!(f, "invalid chain config: {}", errors.join("; "))
            }
            Self::IdRangeOverflow { first, count } => {
                write!(f, "{count} field ids starting at {first} overflow u32")
            }
        }
    }
}

impl std::error::Error for FormError {}

/// Builder for a [`Form`].
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    config: ChainConfig,
    fields: Vec<FieldSpec>,
    links: Vec<(FieldId, FieldId)>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a non-default chain configuration (builder pattern).
    #[must_use]
    pub fn config(mut self, config: ChainConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare a field. Declaration order is visual order.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Make `to` the successor of `from`.
    #[must_use]
    pub fn link(mut self, from: FieldId, to: FieldId) -> Self {
        self.links.push((from, to));
        self
    }

    /// Link every declared field to the next one in declaration order.
    #[must_use]
    pub fn link_in_order(mut self) -> Self {
        let pairs: Vec<_> = self.fields.windows(2).map(|w| (w[0].id, w[1].id)).collect();
        self.links.extend(pairs);
        self
    }

    /// Validate and freeze the wiring.
    pub fn build(self) -> Result<Form, FormError> {
        let errors = self.config.validate();
        if !errors.is_empty() {
            return Err(FormError::InvalidConfig(errors));
        }

        let mut frames: AHashMap<FieldId, Rect> = AHashMap::with_capacity(self.fields.len());
        for spec in &self.fields {
            if frames.insert(spec.id, spec.frame).is_some() {
                return Err(FormError::DuplicateField(spec.id));
            }
        }

        let mut successors: AHashMap<FieldId, FieldId> = AHashMap::new();
        for &(from, to) in &self.links {
            for id in [from, to] {
                if !frames.contains_key(&id) {
                    return Err(FormError::UnknownField(id));
                }
            }
            if from == to {
                return Err(FormError::SelfLink(from));
            }
            if successors.insert(from, to).is_some() {
                return Err(FormError::DuplicateLink(from));
            }
        }

        for spec in &self.fields {
            let mut seen = AHashSet::new();
            let mut cursor = spec.id;
            while let Some(&next) = successors.get(&cursor) {
                if !seen.insert(cursor) || next == spec.id {
                    return Err(FormError::SuccessorCycle(spec.id));
                }
                cursor = next;
            }
        }

        let controllers = self
            .fields
            .iter()
            .map(|spec| match successors.get(&spec.id) {
                Some(&next) => FieldController::with_successor(
                    spec.id,
                    spec.frame,
                    self.config,
                    next,
                    frames[&next],
                ),
                None => FieldController::new(spec.id, spec.frame, self.config),
            })
            .collect();

        tracing::debug!(
            target: "chainform.form",
            fields = self.fields.len(),
            links = successors.len(),
            "form built"
        );
        Ok(Form {
            config: self.config,
            controllers,
        })
    }
}

/// A validated set of field controllers in visual order.
#[derive(Debug, Clone)]
pub struct Form {
    config: ChainConfig,
    controllers: Vec<FieldController>,
}

impl Form {
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Field ids in visual order.
    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.controllers.iter().map(FieldController::id)
    }

    /// Fields nobody hands off to; chains usually start here.
    pub fn heads(&self) -> Vec<FieldId> {
        let targets: AHashSet<FieldId> =
            self.controllers.iter().filter_map(FieldController::successor).collect();
        self.ids().filter(|id| !targets.contains(id)).collect()
    }

    pub fn into_controllers(self) -> Vec<FieldController> {
        self.controllers
    }
}
