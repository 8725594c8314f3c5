#![forbid(unsafe_code)]

//! Chain timing configuration.
//!
//! Captures the duration and easing of each chain step plus the stroke
//! width, so a host can retune the choreography without recompiling.
//!
//! # Loading
//!
//! ```toml
//! # chainform.toml
//! line_width = 2.0
//!
//! [circle]
//! duration_ms = 400
//! easing = "linear"
//! ```
//!
//! ```rust,ignore
//! let config = ChainConfig::from_toml_file("chainform.toml")?;
//! let config = ChainConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Border slide 500ms ease-in-out, circle 500ms linear, checkmark 500ms
//! linear, jump 90ms linear, 2pt strokes. A step table that sets only some
//! keys keeps that step's defaults for the rest.

#[cfg(feature = "chain-config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "chain-config")]
use serde::{Deserialize, Serialize};

use chainform_core::Easing;

/// Where the checkmark stroke starts, as a fraction of its path.
pub const TICK_STROKE_FROM: f32 = 0.8;

/// Timing of one chain step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "chain-config", derive(Serialize, Deserialize))]
pub struct StepTiming {
    pub duration_ms: u64,
    #[cfg_attr(
        feature = "chain-config",
        serde(
            serialize_with = "serialize_easing",
            deserialize_with = "deserialize_easing",
            default
        )
    )]
    pub easing: Easing,
}

impl StepTiming {
    #[must_use]
    pub const fn new(duration_ms: u64, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Timing for every step of a field chain.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "chain-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "chain-config", serde(default))]
pub struct ChainConfig {
    /// Stroke width of border, loader, and arc.
    pub line_width: f32,
    /// Bottom border push transition.
    #[cfg_attr(
        feature = "chain-config",
        serde(deserialize_with = "deserialize_border")
    )]
    pub border: StepTiming,
    /// Circular loader fill.
    #[cfg_attr(
        feature = "chain-config",
        serde(deserialize_with = "deserialize_circle")
    )]
    pub circle: StepTiming,
    /// Checkmark stroke.
    #[cfg_attr(feature = "chain-config", serde(deserialize_with = "deserialize_tick"))]
    pub tick: StepTiming,
    /// Jump arc on the overlay.
    #[cfg_attr(feature = "chain-config", serde(deserialize_with = "deserialize_jump"))]
    pub jump: StepTiming,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            border: StepTiming::new(500, Easing::EaseInOut),
            circle: StepTiming::new(500, Easing::Linear),
            tick: StepTiming::new(500, Easing::Linear),
            jump: StepTiming::new(90, Easing::Linear),
        }
    }
}

impl ChainConfig {
    /// Load from a TOML string.
    #[cfg(feature = "chain-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "chain-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "chain-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "chain-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "chain-config")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSer)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, step) in [
            ("border", &self.border),
            ("circle", &self.circle),
            ("tick", &self.tick),
            ("jump", &self.jump),
        ] {
            if step.duration_ms == 0 {
                errors.push(format!("{name}.duration_ms must be > 0"));
            }
        }
        if !(self.line_width > 0.0 && self.line_width.is_finite()) {
            errors.push(format!(
                "line_width must be a positive number, got {}",
                self.line_width
            ));
        }
        errors
    }

    /// Return `self` if valid, otherwise a [`ConfigError::Validation`].
    pub fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a chain configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "chain-config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "chain-config")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "chain-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "chain-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "chain-config")]
            Self::TomlSer(e) => write!(f, "TOML serialization error: {e}"),
            #[cfg(feature = "chain-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "chain-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "chain-config")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "chain-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for Easing
// ---------------------------------------------------------------------------

#[cfg(feature = "chain-config")]
fn serialize_easing<S>(easing: &Easing, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(easing.name())
}

#[cfg(feature = "chain-config")]
fn deserialize_easing<'de, D>(deserializer: D) -> Result<Easing, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Easing::from_name(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown easing: {s}")))
}

#[cfg(feature = "chain-config")]
fn deserialize_easing_opt<'de, D>(deserializer: D) -> Result<Option<Easing>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_easing(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Per-step merging
// ---------------------------------------------------------------------------

/// A step table as written in a file; absent keys fall back to that step's default.
#[cfg(feature = "chain-config")]
#[derive(Deserialize)]
struct PartialStep {
    duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_easing_opt")]
    easing: Option<Easing>,
}

#[cfg(feature = "chain-config")]
impl PartialStep {
    fn over(self, default: StepTiming) -> StepTiming {
        StepTiming {
            duration_ms: self.duration_ms.unwrap_or(default.duration_ms),
            easing: self.easing.unwrap_or(default.easing),
        }
    }
}

#[cfg(feature = "chain-config")]
fn deserialize_border<'de, D>(deserializer: D) -> Result<StepTiming, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(PartialStep::deserialize(deserializer)?.over(ChainConfig::default().border))
}

#[cfg(feature = "chain-config")]
fn deserialize_circle<'de, D>(deserializer: D) -> Result<StepTiming, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(PartialStep::deserialize(deserializer)?.over(ChainConfig::default().circle))
}

#[cfg(feature = "chain-config")]
fn deserialize_tick<'de, D>(deserializer: D) -> Result<StepTiming, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(PartialStep::deserialize(deserializer)?.over(ChainConfig::default().tick))
}

#[cfg(feature = "chain-config")]
fn deserialize_jump<'de, D>(deserializer: D) -> Result<StepTiming, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(PartialStep::deserialize(deserializer)?.over(ChainConfig::default().jump))
}
