//! Core domain types for Ersatz.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the workspace.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of one in-flight load.
///
/// Monotonic per loader; two concurrently pending loads never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadId(u64);

impl LoadId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of an output slot at the sink boundary.
///
/// This is the identifier half of the `(identifier, text)` pair the sink
/// accepts. Guaranteed non-empty (after trimming) by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputId(String);

#[derive(Debug, Error)]
#[error("output slot name must not be empty")]
pub struct EmptyOutputIdError;

impl OutputId {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyOutputIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyOutputIdError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OutputId {
    type Error = EmptyOutputIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for OutputId {
    type Error = EmptyOutputIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutputId> for String {
    fn from(value: OutputId) -> Self {
        value.0
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Load State
// ============================================================================

/// Lifecycle of one pending load.
///
/// A load starts Scheduled and transitions to Completed exactly once, when
/// its timer expires. There are no other transitions: no cancellation, no
/// failure state under current behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    Scheduled,
    Completed,
}

impl LoadState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LoadState::Scheduled => "scheduled",
            LoadState::Completed => "completed",
        }
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, LoadState::Completed)
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failure of a load.
///
/// The simulated load always succeeds, so nothing produces this today; the
/// variant exists so the handle's output is a proper result-or-error and the
/// failure path stays typed for callers.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The load did not complete within the waited duration.
    #[error("load did not complete within {waited:?}")]
    Timeout { waited: Duration },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_id_rejects_empty() {
        assert!(OutputId::new("").is_err());
        assert!(OutputId::new("   ").is_err());
        assert!(OutputId::new("output").is_ok());
    }

    #[test]
    fn output_id_round_trips_through_string() {
        let id = OutputId::new("asyncOutput").unwrap();
        assert_eq!(id.as_str(), "asyncOutput");
        assert_eq!(String::from(id.clone()), "asyncOutput");
        assert_eq!(id.to_string(), "asyncOutput");
    }

    #[test]
    fn load_id_displays_value() {
        let id = LoadId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn load_state_starts_scheduled() {
        assert_eq!(LoadState::default(), LoadState::Scheduled);
        assert!(!LoadState::Scheduled.is_completed());
        assert!(LoadState::Completed.is_completed());
    }

    #[test]
    fn load_state_as_str() {
        assert_eq!(LoadState::Scheduled.as_str(), "scheduled");
        assert_eq!(LoadState::Completed.as_str(), "completed");
    }

    #[test]
    fn load_error_names_the_waited_duration() {
        let err = LoadError::Timeout {
            waited: Duration::from_millis(1000),
        };
        assert!(err.to_string().contains("1s"));
    }
}
