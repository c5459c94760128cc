//! Error types for runs
//!
//! Facility operations report `AccessError`; this module covers failures of a
//! whole run (handover script or drill) and of the binary around it.

use crate::facility::AccessError;
use crate::types::{ConfigError, ConfigValidationError};
use thiserror::Error;

/// Errors that can occur during a run
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A scripted step failed
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        /// Description of the step
        step: String,
        /// The facility error
        #[source]
        source: AccessError,
    },

    /// A facility invariant does not hold
    #[error("Invariant violated after step {step}: {violation}")]
    InvariantViolation {
        /// Step number at which the violation was observed
        step: usize,
        /// What is wrong
        violation: String,
    },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<ConfigError> for SimulationError {
    fn from(error: ConfigError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl From<ConfigValidationError> for SimulationError {
    fn from(error: ConfigValidationError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Wrap a facility error with the step that produced it
    pub fn step_failed(step: impl Into<String>, source: AccessError) -> Self {
        Self::StepFailed { step: step.into(), source }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::StepFailed { .. } => "Step",
            SimulationError::InvariantViolation { .. } => "Invariant",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for run operations
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Extension for attaching a step description to facility results
pub trait StepContext<T> {
    /// Turn an `AccessError` into a `SimulationError::StepFailed`
    fn step(self, description: impl Into<String>) -> SimulationResult<T>;
}

impl<T> StepContext<T> for Result<T, AccessError> {
    fn step(self, description: impl Into<String>) -> SimulationResult<T> {
        self.map_err(|source| SimulationError::step_failed(description, source))
    }
}
