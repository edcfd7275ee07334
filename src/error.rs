//! Error types for queue model construction and evaluation.
//!
//! | Variant | Raised | Cause |
//! |---------|--------|-------|
//! | `Instability` | construction | ρ ≥ 1 on an unbounded-queue model |
//! | `DegenerateModel` | query | effective arrival rate ≤ 0 |
//! | `InvalidParameter` | construction | non-finite or non-positive rates, bad counts |
//!
//! Occupancy queries for unreachable states (n < 0, n > K) are not errors;
//! they return probability 0.

use thiserror::Error;

/// Errors produced by queueing models and the simulator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueueError {
    /// No steady state exists: the queue grows without bound.
    #[error("{model} is unstable: utilization {rho:.4} must be below 1")]
    Instability {
        /// Kendall notation of the rejected model.
        model: String,
        /// Utilization that failed the check.
        rho: f64,
    },

    /// A metric is undefined for this parameter set (e.g. zero effective arrival rate).
    #[error("{model} is degenerate: {reason}")]
    DegenerateModel {
        /// Kendall notation of the model.
        model: String,
        /// What made the metric undefined.
        reason: String,
    },

    /// A construction parameter is out of its domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name (e.g. `arrival_rate`).
        name: &'static str,
        /// Human-readable description.
        reason: String,
    },
}

impl QueueError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DegenerateModel {
            model: model.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error was raised because the model has no steady state.
    pub fn is_instability(&self) -> bool {
        matches!(self, Self::Instability { .. })
    }
}

/// Result alias used throughout the crate.
pub type QueueResult<T> = Result<T, QueueError>;
