//! Input validation for queueing models.
//!
//! Constructors use the single-field checks (`check_rate`, `check_count`)
//! and stop at the first failure. [`validate_params`] inspects a whole
//! [`QueueParams`] and reports every problem at once:
//! - Non-finite or non-positive arrival/service rates
//! - Negative server count, capacity, or population
//! - A server count, capacity, or population above [`MAX_STATES`]
//! - A zero server count
//!
//! Instability is not a validation concern; it depends on the selected
//! variant and is raised by its constructor.

use crate::error::{QueueError, QueueResult};
use crate::params::{QueueParams, Servers};

/// Largest server count, capacity, or population accepted.
///
/// Finite-state models precompute one log-weight per state, so this bounds
/// their tables to a few hundred megabytes.
pub const MAX_STATES: usize = 10_000_000;

/// Validation result listing every detected issue.
pub type ValidationResult = Result<(), Vec<QueueError>>;

/// Checks that a rate is finite and strictly positive.
pub fn check_rate(name: &'static str, value: f64) -> QueueResult<f64> {
    if !value.is_finite() {
        return Err(QueueError::invalid(name, format!("must be finite, got {value}")));
    }
    if value <= 0.0 {
        return Err(QueueError::invalid(
            name,
            format!("must be positive, got {value}"),
        ));
    }
    Ok(value)
}

/// Checks that a rate is finite and non-negative.
///
/// Used for per-source rates of finite-population models, where a silent
/// population is a valid (if degenerate) configuration.
pub fn check_non_negative_rate(name: &'static str, value: f64) -> QueueResult<f64> {
    if !value.is_finite() {
        return Err(QueueError::invalid(name, format!("must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(QueueError::invalid(
            name,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(value)
}

/// Checks that a signed count is non-negative and at most [`MAX_STATES`],
/// and converts it.
pub fn check_count(name: &'static str, value: i64) -> QueueResult<usize> {
    let value = usize::try_from(value)
        .map_err(|_| QueueError::invalid(name, format!("must be non-negative, got {value}")))?;
    check_state_count(name, value)
}

/// Checks that a state-table size does not exceed [`MAX_STATES`].
pub fn check_state_count(name: &'static str, value: usize) -> QueueResult<usize> {
    if value > MAX_STATES {
        return Err(QueueError::invalid(
            name,
            format!("must not exceed {MAX_STATES}, got {value}"),
        ));
    }
    Ok(value)
}

/// Validates a generic parameter set before model selection.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_params(params: &QueueParams) -> ValidationResult {
    let mut errors = Vec::new();

    if let Err(e) = check_rate("arrival_rate", params.arrival_rate) {
        errors.push(e);
    }
    if let Err(e) = check_rate("service_rate", params.service_rate) {
        errors.push(e);
    }

    if let Servers::Count(count) = params.servers {
        match check_count("servers", count) {
            Ok(0) => errors.push(QueueError::invalid("servers", "at least one server required")),
            Ok(_) => {}
            Err(e) => errors.push(e),
        }
    }
    if let Err(e) = check_count("capacity", params.capacity) {
        errors.push(e);
    }
    if let Err(e) = check_count("population", params.population) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
