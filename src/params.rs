//! Generic queue parameters and model selection.
//!
//! A front-end collects one flat parameter set and lets [`select_model`]
//! pick the variant. Precedence, first match wins:
//!
//! | Condition | Model |
//! |-----------|-------|
//! | population > 0 | M/M/1/m with λ_source = λ/m |
//! | capacity > 0 | M/M/1/K |
//! | servers = ∞ | M/M/∞ |
//! | servers > 1 | M/M/k |
//! | otherwise | M/M/1 |
//!
//! Zero capacity and zero population mean "unbounded".
//!
//! # Example
//!
//! ```
//! use u_queue::models::QueueModel;
//! use u_queue::params::{select_model, QueueParams};
//!
//! let params = QueueParams::new(10.0, 4.0).with_servers(3);
//! let model = select_model(&params).unwrap();
//! assert_eq!(model.kendall_notation(), "M/M/3");
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::QueueResult;
use crate::models::{Mm1, Mm1k, Mm1m, MmInf, Mmk, QueueModel, QueueSystem};
use crate::validation::{check_count, validate_params};

/// Number of servers: a finite count or unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Servers {
    /// A finite number of servers (must be ≥ 1).
    Count(i64),
    /// One server per customer.
    Infinite,
}

impl Default for Servers {
    fn default() -> Self {
        Self::Count(1)
    }
}

/// Flat parameter set covering every model variant.
///
/// Rates are per unit time; the unit is up to the caller but must match
/// between λ and μ. Counts are signed so that configuration errors
/// surface as validation errors instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueParams {
    /// Total arrival rate λ.
    pub arrival_rate: f64,
    /// Per-server service rate μ.
    pub service_rate: f64,
    /// Server count.
    #[serde(default)]
    pub servers: Servers,
    /// System capacity K (0 = unbounded).
    #[serde(default)]
    pub capacity: i64,
    /// Calling population m (0 = infinite).
    #[serde(default)]
    pub population: i64,
}

impl QueueParams {
    /// Creates parameters for a single-server, unbounded system.
    pub fn new(arrival_rate: f64, service_rate: f64) -> Self {
        Self {
            arrival_rate,
            service_rate,
            servers: Servers::default(),
            capacity: 0,
            population: 0,
        }
    }

    /// Sets a finite server count.
    pub fn with_servers(mut self, servers: i64) -> Self {
        self.servers = Servers::Count(servers);
        self
    }

    /// Uses infinitely many servers.
    pub fn with_infinite_servers(mut self) -> Self {
        self.servers = Servers::Infinite;
        self
    }

    /// Sets the system capacity K.
    pub fn with_capacity(mut self, capacity: i64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the calling population m.
    pub fn with_population(mut self, population: i64) -> Self {
        self.population = population;
        self
    }
}

/// Builds the model variant matching `params`.
///
/// # Errors
/// The first validation error if any parameter is out of range, or the
/// selected constructor's error (e.g. `Instability`).
pub fn select_model(params: &QueueParams) -> QueueResult<QueueSystem> {
    if let Err(mut errors) = validate_params(params) {
        return Err(errors.swap_remove(0));
    }

    let lambda = params.arrival_rate;
    let mu = params.service_rate;
    let population = check_count("population", params.population)?;
    let capacity = check_count("capacity", params.capacity)?;

    let system: QueueSystem = if population > 0 {
        Mm1m::new(lambda / population as f64, mu, population)?.into()
    } else if capacity > 0 {
        Mm1k::new(lambda, mu, capacity)?.into()
    } else {
        match params.servers {
            Servers::Infinite => MmInf::new(lambda, mu)?.into(),
            Servers::Count(count) => {
                let servers = check_count("servers", count)?;
                if servers > 1 {
                    Mmk::new(lambda, mu, servers)?.into()
                } else {
                    Mm1::new(lambda, mu)?.into()
                }
            }
        }
    };

    debug!(?params, model = %system.kendall_notation(), "selected model");
    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueueError;

    #[test]
    fn test_default_is_mm1() {
        let model = select_model(&QueueParams::new(5.0, 7.5)).unwrap();
        assert!(matches!(model, QueueSystem::Mm1(_)));
    }

    #[test]
    fn test_population_takes_precedence() {
        let params = QueueParams::new(10.0, 8.0)
            .with_population(20)
            .with_capacity(5)
            .with_servers(3);
        let model = select_model(&params).unwrap();
        let QueueSystem::Mm1m(inner) = &model else {
            panic!("expected M/M/1/m, got {}", model.kendall_notation());
        };
        assert_eq!(inner.population_size(), 20);
        assert!((inner.arrival_rate_per_source() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_before_servers() {
        let params = QueueParams::new(10.0, 8.0).with_capacity(5).with_servers(3);
        let model = select_model(&params).unwrap();
        assert_eq!(model.kendall_notation(), "M/M/1/5");
    }

    #[test]
    fn test_multi_and_infinite_servers() {
        let model = select_model(&QueueParams::new(10.0, 4.0).with_servers(3)).unwrap();
        assert!(matches!(model, QueueSystem::Mmk(_)));

        let model = select_model(&QueueParams::new(10.0, 4.0).with_infinite_servers()).unwrap();
        assert!(matches!(model, QueueSystem::MmInf(_)));
    }

    #[test]
    fn test_instability_propagates() {
        let err = select_model(&QueueParams::new(8.0, 4.0)).unwrap_err();
        assert!(err.is_instability());
        let err = select_model(&QueueParams::new(13.0, 4.0).with_servers(3)).unwrap_err();
        assert!(err.is_instability());
    }

    #[test]
    fn test_invalid_params() {
        let err = select_model(&QueueParams::new(5.0, 7.5).with_capacity(-1)).unwrap_err();
        assert!(matches!(err, QueueError::InvalidParameter { name: "capacity", .. }));
        let err = select_model(&QueueParams::new(5.0, 7.5).with_capacity(i64::MAX)).unwrap_err();
        assert!(matches!(err, QueueError::InvalidParameter { name: "capacity", .. }));
        let err = select_model(&QueueParams::new(5.0, 7.5).with_population(i64::MAX)).unwrap_err();
        assert!(matches!(err, QueueError::InvalidParameter { name: "population", .. }));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let params: QueueParams =
            serde_json::from_str(r#"{"arrival_rate": 5.0, "service_rate": 7.5}"#).unwrap();
        assert_eq!(params, QueueParams::new(5.0, 7.5));

        let params: QueueParams = serde_json::from_str(
            r#"{"arrival_rate": 5.0, "service_rate": 7.5, "servers": "infinite"}"#,
        )
        .unwrap();
        assert_eq!(params.servers, Servers::Infinite);

        let params: QueueParams = serde_json::from_str(
            r#"{"arrival_rate": 5.0, "service_rate": 7.5, "servers": {"count": 4}}"#,
        )
        .unwrap();
        assert_eq!(params.servers, Servers::Count(4));
    }
}
