//! Steady-state performance report.
//!
//! Collects every contract metric of a model into one serializable value,
//! the way a front-end would print or export it.
//!
//! # Metrics
//!
//! | Field | Symbol | Definition |
//! |-------|--------|-----------|
//! | `rho` | ρ | Utilization factor |
//! | `probability_idle` | P0 | Empty-system probability |
//! | `occupancy` | P0..Pn | First states of the distribution |
//! | `average_customers_in_system` | L | Mean number present |
//! | `average_customers_in_queue` | Lq | Mean number waiting |
//! | `average_time_in_system` | W | Mean sojourn time |
//! | `average_time_in_queue` | Wq | Mean wait before service |
//! | `probability_all_servers_busy` | Pw | Arrival must wait |
//! | `effective_arrival_rate` | λ_eff | Admitted arrival rate |
//!
//! # Example
//!
//! ```
//! use u_queue::metrics::QueueMetrics;
//! use u_queue::models::Mm1;
//!
//! let model = Mm1::new(5.0, 7.5).unwrap();
//! let report = QueueMetrics::calculate(&model, 4);
//! assert_eq!(report.occupancy.len(), 5);
//! assert!(report.satisfies_littles_law(1e-9));
//! ```

use serde::{Deserialize, Serialize};

use crate::models::{QueueModel, QueueSystem};

/// Number of occupancy states reported by [`QueueMetrics::summary`]: P0..P4.
pub const DEFAULT_OCCUPANCY_STATES: usize = 4;

/// Snapshot of a model's steady-state metrics.
///
/// Times are `None` when the model is degenerate (no admitted arrivals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueMetrics {
    /// Kendall notation of the evaluated model.
    pub model: String,
    /// Utilization factor ρ.
    pub rho: f64,
    /// P0.
    pub probability_idle: f64,
    /// P(n) for n = 0..=max_n.
    pub occupancy: Vec<f64>,
    /// L.
    pub average_customers_in_system: f64,
    /// Lq.
    pub average_customers_in_queue: f64,
    /// W.
    pub average_time_in_system: Option<f64>,
    /// Wq.
    pub average_time_in_queue: Option<f64>,
    /// Pw.
    pub probability_all_servers_busy: f64,
    /// λ_eff.
    pub effective_arrival_rate: f64,
    /// Blocking probability (M/M/1/K).
    pub probability_rejection: Option<f64>,
    /// Erlang-C waiting probability (M/M/k).
    pub erlang_c: Option<f64>,
    /// Occupancy variance (M/M/∞).
    pub variance_customers: Option<f64>,
}

impl QueueMetrics {
    /// Computes the contract metrics of any model.
    ///
    /// # Arguments
    /// * `model` - The model to evaluate.
    /// * `max_n` - Highest state included in `occupancy`.
    pub fn calculate<M: QueueModel + ?Sized>(model: &M, max_n: usize) -> Self {
        let occupancy = (0..=max_n as i64)
            .map(|n| model.probability_n_customers(n))
            .collect();

        Self {
            model: model.kendall_notation(),
            rho: model.rho(),
            probability_idle: model.probability_idle(),
            occupancy,
            average_customers_in_system: model.average_customers_in_system(),
            average_customers_in_queue: model.average_customers_in_queue(),
            average_time_in_system: model.average_time_in_system().ok(),
            average_time_in_queue: model.average_time_in_queue().ok(),
            probability_all_servers_busy: model.probability_all_servers_busy(),
            effective_arrival_rate: model.effective_arrival_rate(),
            probability_rejection: None,
            erlang_c: None,
            variance_customers: None,
        }
    }

    /// Computes the contract metrics plus the variant-specific extras.
    pub fn for_system(system: &QueueSystem, max_n: usize) -> Self {
        Self {
            probability_rejection: system.probability_rejection(),
            erlang_c: system.erlang_c(),
            variance_customers: system.variance_customers(),
            ..Self::calculate(system, max_n)
        }
    }

    /// [`for_system`](Self::for_system) with P0..P4.
    pub fn summary(system: &QueueSystem) -> Self {
        Self::for_system(system, DEFAULT_OCCUPANCY_STATES)
    }

    /// Whether L = λ_eff·W and Lq = λ_eff·Wq within `tolerance`.
    ///
    /// Returns `false` when the times are undefined.
    pub fn satisfies_littles_law(&self, tolerance: f64) -> bool {
        let (Some(w), Some(wq)) = (self.average_time_in_system, self.average_time_in_queue) else {
            return false;
        };
        let lambda = self.effective_arrival_rate;
        (self.average_customers_in_system - lambda * w).abs() <= tolerance
            && (self.average_customers_in_queue - lambda * wq).abs() <= tolerance
    }

    /// Whether the expected wait and the all-busy probability stay within targets.
    pub fn meets_targets(&self, max_time_in_queue: f64, max_busy_probability: f64) -> bool {
        self.average_time_in_queue
            .is_some_and(|wq| wq <= max_time_in_queue)
            && self.probability_all_servers_busy <= max_busy_probability
    }
}
