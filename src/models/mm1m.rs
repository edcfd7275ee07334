//! M/M/1/m: single server, finite calling population of m sources.
//!
//! Each source outside the system generates arrivals at rate λ_source, so
//! with n customers present the arrival rate is (m − n)·λ_source.
//!
//! # Formulas
//!
//! | Metric | Value |
//! |--------|-------|
//! | ρ | λ_source/μ |
//! | P0 | 1 / Σₙ C(m,n)·ρⁿ |
//! | Pn | C(m,n)·ρⁿ·P0, 0 ≤ n ≤ m |
//! | L | Σ n·Pn |
//! | Lq | Σ_{n≥2} (n − 1)·Pn |
//! | λ_eff | λ_source·(m − L) |
//!
//! Binomial weights are accumulated as C(m,n) = C(m,n−1)·(m − n + 1)/n in
//! the log domain, so large populations do not overflow.

use serde::Serialize;
use tracing::debug;

use super::numerics::{log_terms, mean, normalize};
use super::{offered_load, per_admitted_customer, QueueModel};
use crate::error::QueueResult;
use crate::validation::{check_non_negative_rate, check_rate, check_state_count};

/// Single-server queue fed by a finite population of sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mm1m {
    arrival_rate_per_source: f64,
    service_rate: f64,
    population_size: usize,
    rho: f64,
    /// P(n) for n = 0..=m.
    distribution: Vec<f64>,
}

impl Mm1m {
    /// Creates an M/M/1/m model.
    ///
    /// A zero per-source rate or an empty population is accepted; such a
    /// model has no admitted arrivals and its time metrics return
    /// `DegenerateModel`.
    ///
    /// # Errors
    /// `InvalidParameter` for a negative or non-finite per-source rate, a
    /// non-positive service rate, or a population above
    /// [`MAX_STATES`](crate::validation::MAX_STATES).
    pub fn new(
        arrival_rate_per_source: f64,
        service_rate: f64,
        population_size: usize,
    ) -> QueueResult<Self> {
        let arrival_rate_per_source =
            check_non_negative_rate("arrival_rate_per_source", arrival_rate_per_source)?;
        let service_rate = check_rate("service_rate", service_rate)?;
        let population_size = check_state_count("population_size", population_size)?;
        let rho = offered_load(arrival_rate_per_source, service_rate);

        let m = population_size as f64;
        let log_rho = rho.ln();
        let log_weights = log_terms(population_size, |n| {
            let n = n as f64;
            ((m - n + 1.0) / n).ln() + log_rho
        });
        let distribution = normalize(&log_weights);

        debug!(
            arrival_rate_per_source,
            service_rate,
            population_size,
            rho,
            p0 = distribution[0],
            "constructed M/M/1/m"
        );
        Ok(Self {
            arrival_rate_per_source,
            service_rate,
            population_size,
            rho,
            distribution,
        })
    }

    /// Arrival rate of a single idle source.
    pub fn arrival_rate_per_source(&self) -> f64 {
        self.arrival_rate_per_source
    }

    /// Number of sources (m).
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Steady-state distribution P(0), …, P(m).
    pub fn occupancy_distribution(&self) -> &[f64] {
        &self.distribution
    }
}

impl QueueModel for Mm1m {
    fn kendall_notation(&self) -> String {
        format!("M/M/1/{}/{}", self.population_size, self.population_size)
    }

    /// Arrival rate with every source outside the system: m·λ_source.
    fn arrival_rate(&self) -> f64 {
        self.arrival_rate_per_source * self.population_size as f64
    }

    fn service_rate(&self) -> f64 {
        self.service_rate
    }

    fn rho(&self) -> f64 {
        self.rho
    }

    fn probability_idle(&self) -> f64 {
        self.distribution[0]
    }

    fn probability_n_customers(&self, n: i64) -> f64 {
        usize::try_from(n)
            .ok()
            .and_then(|n| self.distribution.get(n).copied())
            .unwrap_or(0.0)
    }

    fn average_customers_in_system(&self) -> f64 {
        mean(&self.distribution)
    }

    fn average_customers_in_queue(&self) -> f64 {
        self.distribution
            .iter()
            .enumerate()
            .skip(2)
            .map(|(n, p)| (n - 1) as f64 * p)
            .sum()
    }

    fn average_time_in_system(&self) -> QueueResult<f64> {
        per_admitted_customer(self, self.average_customers_in_system())
    }

    fn average_time_in_queue(&self) -> QueueResult<f64> {
        per_admitted_customer(self, self.average_customers_in_queue())
    }

    fn probability_all_servers_busy(&self) -> f64 {
        1.0 - self.probability_idle()
    }

    /// Sources still outside the system, times their individual rate.
    fn effective_arrival_rate(&self) -> f64 {
        self.arrival_rate_per_source
            * (self.population_size as f64 - self.average_customers_in_system())
    }
}
