//! M/M/1/K: single server, at most K customers in the system.
//!
//! Arrivals that find K customers present are blocked and never enter.
//! The state space {0, …, K} is finite, so every ρ > 0 has a steady state.
//!
//! # Formulas
//!
//! | Metric | ρ ≠ 1 | ρ = 1 |
//! |--------|-------|-------|
//! | P0 | (1 − ρ)/(1 − ρ^(K+1)) | 1/(K + 1) |
//! | Pn | ρⁿ·P0 | 1/(K + 1) |
//! | L | ρ(1 − (K+1)ρ^K + Kρ^(K+1)) / ((1 − ρ)(1 − ρ^(K+1))) | K/2 |
//!
//! The distribution is precomputed as normalized log-weights, which yields
//! the same values without overflowing ρ^(K+1) for large K or ρ.
//! Times use the effective arrival rate λ(1 − P_K).

use serde::Serialize;
use tracing::debug;

use super::numerics::{log_terms, mean, normalize};
use super::{offered_load, per_admitted_customer, QueueModel};
use crate::error::QueueResult;
use crate::validation::{check_rate, check_state_count};

/// Single-server queue with finite system capacity (blocking).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mm1k {
    arrival_rate: f64,
    service_rate: f64,
    capacity: usize,
    rho: f64,
    /// P(n) for n = 0..=K.
    distribution: Vec<f64>,
}

impl Mm1k {
    /// Creates an M/M/1/K model.
    ///
    /// No stability condition applies; ρ may exceed 1.
    ///
    /// # Errors
    /// `InvalidParameter` for non-positive or non-finite rates, or a capacity
    /// above [`MAX_STATES`](crate::validation::MAX_STATES).
    pub fn new(arrival_rate: f64, service_rate: f64, capacity: usize) -> QueueResult<Self> {
        let arrival_rate = check_rate("arrival_rate", arrival_rate)?;
        let service_rate = check_rate("service_rate", service_rate)?;
        let capacity = check_state_count("capacity", capacity)?;
        let rho = offered_load(arrival_rate, service_rate);

        let log_rho = rho.ln();
        let distribution = normalize(&log_terms(capacity, |_| log_rho));

        debug!(
            arrival_rate,
            service_rate,
            capacity,
            rho,
            p0 = distribution[0],
            "constructed M/M/1/K"
        );
        Ok(Self {
            arrival_rate,
            service_rate,
            capacity,
            rho,
            distribution,
        })
    }

    /// Maximum number of customers in the system (K).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Probability an arrival finds the system full and is blocked (P_K).
    pub fn probability_rejection(&self) -> f64 {
        self.distribution[self.capacity]
    }

    /// Steady-state distribution P(0), …, P(K).
    pub fn occupancy_distribution(&self) -> &[f64] {
        &self.distribution
    }
}

impl QueueModel for Mm1k {
    fn kendall_notation(&self) -> String {
        format!("M/M/1/{}", self.capacity)
    }

    fn arrival_rate(&self) -> f64 {
        self.arrival_rate
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

    /// At most one customer is in service, with probability 1 − P0.
    fn average_customers_in_queue(&self) -> f64 {
        let in_service = 1.0 - self.probability_idle();
        (self.average_customers_in_system() - in_service).max(0.0)
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

    fn effective_arrival_rate(&self) -> f64 {
        self.arrival_rate * (1.0 - self.probability_rejection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueueError;

    fn closed_form_p0(rho: f64, k: usize) -> f64 {
        (1.0 - rho) / (1.0 - rho.powi(k as i32 + 1))
    }

    fn closed_form_l(rho: f64, k: usize) -> f64 {
        let k_f = k as f64;
        let numerator =
            rho * (1.0 - (k_f + 1.0) * rho.powi(k as i32) + k_f * rho.powi(k as i32 + 1));
        let denominator = (1.0 - rho) * (1.0 - rho.powi(k as i32 + 1));
        numerator / denominator
    }

    #[test]
    fn test_matches_closed_forms() {
        for (lambda, mu, k) in [(5.0, 7.5, 10), (9.0, 6.0, 4), (2.0, 8.0, 1), (3.0, 1.0, 6)] {
            let m = Mm1k::new(lambda, mu, k).unwrap();
            let rho = lambda / mu;
            assert!((m.probability_idle() - closed_form_p0(rho, k)).abs() < 1e-12);
            assert!((m.average_customers_in_system() - closed_form_l(rho, k)).abs() < 1e-9);
            assert!(
                (m.probability_rejection() - rho.powi(k as i32) * closed_form_p0(rho, k)).abs()
                    < 1e-12
            );
        }
    }

    #[test]
    fn test_critical_load_is_uniform() {
        let m = Mm1k::new(4.0, 4.0, 9).unwrap();
        assert!((m.rho() - 1.0).abs() < 1e-12);
        for n in 0..=9 {
            assert!((m.probability_n_customers(n) - 0.1).abs() < 1e-12);
        }
        assert!((m.average_customers_in_system() - 4.5).abs() < 1e-9);
        assert!((m.probability_rejection() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_overloaded_is_stable() {
        let m = Mm1k::new(20.0, 5.0, 5).unwrap();
        assert!(m.rho() > 1.0);
        let total: f64 = m.occupancy_distribution().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        // Heavily loaded: the system is nearly always full
        assert!(m.probability_rejection() > 0.7);
    }

    #[test]
    fn test_large_capacity_does_not_overflow() {
        let m = Mm1k::new(30.0, 10.0, 2000).unwrap();
        assert!(m.probability_idle().is_finite());
        assert!((m.probability_rejection() - 2.0 / 3.0).abs() < 1e-9);
        assert!(m.average_time_in_system().unwrap().is_finite());
    }

    #[test]
    fn test_out_of_range_states() {
        let m = Mm1k::new(5.0, 7.5, 3).unwrap();
        assert_eq!(m.probability_n_customers(-1), 0.0);
        assert_eq!(m.probability_n_customers(4), 0.0);
        assert!(m.probability_n_customers(3) > 0.0);
    }

    #[test]
    fn test_effective_rate_and_littles_law() {
        let m = Mm1k::new(5.0, 7.5, 10).unwrap();
        let lambda_eff = m.effective_arrival_rate();
        assert!(lambda_eff < 5.0);
        assert!((lambda_eff - 5.0 * (1.0 - m.probability_rejection())).abs() < 1e-12);
        let w = m.average_time_in_system().unwrap();
        let wq = m.average_time_in_queue().unwrap();
        assert!((m.average_customers_in_system() - lambda_eff * w).abs() < 1e-12);
        assert!((m.average_customers_in_queue() - lambda_eff * wq).abs() < 1e-12);
        // Sojourn = wait + one service
        assert!((w - wq - 1.0 / 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_slot() {
        // K = 1: loss system, P0 = 1/(1 + ρ)
        let m = Mm1k::new(3.0, 6.0, 1).unwrap();
        assert!((m.probability_idle() - 1.0 / 1.5).abs() < 1e-12);
        assert!(m.average_customers_in_queue().abs() < 1e-12);
        assert!(m.average_time_in_queue().unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_zero_capacity_is_degenerate() {
        let m = Mm1k::new(3.0, 6.0, 0).unwrap();
        assert_eq!(m.probability_idle(), 1.0);
        assert_eq!(m.probability_rejection(), 1.0);
        assert_eq!(m.effective_arrival_rate(), 0.0);
        assert_eq!(m.average_customers_in_system(), 0.0);
        assert_eq!(m.probability_all_servers_busy(), 0.0);
        let err = m.average_time_in_system().unwrap_err();
        assert!(matches!(err, QueueError::DegenerateModel { .. }));
    }

    #[test]
    fn test_oversized_capacity_rejected() {
        let err = Mm1k::new(3.0, 6.0, usize::MAX).unwrap_err();
        assert!(matches!(err, QueueError::InvalidParameter { name: "capacity", .. }));
    }

    #[test]
    fn test_kendall() {
        assert_eq!(Mm1k::new(1.0, 2.0, 10).unwrap().kendall_notation(), "M/M/1/10");
    }
}
