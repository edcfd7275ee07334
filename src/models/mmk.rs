//! M/M/k: k identical servers sharing one unbounded queue.
//!
//! # Formulas
//!
//! With offered load a = λ/μ and utilization ρ = a/k < 1:
//!
//! | Metric | Value |
//! |--------|-------|
//! | P0 | 1 / (Σ_{n<k} aⁿ/n! + a^k/(k!(1 − ρ))) |
//! | Pn, n ≤ k | aⁿ/n!·P0 |
//! | Pn, n > k | aⁿ/(k!·k^(n−k))·P0 |
//! | C(k, a) | a^k/(k!(1 − ρ))·P0 |
//! | Lq | C·ρ/(1 − ρ) |
//! | L | Lq + a |
//! | Wq | Lq/λ |
//! | W | Wq + 1/μ |
//!
//! The terms aⁿ/n! are accumulated as logarithms, each derived from the
//! previous one (ln a − ln n), so k in the hundreds does not overflow.
//!
//! # Reference
//! Erlang (1917), "Solution of some problems in the theory of probabilities
//! of significance in automatic telephone exchanges"

use serde::Serialize;
use tracing::debug;

use super::numerics::{log_sum_exp, log_terms};
use super::{ensure_stable, offered_load, QueueModel};
use crate::error::{QueueError, QueueResult};
use crate::validation::{check_rate, check_state_count};

/// Multi-server queue with unbounded waiting room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mmk {
    arrival_rate: f64,
    service_rate: f64,
    num_servers: usize,
    rho: f64,
    offered_load: f64,
    /// ln(aⁿ/n!) for n = 0..=k.
    log_terms: Vec<f64>,
    log_p0: f64,
    erlang_c: f64,
}

impl Mmk {
    /// Creates an M/M/k model.
    ///
    /// # Errors
    /// `InvalidParameter` for bad rates, zero servers or more than
    /// [`MAX_STATES`](crate::validation::MAX_STATES) servers,
    /// `Instability` when λ ≥ k·μ.
    pub fn new(arrival_rate: f64, service_rate: f64, num_servers: usize) -> QueueResult<Self> {
        let arrival_rate = check_rate("arrival_rate", arrival_rate)?;
        let service_rate = check_rate("service_rate", service_rate)?;
        if num_servers == 0 {
            return Err(QueueError::invalid(
                "num_servers",
                "at least one server required",
            ));
        }
        let num_servers = check_state_count("num_servers", num_servers)?;

        let a = offered_load(arrival_rate, service_rate);
        let k = num_servers as f64;
        let rho = a / k;
        ensure_stable(&format!("M/M/{num_servers}"), rho)?;

        let log_a = a.ln();
        let log_terms = log_terms(num_servers, |n| log_a - (n as f64).ln());
        let log_busy_tail = log_terms[num_servers] - (1.0 - rho).ln();
        let log_normalizer = log_sum_exp(
            log_terms[..num_servers]
                .iter()
                .copied()
                .chain(std::iter::once(log_busy_tail)),
        );
        let log_p0 = -log_normalizer;
        let erlang_c = (log_busy_tail + log_p0).exp();

        debug!(
            arrival_rate,
            service_rate,
            num_servers,
            rho,
            p0 = log_p0.exp(),
            erlang_c,
            "constructed M/M/k"
        );
        Ok(Self {
            arrival_rate,
            service_rate,
            num_servers,
            rho,
            offered_load: a,
            log_terms,
            log_p0,
            erlang_c,
        })
    }

    /// Number of servers (k).
    pub fn num_servers(&self) -> usize {
        self.num_servers
    }

    /// Offered load a = λ/μ in Erlangs.
    pub fn offered_load(&self) -> f64 {
        self.offered_load
    }

    /// Erlang-C formula: probability an arrival must wait.
    pub fn erlang_c(&self) -> f64 {
        self.erlang_c
    }
}

impl QueueModel for Mmk {
    fn kendall_notation(&self) -> String {
        format!("M/M/{}", self.num_servers)
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
        self.log_p0.exp()
    }

    fn probability_n_customers(&self, n: i64) -> f64 {
        let Ok(n) = usize::try_from(n) else {
            return 0.0;
        };
        let k = self.num_servers;
        let log_term = if n <= k {
            self.log_terms[n]
        } else {
            // a^n / (k! k^(n-k)) = (a^k / k!) · ρ^(n-k)
            self.log_terms[k] + (n - k) as f64 * self.rho.ln()
        };
        (log_term + self.log_p0).exp()
    }

    fn average_customers_in_system(&self) -> f64 {
        self.average_customers_in_queue() + self.offered_load
    }

    fn average_customers_in_queue(&self) -> f64 {
        self.erlang_c * self.rho / (1.0 - self.rho)
    }

    fn average_time_in_system(&self) -> QueueResult<f64> {
        Ok(self.average_time_in_queue()? + 1.0 / self.service_rate)
    }

    fn average_time_in_queue(&self) -> QueueResult<f64> {
        Ok(self.average_customers_in_queue() / self.arrival_rate)
    }

    fn probability_all_servers_busy(&self) -> f64 {
        self.erlang_c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mm1;

    #[test]
    fn test_three_servers() {
        // λ = 10, μ = 4: a = 2.5, ρ = 5/6
        let m = Mmk::new(10.0, 4.0, 3).unwrap();
        assert!((m.rho() - 5.0 / 6.0).abs() < 1e-12);
        assert!((m.probability_idle() - 1.0 / 22.25).abs() < 1e-12);
        assert!((m.erlang_c() - 15.625 / 22.25).abs() < 1e-12);
        assert!((m.average_customers_in_queue() - 3.511236).abs() < 1e-5);
        assert!((m.average_customers_in_system() - 6.011236).abs() < 1e-5);
        assert!((m.average_time_in_queue().unwrap() - 0.3511236).abs() < 1e-6);
        assert!((m.average_time_in_system().unwrap() - 0.6011236).abs() < 1e-6);
    }

    #[test]
    fn test_occupancy_branches() {
        let m = Mmk::new(10.0, 4.0, 3).unwrap();
        let p0 = m.probability_idle();
        // n ≤ k: aⁿ/n!
        assert!((m.probability_n_customers(2) - 3.125 * p0).abs() < 1e-12);
        // n > k: a^5 / (3! · 3²)
        let expected = 2.5f64.powi(5) / (6.0 * 9.0) * p0;
        assert!((m.probability_n_customers(5) - expected).abs() < 1e-12);
        assert_eq!(m.probability_n_customers(-2), 0.0);
    }

    #[test]
    fn test_erlang_c_is_tail_probability() {
        let m = Mmk::new(10.0, 4.0, 3).unwrap();
        let below_k: f64 = (0..3).map(|n| m.probability_n_customers(n)).sum();
        assert!((m.erlang_c() - (1.0 - below_k)).abs() < 1e-12);
        assert_eq!(m.probability_all_servers_busy(), m.erlang_c());
    }

    #[test]
    fn test_single_server_matches_mm1() {
        for (lambda, mu) in [(5.0, 7.5), (1.0, 2.0), (9.9, 10.0)] {
            let k = Mmk::new(lambda, mu, 1).unwrap();
            let m = Mm1::new(lambda, mu).unwrap();
            assert!((k.rho() - m.rho()).abs() < 1e-12);
            assert!((k.probability_idle() - m.probability_idle()).abs() < 1e-12);
            for n in 0..10 {
                let diff = k.probability_n_customers(n) - m.probability_n_customers(n);
                assert!(diff.abs() < 1e-12);
            }
            let rel = |x: f64, y: f64| ((x - y) / y).abs();
            assert!(rel(k.average_customers_in_system(), m.average_customers_in_system()) < 1e-9);
            assert!(rel(k.average_customers_in_queue(), m.average_customers_in_queue()) < 1e-9);
            assert!(
                rel(
                    k.average_time_in_system().unwrap(),
                    m.average_time_in_system().unwrap()
                ) < 1e-9
            );
            assert!(
                rel(
                    k.average_time_in_queue().unwrap(),
                    m.average_time_in_queue().unwrap()
                ) < 1e-9
            );
            assert!(
                (k.probability_all_servers_busy() - m.probability_all_servers_busy()).abs() < 1e-12
            );
        }
    }

    #[test]
    fn test_many_servers_do_not_overflow() {
        // 171! and 190^190 both overflow f64
        let m = Mmk::new(190.0, 1.0, 200).unwrap();
        assert!(m.probability_idle() > 0.0 && m.probability_idle().is_finite());
        assert!(m.erlang_c() > 0.0 && m.erlang_c() < 1.0);
        let total: f64 = (0..3000).map(|n| m.probability_n_customers(n)).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(m.average_customers_in_system() > 190.0);
    }

    #[test]
    fn test_instability() {
        let err = Mmk::new(12.0, 4.0, 3).unwrap_err();
        assert!(err.is_instability());
        assert!(err.to_string().contains("M/M/3"));
        assert!(Mmk::new(13.0, 4.0, 3).unwrap_err().is_instability());
    }

    #[test]
    fn test_zero_servers() {
        let err = Mmk::new(1.0, 4.0, 0).unwrap_err();
        assert!(matches!(err, QueueError::InvalidParameter { name: "num_servers", .. }));
        let err = Mmk::new(1.0, 4.0, usize::MAX).unwrap_err();
        assert!(matches!(err, QueueError::InvalidParameter { name: "num_servers", .. }));
    }
}
