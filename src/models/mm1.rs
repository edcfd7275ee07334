//! M/M/1: single server, unbounded queue, infinite population.
//!
//! # Formulas
//!
//! | Metric | Value |
//! |--------|-------|
//! | P0 | 1 − ρ |
//! | Pn | (1 − ρ)·ρⁿ |
//! | L | ρ/(1 − ρ) |
//! | Lq | ρ²/(1 − ρ) |
//! | W | 1/(μ − λ) |
//! | Wq | ρ/(μ − λ) |
//! | Pw | ρ |

use serde::Serialize;
use tracing::debug;

use super::{ensure_stable, offered_load, QueueModel};
use crate::error::QueueResult;
use crate::validation::check_rate;

/// Single-server queue with unbounded waiting room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mm1 {
    arrival_rate: f64,
    service_rate: f64,
    rho: f64,
}

impl Mm1 {
    /// Creates an M/M/1 model.
    ///
    /// # Errors
    /// `InvalidParameter` for non-positive or non-finite rates,
    /// `Instability` when λ ≥ μ.
    pub fn new(arrival_rate: f64, service_rate: f64) -> QueueResult<Self> {
        let arrival_rate = check_rate("arrival_rate", arrival_rate)?;
        let service_rate = check_rate("service_rate", service_rate)?;
        let rho = offered_load(arrival_rate, service_rate);
        ensure_stable("M/M/1", rho)?;

        debug!(arrival_rate, service_rate, rho, "constructed M/M/1");
        Ok(Self {
            arrival_rate,
            service_rate,
            rho,
        })
    }
}

impl QueueModel for Mm1 {
    fn kendall_notation(&self) -> String {
        "M/M/1".to_string()
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
        1.0 - self.rho
    }

    fn probability_n_customers(&self, n: i64) -> f64 {
        if n < 0 {
            return 0.0;
        }
        (1.0 - self.rho) * self.rho.powf(n as f64)
    }

    fn average_customers_in_system(&self) -> f64 {
        self.rho / (1.0 - self.rho)
    }

    fn average_customers_in_queue(&self) -> f64 {
        self.rho * self.rho / (1.0 - self.rho)
    }

    fn average_time_in_system(&self) -> QueueResult<f64> {
        Ok(1.0 / (self.service_rate - self.arrival_rate))
    }

    fn average_time_in_queue(&self) -> QueueResult<f64> {
        Ok(self.rho / (self.service_rate - self.arrival_rate))
    }

    /// The single server is busy exactly when the system is non-empty.
    fn probability_all_servers_busy(&self) -> f64 {
        self.rho
    }
}
