//! M/M/∞: every arrival is served immediately by a free server.
//!
//! The number in system is Poisson(a) with a = λ/μ. Nobody ever waits, so
//! Lq = Wq = 0 and the all-busy probability is 0. `rho()` is reported as 0;
//! see the module docs of [`crate::models`].

use serde::Serialize;
use tracing::debug;

use super::numerics::ln_factorial;
use super::{offered_load, QueueModel};
use crate::error::QueueResult;
use crate::validation::check_rate;

/// Infinite-server (pure delay) system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MmInf {
    arrival_rate: f64,
    service_rate: f64,
    offered_load: f64,
}

impl MmInf {
    /// Creates an M/M/∞ model. Always stable.
    ///
    /// # Errors
    /// `InvalidParameter` for non-positive or non-finite rates.
    pub fn new(arrival_rate: f64, service_rate: f64) -> QueueResult<Self> {
        let arrival_rate = check_rate("arrival_rate", arrival_rate)?;
        let service_rate = check_rate("service_rate", service_rate)?;
        let a = offered_load(arrival_rate, service_rate);

        debug!(arrival_rate, service_rate, offered_load = a, "constructed M/M/inf");
        Ok(Self {
            arrival_rate,
            service_rate,
            offered_load: a,
        })
    }

    /// Offered load a = λ/μ, the Poisson mean of the occupancy.
    pub fn offered_load(&self) -> f64 {
        self.offered_load
    }

    /// Variance of the number in system (equals the mean for a Poisson law).
    pub fn variance_customers(&self) -> f64 {
        self.offered_load
    }
}

impl QueueModel for MmInf {
    fn kendall_notation(&self) -> String {
        "M/M/inf".to_string()
    }

    fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    fn service_rate(&self) -> f64 {
        self.service_rate
    }

    /// Always 0: per-server utilization vanishes with infinitely many servers.
    fn rho(&self) -> f64 {
        0.0
    }

    fn probability_idle(&self) -> f64 {
        (-self.offered_load).exp()
    }

    fn probability_n_customers(&self, n: i64) -> f64 {
        let Ok(n) = u64::try_from(n) else {
            return 0.0;
        };
        let a = self.offered_load;
        (n as f64 * a.ln() - a - ln_factorial(n)).exp()
    }

    fn average_customers_in_system(&self) -> f64 {
        self.offered_load
    }

    fn average_customers_in_queue(&self) -> f64 {
        0.0
    }

    fn average_time_in_system(&self) -> QueueResult<f64> {
        Ok(1.0 / self.service_rate)
    }

    fn average_time_in_queue(&self) -> QueueResult<f64> {
        Ok(0.0)
    }

    /// A free server always exists.
    fn probability_all_servers_busy(&self) -> f64 {
        0.0
    }
}
