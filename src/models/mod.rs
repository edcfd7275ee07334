//! Markovian queueing models.
//!
//! Every variant is an immutable value: the constructor validates inputs,
//! rejects unstable configurations, and precomputes normalization constants.
//! Metric queries never mutate and are safe to share across threads.
//!
//! # Variants
//!
//! | Model | Servers | Capacity | Population | ρ |
//! |-------|---------|----------|------------|---|
//! | [`Mm1`] | 1 | ∞ | ∞ | λ/μ, must be < 1 |
//! | [`Mm1k`] | 1 | K | ∞ | λ/μ, any value |
//! | [`Mm1m`] | 1 | m | m | λ_source/μ |
//! | [`Mmk`] | k | ∞ | ∞ | λ/(kμ), must be < 1 |
//! | [`MmInf`] | ∞ | ∞ | ∞ | reported as 0 |
//!
//! # Utilization convention
//!
//! `rho()` is the offered load per server. For [`MmInf`] it is reported as
//! exactly 0: with infinitely many servers the per-server load vanishes, and
//! the offered load λ/μ is available through [`MmInf::offered_load`] instead.
//!
//! # Example
//!
//! ```
//! use u_queue::models::{Mm1, QueueModel};
//!
//! let model = Mm1::new(5.0, 7.5).unwrap();
//! assert!((model.average_customers_in_system() - 2.0).abs() < 1e-9);
//! assert!((model.average_time_in_system().unwrap() - 0.4).abs() < 1e-9);
//! ```
//!
//! # References
//! - Gross et al. (2018), "Fundamentals of Queueing Theory", Ch. 2-3
//! - Kleinrock (1975), "Queueing Systems, Volume 1: Theory"

mod mm1;
mod mm1k;
mod mm1m;
mod mminf;
mod mmk;
pub(crate) mod numerics;

pub use mm1::Mm1;
pub use mm1k::Mm1k;
pub use mm1m::Mm1m;
pub use mminf::MmInf;
pub use mmk::Mmk;

use serde::Serialize;
use std::fmt::Debug;
use tracing::warn;

use crate::error::{QueueError, QueueResult};

/// Shared metric vocabulary of all queueing models.
///
/// Probabilities and populations are always defined for a constructed model.
/// Times divide by the effective arrival rate, which can be zero for
/// finite-capacity and finite-source variants, so they return
/// [`QueueResult`].
pub trait QueueModel: Debug + Send + Sync {
    /// Kendall notation (e.g. "M/M/1/10").
    fn kendall_notation(&self) -> String;

    /// Nominal arrival rate λ offered to the system.
    fn arrival_rate(&self) -> f64;

    /// Per-server service rate μ.
    fn service_rate(&self) -> f64;

    /// Utilization factor ρ (variant-specific, see module docs).
    fn rho(&self) -> f64;

    /// P0: probability the system is empty.
    fn probability_idle(&self) -> f64;

    /// Pn: probability of exactly `n` customers in the system.
    ///
    /// Unreachable states (negative `n`, `n` above capacity) have probability 0.
    fn probability_n_customers(&self, n: i64) -> f64;

    /// L: expected number of customers in the system.
    fn average_customers_in_system(&self) -> f64;

    /// Lq: expected number of customers waiting (not in service).
    fn average_customers_in_queue(&self) -> f64;

    /// W: expected sojourn time of an admitted customer.
    fn average_time_in_system(&self) -> QueueResult<f64>;

    /// Wq: expected waiting time before service of an admitted customer.
    fn average_time_in_queue(&self) -> QueueResult<f64>;

    /// Pw: probability an arriving customer finds every server busy.
    fn probability_all_servers_busy(&self) -> f64;

    /// Rate of arrivals actually admitted. Defaults to the nominal rate.
    fn effective_arrival_rate(&self) -> f64 {
        self.arrival_rate()
    }
}

/// Base utilization formula: offered load λ/μ in Erlangs.
pub fn offered_load(arrival_rate: f64, service_rate: f64) -> f64 {
    arrival_rate / service_rate
}

/// Rejects utilizations without a steady state.
pub(crate) fn ensure_stable(model: &str, rho: f64) -> QueueResult<()> {
    if rho >= 1.0 {
        warn!(model, rho, "rejecting unstable queue");
        return Err(QueueError::Instability {
            model: model.to_string(),
            rho,
        });
    }
    Ok(())
}

/// Divides a population metric by the effective arrival rate.
pub(crate) fn per_admitted_customer(model: &dyn QueueModel, population: f64) -> QueueResult<f64> {
    let lambda_eff = model.effective_arrival_rate();
    if lambda_eff <= 0.0 || !lambda_eff.is_finite() {
        return Err(QueueError::degenerate(
            model.kendall_notation(),
            format!("effective arrival rate is {lambda_eff}, times are undefined"),
        ));
    }
    Ok(population / lambda_eff)
}

/// Any of the five model variants.
///
/// Dispatches the [`QueueModel`] contract by matching on the variant, and
/// exposes variant-specific quantities as `Option`s.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum QueueSystem {
    /// Single server, unbounded queue.
    Mm1(Mm1),
    /// Single server, finite capacity.
    Mm1k(Mm1k),
    /// Single server, finite calling population.
    Mm1m(Mm1m),
    /// k servers, unbounded queue.
    Mmk(Mmk),
    /// Infinite servers.
    MmInf(MmInf),
}

impl QueueSystem {
    fn inner(&self) -> &dyn QueueModel {
        match self {
            Self::Mm1(m) => m,
            Self::Mm1k(m) => m,
            Self::Mm1m(m) => m,
            Self::Mmk(m) => m,
            Self::MmInf(m) => m,
        }
    }

    /// Blocking probability (M/M/1/K only).
    pub fn probability_rejection(&self) -> Option<f64> {
        match self {
            Self::Mm1k(m) => Some(m.probability_rejection()),
            _ => None,
        }
    }

    /// Erlang-C waiting probability (M/M/k only).
    pub fn erlang_c(&self) -> Option<f64> {
        match self {
            Self::Mmk(m) => Some(m.erlang_c()),
            _ => None,
        }
    }

    /// Variance of the number in system (M/M/∞ only).
    pub fn variance_customers(&self) -> Option<f64> {
        match self {
            Self::MmInf(m) => Some(m.variance_customers()),
            _ => None,
        }
    }

    /// Full occupancy distribution for finite-state variants.
    pub fn occupancy_distribution(&self) -> Option<&[f64]> {
        match self {
            Self::Mm1k(m) => Some(m.occupancy_distribution()),
            Self::Mm1m(m) => Some(m.occupancy_distribution()),
            _ => None,
        }
    }
}

impl QueueModel for QueueSystem {
    fn kendall_notation(&self) -> String {
        self.inner().kendall_notation()
    }

    fn arrival_rate(&self) -> f64 {
        self.inner().arrival_rate()
    }

    fn service_rate(&self) -> f64 {
        self.inner().service_rate()
    }

    fn rho(&self) -> f64 {
        self.inner().rho()
    }

    fn probability_idle(&self) -> f64 {
        self.inner().probability_idle()
    }

    fn probability_n_customers(&self, n: i64) -> f64 {
        self.inner().probability_n_customers(n)
    }

    fn average_customers_in_system(&self) -> f64 {
        self.inner().average_customers_in_system()
    }

    fn average_customers_in_queue(&self) -> f64 {
        self.inner().average_customers_in_queue()
    }

    fn average_time_in_system(&self) -> QueueResult<f64> {
        self.inner().average_time_in_system()
    }

    fn average_time_in_queue(&self) -> QueueResult<f64> {
        self.inner().average_time_in_queue()
    }

    fn probability_all_servers_busy(&self) -> f64 {
        self.inner().probability_all_servers_busy()
    }

    fn effective_arrival_rate(&self) -> f64 {
        self.inner().effective_arrival_rate()
    }
}

impl From<Mm1> for QueueSystem {
    fn from(m: Mm1) -> Self {
        Self::Mm1(m)
    }
}

impl From<Mm1k> for QueueSystem {
    fn from(m: Mm1k) -> Self {
        Self::Mm1k(m)
    }
}

impl From<Mm1m> for QueueSystem {
    fn from(m: Mm1m) -> Self {
        Self::Mm1m(m)
    }
}

impl From<Mmk> for QueueSystem {
    fn from(m: Mmk) -> Self {
        Self::Mmk(m)
    }
}

impl From<MmInf> for QueueSystem {
    fn from(m: MmInf) -> Self {
        Self::MmInf(m)
    }
}
