//! Discrete-event simulation of a single-server queue.
//!
//! Reproduces the M/M/1 steady-state metrics by Monte Carlo, as an
//! independent check on the closed forms in [`crate::models`]. The event
//! loop only needs interarrival and service samples, which it draws from a
//! [`VariateSource`]; [`ExponentialVariates`] provides the Markovian one.
//!
//! # Example
//!
//! ```
//! use u_queue::simulation::Mm1Simulation;
//!
//! let report = Mm1Simulation::new(5.0, 7.5, 1000)
//!     .with_seed(8)
//!     .run()
//!     .unwrap();
//! assert_eq!(report.customers, 1000);
//! assert!(report.probability_idle > 0.0 && report.probability_idle < 1.0);
//! ```
//!
//! # Reference
//! Law (2015), "Simulation Modeling and Analysis", Ch. 1.4: Simulation of a
//! Single-Server Queueing System

mod mm1;

pub use mm1::{Mm1Simulation, SimulationReport};

use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::error::{QueueError, QueueResult};
use crate::validation::check_rate;

/// Source of interarrival and service durations.
///
/// Durations must be finite and non-negative; the simulator rejects any
/// other sample with `InvalidParameter`.
pub trait VariateSource {
    /// Time until the next arrival.
    fn interarrival(&mut self) -> f64;

    /// Service duration of the customer entering service.
    fn service(&mut self) -> f64;
}

/// Exponential interarrival and service times drawn from `rng`.
#[derive(Debug, Clone)]
pub struct ExponentialVariates<R> {
    rng: R,
    interarrival: Exp<f64>,
    service: Exp<f64>,
}

impl<R: Rng> ExponentialVariates<R> {
    /// Creates a source with mean interarrival 1/λ and mean service 1/μ.
    ///
    /// # Errors
    /// `InvalidParameter` for non-positive or non-finite rates.
    pub fn new(rng: R, arrival_rate: f64, service_rate: f64) -> QueueResult<Self> {
        let interarrival = exponential("arrival_rate", arrival_rate)?;
        let service = exponential("service_rate", service_rate)?;
        Ok(Self {
            rng,
            interarrival,
            service,
        })
    }
}

fn exponential(name: &'static str, rate: f64) -> QueueResult<Exp<f64>> {
    let rate = check_rate(name, rate)?;
    Exp::new(rate).map_err(|e| QueueError::invalid(name, e.to_string()))
}

impl<R: Rng> VariateSource for ExponentialVariates<R> {
    fn interarrival(&mut self) -> f64 {
        self.interarrival.sample(&mut self.rng)
    }

    fn service(&mut self) -> f64 {
        self.service.sample(&mut self.rng)
    }
}
