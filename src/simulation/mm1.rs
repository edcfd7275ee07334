//! Event loop for the single-server FIFO queue.
//!
//! # Algorithm
//!
//! 1. Advance the clock to the earlier of the next arrival and the next
//!    departure, accumulating the time-weighted number in system and queue.
//! 2. Arrival: start service if the server is idle, otherwise join the queue.
//!    Schedule the next arrival.
//! 3. Departure: record the customer's sojourn and wait, then start the
//!    head of the queue or leave the server idle.
//! 4. Stop after the requested number of departures.
//!
//! Ties resolve in favour of the departure.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ExponentialVariates, VariateSource};
use crate::error::{QueueError, QueueResult};
use crate::validation::check_rate;

/// Simulation run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mm1Simulation {
    /// Arrival rate λ.
    pub arrival_rate: f64,
    /// Service rate μ.
    pub service_rate: f64,
    /// Number of departures to simulate.
    pub customers: usize,
    /// RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

/// Statistics observed over one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Customers that completed service.
    pub customers: usize,
    /// Simulated time at the last departure.
    pub horizon: f64,
    /// Mean sojourn time per departed customer (W).
    pub average_time_in_system: f64,
    /// Mean wait before service per departed customer (Wq).
    pub average_time_in_queue: f64,
    /// Time-averaged number in system (L).
    pub average_customers_in_system: f64,
    /// Time-averaged number waiting (Lq).
    pub average_customers_in_queue: f64,
    /// Fraction of time the server was idle (P0).
    pub probability_idle: f64,
    /// Fraction of time the server was busy (Pw).
    pub probability_busy: f64,
    /// Longest queue observed, excluding the customer in service.
    pub peak_queue_length: usize,
}

#[derive(Debug, Clone, Copy)]
struct InService {
    arrived_at: f64,
    started_at: f64,
}

impl Mm1Simulation {
    /// Creates a configuration with an OS-seeded generator.
    pub fn new(arrival_rate: f64, service_rate: f64, customers: usize) -> Self {
        Self {
            arrival_rate,
            service_rate,
            customers,
            seed: None,
        }
    }

    /// Fixes the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Runs with exponential variates from a PCG generator.
    ///
    /// # Errors
    /// `InvalidParameter` for bad rates or zero customers.
    pub fn run(&self) -> QueueResult<SimulationReport> {
        let rng = match self.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_rng(&mut rand::rng()),
        };
        let mut source = ExponentialVariates::new(rng, self.arrival_rate, self.service_rate)?;
        self.run_with(&mut source)
    }

    /// Runs with durations drawn from `source`.
    ///
    /// The configured rates are validated but only `source` determines the
    /// sampled durations.
    ///
    /// # Errors
    /// `InvalidParameter` for bad rates, zero customers, or a sampled
    /// duration that is negative or not finite.
    pub fn run_with<V: VariateSource + ?Sized>(
        &self,
        source: &mut V,
    ) -> QueueResult<SimulationReport> {
        check_rate("arrival_rate", self.arrival_rate)?;
        check_rate("service_rate", self.service_rate)?;
        if self.customers == 0 {
            return Err(QueueError::invalid("customers", "at least one customer required"));
        }

        let mut clock = 0.0;
        let mut next_arrival = duration("interarrival", source.interarrival())?;
        let mut next_departure = f64::INFINITY;
        let mut queue: VecDeque<f64> = VecDeque::new();
        let mut in_service: Option<InService> = None;

        let mut departed = 0usize;
        let mut total_sojourn = 0.0;
        let mut total_wait = 0.0;
        let mut idle_time = 0.0;
        let mut system_area = 0.0;
        let mut queue_area = 0.0;
        let mut peak_queue_length = 0usize;

        while departed < self.customers {
            let next_event = next_arrival.min(next_departure);
            let elapsed = next_event - clock;
            let in_system = queue.len() + usize::from(in_service.is_some());
            system_area += in_system as f64 * elapsed;
            queue_area += queue.len() as f64 * elapsed;
            if in_service.is_none() {
                idle_time += elapsed;
            }
            clock = next_event;

            if next_arrival < next_departure {
                if in_service.is_none() {
                    in_service = Some(InService {
                        arrived_at: clock,
                        started_at: clock,
                    });
                    next_departure = clock + duration("service", source.service())?;
                } else {
                    queue.push_back(clock);
                    peak_queue_length = peak_queue_length.max(queue.len());
                }
                next_arrival = clock + duration("interarrival", source.interarrival())?;
            } else if let Some(done) = in_service.take() {
                departed += 1;
                total_sojourn += clock - done.arrived_at;
                total_wait += done.started_at - done.arrived_at;

                match queue.pop_front() {
                    Some(arrived_at) => {
                        in_service = Some(InService {
                            arrived_at,
                            started_at: clock,
                        });
                        next_departure = clock + duration("service", source.service())?;
                    }
                    None => next_departure = f64::INFINITY,
                }
            }
        }

        let n = departed as f64;
        let probability_idle = if clock > 0.0 { idle_time / clock } else { 0.0 };
        let report = SimulationReport {
            customers: departed,
            horizon: clock,
            average_time_in_system: total_sojourn / n,
            average_time_in_queue: total_wait / n,
            average_customers_in_system: if clock > 0.0 { system_area / clock } else { 0.0 },
            average_customers_in_queue: if clock > 0.0 { queue_area / clock } else { 0.0 },
            probability_idle,
            probability_busy: 1.0 - probability_idle,
            peak_queue_length,
        };

        debug!(
            customers = report.customers,
            horizon = report.horizon,
            w = report.average_time_in_system,
            wq = report.average_time_in_queue,
            p0 = report.probability_idle,
            "finished M/M/1 simulation"
        );
        Ok(report)
    }
}

/// Rejects samples that would stall or corrupt the event clock.
fn duration(name: &'static str, value: f64) -> QueueResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(QueueError::invalid(
            name,
            format!("sampled duration must be finite and non-negative, got {value}"),
        ))
    }
}
