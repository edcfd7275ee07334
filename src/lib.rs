//! Steady-state analysis of Markovian queueing systems.
//!
//! Computes utilization, idle probability, the occupancy distribution,
//! expected queue/system population and expected wait/sojourn times for the
//! classical single-queue models. All variants share one metric vocabulary
//! ([`models::QueueModel`]) so callers can swap models without changing
//! call sites.
//!
//! # Modules
//!
//! - **`models`**: `Mm1`, `Mm1k`, `Mm1m`, `Mmk`, `MmInf`, the `QueueModel`
//!   contract and the `QueueSystem` sum type
//! - **`params`**: Flat parameter set and variant selection
//! - **`validation`**: Parameter checks (rates, counts)
//! - **`metrics`**: Serializable steady-state report
//! - **`simulation`**: Discrete-event M/M/1 simulator for Monte Carlo checks
//! - **`error`**: `QueueError` (instability, degenerate model, invalid parameter)
//!
//! # Scope
//!
//! Steady state only: no transient analysis, no multi-class or priority
//! queues, no networks of queues, no general service distributions.
//!
//! # References
//!
//! - Gross et al. (2018), "Fundamentals of Queueing Theory"
//! - Kleinrock (1975), "Queueing Systems, Volume 1: Theory"
//! - Law (2015), "Simulation Modeling and Analysis"

pub mod error;
pub mod metrics;
pub mod models;
pub mod params;
pub mod simulation;
pub mod validation;

pub use error::{QueueError, QueueResult};
pub use models::{Mm1, Mm1k, Mm1m, MmInf, Mmk, QueueModel, QueueSystem};
pub use params::{select_model, QueueParams, Servers};
