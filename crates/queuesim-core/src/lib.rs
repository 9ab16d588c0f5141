//! queuesim: discrete-event simulator for M/M/1 queues behind a load balancer.
//!
//! This crate provides the simulation engine that models a Poisson arrival
//! stream, a probabilistic router, and one or more single-server FIFO queues
//! with exponential service and bounded waiting rooms. Routing policies from
//! `queuesim-routing` decide which server receives each arrival.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐     ┌───────────┐     ┌──────────────┐
//! │  Config  │────▶│  Engine   │────▶│   Metrics    │
//! │ (TOML/CLI)│    │ (Events)  │     │  Collection  │
//! └──────────┘     └─────┬─────┘     └──────────────┘
//!                        │
//!                ┌───────┴───────┐
//!                │ Load balancer │
//!                │   (Policy)    │
//!                └───────┬───────┘
//!                        │
//!          ┌─────────────┼─────────────┐
//!          ▼             ▼             ▼
//!    ┌──────────┐  ┌──────────┐  ┌──────────┐
//!    │ Server 0 │  │ Server 1 │  │ Server N │
//!    │  FIFO    │  │  FIFO    │  │  FIFO    │
//!    └──────────┘  └──────────┘  └──────────┘
//! ```
//!
//! Servers push their departures back onto the engine's event clock, so the
//! whole system shares one causal order.

pub mod balancer;
pub mod clock;
pub mod config;
pub mod engine;
pub mod event;
pub mod metrics;
pub mod random;
pub mod server;
pub mod task;

// Re-export key types for convenience.
pub use balancer::LoadBalancer;
pub use clock::{EventClock, Scheduler};
pub use config::{ConfigError, SimConfig};
pub use engine::{SimError, SimulationEngine};
pub use event::{Event, EventKind};
pub use metrics::{Mm1Report, Mm1Theory, SimulationReport, SimulationSummary};
pub use random::{SeededVariates, VariateSource};
pub use server::{Outcome, ServerStats, SingleQueueServer};
pub use task::{CompletedTask, Task};

/// Run a complete simulation with the given config.
pub fn run_simulation(config: &SimConfig) -> Result<SimulationReport, SimError> {
    SimulationEngine::new(config)?.run()
}

/// Run a single-server configuration and compare it with M/M/1 theory.
pub fn run_mm1(config: &SimConfig) -> Result<Mm1Report, SimError> {
    let report = run_simulation(config)?;
    let theory = match config.servers.as_slice() {
        [server] => Mm1Theory::new(
            config.simulation.arrival_rate,
            server.service_rate,
            config.simulation.horizon,
        ),
        _ => None,
    };
    Ok(Mm1Report::new(&report.summary, theory))
}

/// Run the same config under several routing policies.
pub fn compare_policies(
    config: &SimConfig,
    policy_names: &[&str],
) -> Result<Vec<SimulationReport>, SimError> {
    policy_names
        .iter()
        .map(|name| run_simulation(&config.clone().with_routing(*name)))
        .collect()
}
