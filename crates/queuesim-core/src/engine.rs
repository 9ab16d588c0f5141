//! Discrete-event simulation driver.
//!
//! The engine owns the [`EventClock`]. Each iteration pops the earliest event,
//! schedules the next global arrival if the popped event is an arrival before
//! the horizon, and dispatches the event to the [`LoadBalancer`]. The run ends
//! when the clock is empty, so jobs still queued at the horizon are drained.

use crate::balancer::LoadBalancer;
use crate::clock::{EventClock, Scheduler};
use crate::config::SimConfig;
use crate::event::Event;
use crate::metrics::SimulationReport;
use crate::random::{SeededVariates, VariateSource};
use queuesim_routing::{self, RoutingError, RoutingPolicy};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Routing failed: {0}")]
    Routing(#[from] RoutingError),
}

/// The main simulation engine.
pub struct SimulationEngine {
    /// Pending events (min-heap by time).
    clock: EventClock,
    balancer: LoadBalancer,
    variates: Box<dyn VariateSource>,
    horizon: f64,
    arrival_rate: f64,
    name: String,
    seed: Option<u64>,
    /// Total events processed.
    pub events_processed: u64,
    /// Arrival events dispatched.
    pub arrivals: u64,
}

impl SimulationEngine {
    /// Create an engine from a validated config, using its routing policy.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        let policy =
            queuesim_routing::policy_by_name(&config.simulation.routing, &config.weights())?;
        Ok(Self::with_policy(config, policy))
    }

    /// Create an engine with an explicit routing policy.
    pub fn with_policy(config: &SimConfig, policy: Box<dyn RoutingPolicy>) -> Self {
        let variates = Box::new(SeededVariates::new(config.simulation.seed));
        Self::with_parts(config, policy, variates)
    }

    /// Create an engine with an explicit policy and variate source.
    pub fn with_parts(
        config: &SimConfig,
        policy: Box<dyn RoutingPolicy>,
        variates: Box<dyn VariateSource>,
    ) -> Self {
        let balancer = LoadBalancer::with_servers(
            config
                .servers
                .iter()
                .map(|s| (s.capacity, s.service_rate)),
            policy,
        );
        Self {
            clock: EventClock::new(),
            balancer,
            variates,
            horizon: config.simulation.horizon,
            arrival_rate: config.simulation.arrival_rate,
            name: config.simulation.name.clone(),
            seed: config.simulation.seed,
            events_processed: 0,
            arrivals: 0,
        }
    }

    pub fn balancer(&self) -> &LoadBalancer {
        &self.balancer
    }

    /// Get the number of pending events.
    pub fn pending_events(&self) -> usize {
        self.clock.len()
    }

    /// Seed the clock with the first arrival.
    fn prime(&mut self) {
        let first = self.variates.exponential(self.arrival_rate);
        self.clock.schedule(Event::arrival(first));
    }

    /// Pop and dispatch one event. Returns `Ok(None)` once the clock is empty.
    pub fn step(&mut self) -> Result<Option<Event>, SimError> {
        let Some(event) = self.clock.pop() else {
            return Ok(None);
        };

        if event.is_arrival() {
            self.arrivals += 1;
            // The next inter-arrival gap is measured from this arrival.
            if event.time() < self.horizon {
                let next = event.time() + self.variates.exponential(self.arrival_rate);
                self.clock.schedule(Event::arrival(next));
            }
        }

        trace!(time = event.time(), kind = ?event.kind(), "dispatching event");
        self.balancer
            .route(&event, &mut self.clock, self.variates.as_mut())?;
        self.events_processed += 1;
        Ok(Some(event))
    }

    /// Run the simulation until all events are processed.
    pub fn run(&mut self) -> Result<SimulationReport, SimError> {
        debug!(
            name = %self.name,
            horizon = self.horizon,
            arrival_rate = self.arrival_rate,
            servers = self.balancer.servers().len(),
            policy = self.balancer.policy_name(),
            "starting simulation"
        );

        self.prime();
        while self.step()?.is_some() {}

        let report = self.report();
        debug!(
            served = report.summary.served,
            dropped = report.summary.dropped,
            events = report.events_processed,
            "simulation drained"
        );
        Ok(report)
    }

    /// Snapshot the current statistics.
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            name: self.name.clone(),
            policy: self.balancer.policy_name().to_string(),
            seed: self.seed,
            arrivals: self.arrivals,
            events_processed: self.events_processed,
            rejected: self.balancer.rejected(),
            summary: self.balancer.stats(),
            per_server: self.balancer.server_stats(),
        }
    }
}
