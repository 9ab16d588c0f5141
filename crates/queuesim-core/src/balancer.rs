//! Load balancer in front of the single-queue servers.
//!
//! Arrivals are assigned to a server by the configured [`RoutingPolicy`];
//! departures go back to the server that scheduled them.

use crate::clock::Scheduler;
use crate::event::{Event, EventKind};
use crate::metrics::{self, SimulationSummary};
use crate::random::VariateSource;
use crate::server::{Outcome, ServerStats, SingleQueueServer};
use queuesim_routing::{RoutingDecision, RoutingError, RoutingPolicy, ServerId, ServerSnapshot};
use tracing::warn;

/// Owns every server and the policy that routes arrivals between them.
pub struct LoadBalancer {
    servers: Vec<SingleQueueServer>,
    policy: Box<dyn RoutingPolicy>,
    /// Reused for every arrival's policy view.
    snapshots: Vec<ServerSnapshot>,
    /// Arrivals seen so far.
    arrivals: u64,
    /// Arrivals the policy refused to route.
    rejected: u64,
}

impl LoadBalancer {
    /// Server ids are assigned from their position in `servers`.
    pub fn new(servers: Vec<SingleQueueServer>, policy: Box<dyn RoutingPolicy>) -> Self {
        debug_assert!(
            servers
                .iter()
                .enumerate()
                .all(|(i, s)| s.id() as usize == i),
            "server ids must match their position"
        );
        let snapshots = Vec::with_capacity(servers.len());
        Self {
            servers,
            policy,
            snapshots,
            arrivals: 0,
            rejected: 0,
        }
    }

    /// Build servers from parallel `(capacity, service_rate)` pairs.
    pub fn with_servers(
        specs: impl IntoIterator<Item = (usize, f64)>,
        policy: Box<dyn RoutingPolicy>,
    ) -> Self {
        let servers = specs
            .into_iter()
            .enumerate()
            .map(|(i, (capacity, rate))| SingleQueueServer::new(i as ServerId, capacity, rate))
            .collect();
        Self::new(servers, policy)
    }

    /// Dispatch one event to the server that owns it.
    ///
    /// Returns `Ok(None)` when the policy rejected an arrival outright.
    pub fn route(
        &mut self,
        event: &Event,
        scheduler: &mut dyn Scheduler,
        variates: &mut dyn VariateSource,
    ) -> Result<Option<Outcome>, RoutingError> {
        let target = match event.kind() {
            EventKind::Arrival => {
                self.arrivals += 1;
                self.snapshots.clear();
                self.snapshots
                    .extend(self.servers.iter().map(|s| s.snapshot()));
                match self.policy.route(&self.snapshots, variates.rng()) {
                    RoutingDecision::Route(id) => id,
                    RoutingDecision::Reject => {
                        warn!(
                            policy = self.policy.name(),
                            time = event.time(),
                            "arrival rejected by routing policy"
                        );
                        self.rejected += 1;
                        return Ok(None);
                    }
                }
            }
            EventKind::Departure { server } => server,
        };

        let server = self
            .servers
            .get_mut(target as usize)
            .ok_or(RoutingError::UnknownServer(target))?;
        Ok(Some(server.process(event, scheduler, variates)))
    }

    pub fn servers(&self) -> &[SingleQueueServer] {
        &self.servers
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn server_stats(&self) -> Vec<ServerStats> {
        self.servers.iter().map(|s| s.stats()).collect()
    }

    /// Reduce every server's counters into the global summary.
    pub fn stats(&self) -> SimulationSummary {
        metrics::summarize(&self.server_stats(), self.rejected)
    }
}
