//! Join-the-shortest-queue routing.
//!
//! Sends each arrival to the server holding the fewest tasks, preferring
//! servers that still have buffer room. Ties go to the lowest id.

use crate::traits::*;
use rand::RngCore;

/// Shortest-queue router.
pub struct LeastQueue;

impl LeastQueue {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LeastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingPolicy for LeastQueue {
    fn route(&mut self, servers: &[ServerSnapshot], _rng: &mut dyn RngCore) -> RoutingDecision {
        // With every buffer full the shortest one still receives the job, so
        // the drop is recorded by that server.
        let best = servers
            .iter()
            .filter(|s| s.has_room())
            .min_by_key(|s| s.queue_len)
            .or_else(|| servers.iter().min_by_key(|s| s.queue_len));

        match best {
            Some(server) => RoutingDecision::Route(server.id),
            None => RoutingDecision::Reject,
        }
    }

    fn name(&self) -> &str {
        "least_queue"
    }
}
