//! Round-robin routing.
//!
//! Cycles through servers by id, ignoring weights and server state. The
//! rotation involves no randomness, which makes per-server arrival sequences
//! fully predictable.

use crate::traits::*;
use rand::RngCore;

/// Round-robin router.
///
/// Tracks the last-used server by id rather than positional index, so the
/// rotation stays stable if the snapshot list is not contiguous.
pub struct RoundRobin {
    last_server_id: Option<ServerId>,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self {
            last_server_id: None,
        }
    }
}

impl Default for RoundRobin {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingPolicy for RoundRobin {
    fn route(&mut self, servers: &[ServerSnapshot], _rng: &mut dyn RngCore) -> RoutingDecision {
        let chosen = match self.last_server_id {
            Some(last_id) => servers
                .iter()
                .find(|s| s.id > last_id)
                .or_else(|| servers.first()),
            None => servers.first(),
        };

        match chosen {
            Some(server) => {
                self.last_server_id = Some(server.id);
                RoutingDecision::Route(server.id)
            }
            None => RoutingDecision::Reject,
        }
    }

    fn name(&self) -> &str {
        "round_robin"
    }
}
