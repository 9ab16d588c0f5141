//! Weighted random routing.
//!
//! Each arrival is sent to server `i` with probability `p_i`, independently of
//! the current server state. Over many arrivals the fraction routed to each
//! server converges to its weight.

use crate::traits::*;
use rand::RngCore;
use rand_distr::{Distribution, WeightedIndex};

/// Probabilistic router driven by a single weighted-categorical draw per job.
pub struct WeightedRandom {
    index: WeightedIndex<f64>,
}

impl WeightedRandom {
    /// Build the router. `weights[i]` is the routing probability of server `i`.
    pub fn new(weights: &[f64]) -> Result<Self, RoutingError> {
        validate_weights(weights)?;
        let index = WeightedIndex::new(weights)
            .map_err(|e| RoutingError::InvalidWeights(e.to_string()))?;
        Ok(Self { index })
    }
}

impl RoutingPolicy for WeightedRandom {
    fn route(&mut self, servers: &[ServerSnapshot], rng: &mut dyn RngCore) -> RoutingDecision {
        let idx = self.index.sample(rng);
        // An index past the server list is passed through so the balancer
        // reports it as an unknown target.
        match servers.get(idx) {
            Some(server) => RoutingDecision::Route(server.id),
            None => RoutingDecision::Route(idx as ServerId),
        }
    }

    fn name(&self) -> &str {
        "weighted_random"
    }
}
