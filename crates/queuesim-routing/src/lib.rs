//! Routing policies for the queuesim load balancer.
//!
//! This crate provides the [`RoutingPolicy`] trait and the built-in policies
//! that decide which single-queue server receives each arriving job:
//!
//! | Policy | Strategy | Best For |
//! |--------|----------|----------|
//! | [`WeightedRandom`] | One weighted-categorical draw per arrival | Probabilistic splitting (Poisson thinning) |
//! | [`RoundRobin`] | Cycle through servers by id | Deterministic, evenly spread arrivals |
//! | [`LeastQueue`] | Fewest tasks, preferring servers with room | Load-aware balancing |

pub mod least_queue;
pub mod round_robin;
pub mod traits;
pub mod weighted_random;

pub use least_queue::LeastQueue;
pub use round_robin::RoundRobin;
pub use traits::*;
pub use weighted_random::WeightedRandom;

/// Create a routing policy by name.
///
/// `weights` is only consulted by policies that route probabilistically, but
/// it is always validated so every configuration carries a well-formed
/// probability vector.
pub fn policy_by_name(
    name: &str,
    weights: &[f64],
) -> Result<Box<dyn RoutingPolicy>, RoutingError> {
    match name {
        "weighted_random" => Ok(Box::new(WeightedRandom::new(weights)?)),
        "round_robin" => {
            validate_weights(weights)?;
            Ok(Box::new(RoundRobin::new()))
        }
        "least_queue" => {
            validate_weights(weights)?;
            Ok(Box::new(LeastQueue::new()))
        }
        other => Err(RoutingError::UnknownPolicy(other.to_string())),
    }
}

/// List all available built-in policy names.
pub fn available_policies() -> Vec<&'static str> {
    vec!["weighted_random", "round_robin", "least_queue"]
}
