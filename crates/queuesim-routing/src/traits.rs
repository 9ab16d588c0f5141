//! Routing policy trait definitions.
//!
//! All routing policies implement the [`RoutingPolicy`] trait, which receives
//! a read-only view of every server behind the load balancer and a handle to
//! the simulation's random generator.

use rand::RngCore;
use thiserror::Error;

/// Identifier of a single-queue server behind the load balancer.
pub type ServerId = u32;

/// Tolerance applied when checking that routing weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Errors raised while building a policy or resolving a routing target.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("Invalid routing weights: {0}")]
    InvalidWeights(String),
    #[error("Unknown routing policy: {0}")]
    UnknownPolicy(String),
    #[error("Event targets unknown server {0}")]
    UnknownServer(ServerId),
}

/// Read-only snapshot of a server, provided to routing policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSnapshot {
    pub id: ServerId,
    /// Tasks in the buffer, including the one in service.
    pub queue_len: usize,
    /// Waiting-room size (excludes the task in service).
    pub capacity: usize,
}

impl ServerSnapshot {
    /// Whether one more task fits in the buffer.
    pub fn has_room(&self) -> bool {
        self.queue_len <= self.capacity
    }
}

/// Decision returned by a routing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Forward the arrival to a specific server.
    Route(ServerId),
    /// Refuse the arrival before it reaches any server.
    Reject,
}

/// The core routing trait.
///
/// The load balancer calls [`RoutingPolicy::route`] exactly once per arrival.
/// Randomized policies draw from `rng` so the whole run stays reproducible
/// under a single seed.
pub trait RoutingPolicy: Send {
    fn route(&mut self, servers: &[ServerSnapshot], rng: &mut dyn RngCore) -> RoutingDecision;

    /// Human-readable name for reports.
    fn name(&self) -> &str;
}

/// Check that `weights` form a probability vector.
pub fn validate_weights(weights: &[f64]) -> Result<(), RoutingError> {
    if weights.is_empty() {
        return Err(RoutingError::InvalidWeights(
            "at least one weight is required".to_string(),
        ));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(RoutingError::InvalidWeights(format!(
            "weights must be finite and non-negative, got {}",
            w
        )));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() >= WEIGHT_SUM_TOLERANCE {
        return Err(RoutingError::InvalidWeights(format!(
            "weights must sum to 1, got {}",
            sum
        )));
    }
    Ok(())
}
