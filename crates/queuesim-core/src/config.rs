//! Configuration for queuesim runs.
//!
//! A run is described by a [`SimConfig`], loaded either from TOML or from the
//! positional command-line form `T M P_1..P_M λ Q_1..Q_M μ_1..μ_M`.

use queuesim_routing::{available_policies, validate_weights};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Expected {expected} arguments, got {found}")]
    ArgumentCount { expected: usize, found: usize },
    #[error("Invalid value for {name}: {value:?}")]
    InvalidNumber { name: String, value: String },
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub simulation: SimulationSection,
    pub servers: Vec<ServerSection>,
}

/// General simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSection {
    /// Human-readable name for this simulation.
    #[serde(default = "default_sim_name")]
    pub name: String,
    /// Time after which no new arrivals are generated.
    pub horizon: f64,
    /// Poisson arrival rate (λ).
    pub arrival_rate: f64,
    /// Random seed; absent means a non-deterministic run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Routing policy name.
    #[serde(default = "default_routing")]
    pub routing: String,
}

fn default_sim_name() -> String {
    "simulation".to_string()
}

fn default_routing() -> String {
    "weighted_random".to_string()
}

/// One single-queue server behind the load balancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    /// Routing probability.
    pub weight: f64,
    /// Waiting-room size, not counting the job in service.
    pub capacity: usize,
    /// Exponential service rate (μ).
    pub service_rate: f64,
}

/// Usage line for the positional form.
pub const POSITIONAL_USAGE: &str = "T M P_1 P_2 ... P_M λ Q_1 Q_2 ... Q_M μ_1 μ_2 ... μ_M";

fn parse_value<T: FromStr>(name: impl Into<String>, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name: name.into(),
        value: raw.to_string(),
    })
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Build a single-server configuration with weight 1.
    pub fn single_queue(
        horizon: f64,
        arrival_rate: f64,
        capacity: usize,
        service_rate: f64,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            simulation: SimulationSection {
                name: "mm1".to_string(),
                horizon,
                arrival_rate,
                seed,
                routing: default_routing(),
            },
            servers: vec![ServerSection {
                weight: 1.0,
                capacity,
                service_rate,
            }],
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse the positional form `T M P_1..P_M λ Q_1..Q_M μ_1..μ_M`.
    ///
    /// The argument count is checked against `3 + 3M` before any other
    /// value is parsed.
    pub fn from_positional<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        if args.len() < 2 {
            return Err(ConfigError::ArgumentCount {
                expected: 6,
                found: args.len(),
            });
        }
        let num_servers: usize = parse_value("M", args[1].as_ref())?;
        if num_servers == 0 {
            return Err(ConfigError::Validation(
                "number of servers must be >= 1".to_string(),
            ));
        }
        let expected = 3 + 3 * num_servers;
        if args.len() != expected {
            return Err(ConfigError::ArgumentCount {
                expected,
                found: args.len(),
            });
        }

        let horizon: f64 = parse_value("T", args[0].as_ref())?;
        let weights_at = 2;
        let rate_at = weights_at + num_servers;
        let capacities_at = rate_at + 1;
        let service_at = capacities_at + num_servers;
        let arrival_rate: f64 = parse_value("λ", args[rate_at].as_ref())?;

        let servers = (0..num_servers)
            .map(|i| -> Result<ServerSection, ConfigError> {
                Ok(ServerSection {
                    weight: parse_value(format!("P_{}", i + 1), args[weights_at + i].as_ref())?,
                    capacity: parse_value(format!("Q_{}", i + 1), args[capacities_at + i].as_ref())?,
                    service_rate: parse_value(
                        format!("μ_{}", i + 1),
                        args[service_at + i].as_ref(),
                    )?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let config = Self {
            simulation: SimulationSection {
                name: default_sim_name(),
                horizon,
                arrival_rate,
                seed: None,
                routing: default_routing(),
            },
            servers,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if !(sim.horizon.is_finite() && sim.horizon > 0.0) {
            return Err(ConfigError::Validation(format!(
                "horizon must be > 0, got {}",
                sim.horizon
            )));
        }
        if !(sim.arrival_rate.is_finite() && sim.arrival_rate > 0.0) {
            return Err(ConfigError::Validation(format!(
                "arrival_rate must be > 0, got {}",
                sim.arrival_rate
            )));
        }
        if self.servers.is_empty() {
            return Err(ConfigError::Validation(
                "at least one server is required".to_string(),
            ));
        }
        for (i, server) in self.servers.iter().enumerate() {
            if !(server.service_rate.is_finite() && server.service_rate > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "service_rate of server {} must be > 0, got {}",
                    i, server.service_rate
                )));
            }
        }
        validate_weights(&self.weights()).map_err(|e| ConfigError::Validation(e.to_string()))?;
        if !available_policies().contains(&sim.routing.as_str()) {
            return Err(ConfigError::Validation(format!(
                "unknown routing policy {:?}; available: {:?}",
                sim.routing,
                available_policies()
            )));
        }
        Ok(())
    }

    pub fn num_servers(&self) -> usize {
        self.servers.len()
    }

    /// Routing weights, in server order.
    pub fn weights(&self) -> Vec<f64> {
        self.servers.iter().map(|s| s.weight).collect()
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.simulation.seed = seed;
        self
    }

    pub fn with_routing(mut self, routing: impl Into<String>) -> Self {
        self.simulation.routing = routing.into();
        self
    }
}
