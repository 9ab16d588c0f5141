//! Statistics aggregation for simulation runs.
//!
//! Per-server counters are reduced into a [`SimulationSummary`]: totals of
//! served and dropped jobs, the last departure time, and served-weighted mean
//! wait and service times. The single-queue [`Mm1Report`] adds closed-form
//! M/M/1 predictions for comparison.

use crate::server::ServerStats;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round to four decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// The global 5-tuple produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub served: u64,
    pub dropped: u64,
    /// Latest departure across all servers, rounded to 4 decimals.
    pub max_departure_time: f64,
    /// Served-weighted mean wait, rounded to 4 decimals.
    pub mean_wait_time: f64,
    /// Served-weighted mean service time, rounded to 4 decimals.
    pub mean_service_time: f64,
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.served,
            self.dropped,
            self.max_departure_time,
            self.mean_wait_time,
            self.mean_service_time
        )
    }
}

/// Reduce per-server counters into global totals.
///
/// `rejected` counts arrivals refused by the routing policy before reaching
/// any server; they are reported as dropped. Both means are zero when nothing
/// was served.
pub fn summarize(servers: &[ServerStats], rejected: u64) -> SimulationSummary {
    let served: u64 = servers.iter().map(|s| s.served).sum();
    let dropped: u64 = servers.iter().map(|s| s.dropped).sum::<u64>() + rejected;
    let max_departure = servers
        .iter()
        .map(|s| s.last_departure_time)
        .fold(0.0, f64::max);
    let total_wait: f64 = servers.iter().map(|s| s.total_wait_time).sum();
    let total_service: f64 = servers.iter().map(|s| s.total_service_time).sum();

    let (mean_wait, mean_service) = if served > 0 {
        (
            round4(total_wait / served as f64),
            round4(total_service / served as f64),
        )
    } else {
        (0.0, 0.0)
    };

    SimulationSummary {
        served,
        dropped,
        max_departure_time: round4(max_departure),
        mean_wait_time: mean_wait,
        mean_service_time: mean_service,
    }
}

/// Full result of a load-balanced run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Configuration name.
    pub name: String,
    /// Routing policy name.
    pub policy: String,
    pub seed: Option<u64>,
    /// Arrival events dispatched, including those after the horizon.
    pub arrivals: u64,
    pub events_processed: u64,
    /// Arrivals refused by the routing policy.
    pub rejected: u64,
    pub summary: SimulationSummary,
    pub per_server: Vec<ServerStats>,
}

impl SimulationReport {
    /// Empty-buffer departures observed across all servers.
    pub fn invariant_violations(&self) -> u64 {
        self.per_server.iter().map(|s| s.invariant_violations).sum()
    }
}

/// Closed-form M/M/1 predictions. Absent when the queue is unstable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mm1Theory {
    /// Expected arrivals over the horizon, `λT`.
    pub expected_served: f64,
    /// Reference mean wait, `1 / (μ(μ − λ))`. Wait errors are measured
    /// against this value.
    pub expected_wait: f64,
    /// Textbook M/M/1 time in queue, `λ / (μ(μ − λ))`. Equals
    /// `expected_wait` when `λ = 1`.
    pub expected_queue_delay: f64,
    /// Expected time in system, `1 / (μ − λ)`.
    pub expected_sojourn: f64,
}

impl Mm1Theory {
    pub fn new(arrival_rate: f64, service_rate: f64, horizon: f64) -> Option<Self> {
        if arrival_rate <= 0.0 || service_rate <= arrival_rate {
            return None;
        }
        Some(Self {
            expected_served: arrival_rate * horizon,
            expected_wait: 1.0 / (service_rate * (service_rate - arrival_rate)),
            expected_queue_delay: arrival_rate / (service_rate * (service_rate - arrival_rate)),
            expected_sojourn: 1.0 / (service_rate - arrival_rate),
        })
    }
}

/// Single-queue report with deviation from M/M/1 theory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mm1Report {
    pub served: u64,
    pub dropped: u64,
    pub mean_wait_time: f64,
    pub theory: Option<Mm1Theory>,
    /// `100 × |expected − observed| / expected` for the served count.
    pub served_error_pct: Option<f64>,
    /// `100 × |expected − observed| / expected` for the mean wait.
    pub wait_error_pct: Option<f64>,
}

impl Mm1Report {
    pub fn new(summary: &SimulationSummary, theory: Option<Mm1Theory>) -> Self {
        Self {
            served: summary.served,
            dropped: summary.dropped,
            mean_wait_time: summary.mean_wait_time,
            theory,
            served_error_pct: theory
                .map(|t| percent_error(t.expected_served, summary.served as f64)),
            wait_error_pct: theory.map(|t| percent_error(t.expected_wait, summary.mean_wait_time)),
        }
    }
}

fn percent_error(expected: f64, observed: f64) -> f64 {
    if expected == 0.0 {
        return 0.0;
    }
    100.0 * (expected - observed).abs() / expected
}

/// Format a report as a human-readable table.
pub fn format_table(report: &SimulationReport) -> String {
    let s = &report.summary;
    let mut out = String::new();
    out.push_str(&format!(
        "╔══════════════════════════════════════════════════╗\n\
         ║  Simulation: {:<36}║\n\
         ║  Policy: {:<40}║\n\
         ╠══════════════════════════════════════════════════╣\n",
        report.name, report.policy
    ));
    out.push_str(&format!(
        "║  Arrivals:          {:<29}║\n\
         ║  Served:            {:<29}║\n\
         ║  Dropped:           {:<29}║\n\
         ║  Last departure:    {:<29.4}║\n\
         ║  Mean wait:         {:<29.4}║\n\
         ║  Mean service:      {:<29.4}║\n\
         ║  Events processed:  {:<29}║\n",
        report.arrivals,
        s.served,
        s.dropped,
        s.max_departure_time,
        s.mean_wait_time,
        s.mean_service_time,
        report.events_processed,
    ));
    out.push_str("╠══════════════════════════════════════════════════╣\n");
    out.push_str("║  Server  Arrivals   Served  Dropped   Mean wait  ║\n");
    for server in &report.per_server {
        let mean_wait = if server.served > 0 {
            server.total_wait_time / server.served as f64
        } else {
            0.0
        };
        out.push_str(&format!(
            "║  {:<6}  {:>8} {:>8} {:>8} {:>11.4}  ║\n",
            server.id, server.arrivals, server.served, server.dropped, mean_wait
        ));
    }
    out.push_str("╚══════════════════════════════════════════════════╝\n");
    out
}

/// Format the single-queue report, one line per figure.
pub fn format_mm1(report: &Mm1Report) -> String {
    let mut out = format!(
        "Number of customers served: {}\n\
         Number of customers dropped: {}\n\
         Average wait time: {}\n",
        report.served, report.dropped, report.mean_wait_time
    );
    match (report.served_error_pct, report.wait_error_pct) {
        (Some(served), Some(wait)) => {
            out.push_str(&format!("avg total served error: {:.4}%\n", served));
            out.push_str(&format!("avg wait time error: {:.4}%\n", wait));
        }
        _ => out.push_str("queue is unstable (arrival rate >= service rate); no prediction\n"),
    }
    out
}
