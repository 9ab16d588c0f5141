/// Integration tests for the simulation engine.
use queuesim_core::config::SimConfig;
use queuesim_core::{
    run_mm1, run_simulation, Event, EventClock, Outcome, Scheduler, SeededVariates,
    SimulationEngine, SingleQueueServer,
};
use queuesim_routing::RoundRobin;

fn two_server_config(seed: u64) -> SimConfig {
    SimConfig::from_str(&format!(
        r#"
[simulation]
name = "two-servers"
horizon = 1000.0
arrival_rate = 1.0
seed = {}

[[servers]]
weight = 0.5
capacity = 50
service_rate = 2.0

[[servers]]
weight = 0.5
capacity = 50
service_rate = 2.0
"#,
        seed
    ))
    .unwrap()
}

#[test]
fn test_queueing_theory_convergence() {
    // Pool several seeds so the check is about the engine, not one seed's luck.
    let seeds = [1u64, 2, 3, 4, 5];
    let mut served = 0u64;
    let mut weighted_wait = 0.0;
    for seed in seeds {
        let config = SimConfig::single_queue(50_000.0, 1.0, 1000, 2.0, Some(seed)).unwrap();
        let report = run_mm1(&config).unwrap();
        assert_eq!(report.dropped, 0);
        served += report.served;
        weighted_wait += report.mean_wait_time * report.served as f64;
    }

    let mean_served = served as f64 / seeds.len() as f64;
    let mean_wait = weighted_wait / served as f64;
    assert!(
        (mean_served - 50_000.0).abs() / 50_000.0 < 0.01,
        "mean served {} not within 1% of 50000",
        mean_served
    );
    assert!(
        (mean_wait - 0.5).abs() / 0.5 < 0.05,
        "mean wait {} not within 5% of 0.5",
        mean_wait
    );
}

#[test]
fn test_mm1_report_has_prediction() {
    let config = SimConfig::single_queue(5_000.0, 1.0, 1000, 2.0, Some(9)).unwrap();
    let report = run_mm1(&config).unwrap();
    let theory = report.theory.unwrap();
    assert_eq!(theory.expected_served, 5_000.0);
    assert_eq!(theory.expected_wait, 0.5);
    assert!(report.served_error_pct.unwrap() < 10.0);
    assert!(report.wait_error_pct.is_some());
}

#[test]
fn test_drop_behavior() {
    let config = SimConfig::single_queue(1_000.0, 5.0, 0, 1.0, Some(17)).unwrap();
    let report = run_simulation(&config).unwrap();

    assert!(report.summary.dropped > 0);
    assert_eq!(
        report.summary.served + report.summary.dropped,
        report.arrivals
    );
    assert_eq!(report.invariant_violations(), 0);
    // Unstable queue: no closed-form prediction.
    assert!(run_mm1(&config).unwrap().theory.is_none());
}

#[test]
fn test_multi_server_scenario_is_reproducible() {
    let first = run_simulation(&two_server_config(2024)).unwrap();
    let second = run_simulation(&two_server_config(2024)).unwrap();
    assert_eq!(first.summary, second.summary);
    assert_eq!(first, second);

    let s = first.summary;
    assert_eq!(s.served + s.dropped, first.arrivals);
    // Poisson(1000) arrivals over [0, 1000).
    assert!(
        (850..=1150).contains(&first.arrivals),
        "arrivals = {}",
        first.arrivals
    );
    assert!(s.max_departure_time >= 1000.0 - 50.0);
    assert!(s.mean_service_time > 0.0);
}

#[test]
fn test_different_seeds_differ() {
    let a = run_simulation(&two_server_config(1)).unwrap();
    let b = run_simulation(&two_server_config(2)).unwrap();
    assert_ne!(a.summary, b.summary);
}

#[test]
fn test_conservation_per_server() {
    let config = SimConfig::from_str(
        r#"
[simulation]
horizon = 2000.0
arrival_rate = 3.0
seed = 5

[[servers]]
weight = 0.2
capacity = 2
service_rate = 1.0

[[servers]]
weight = 0.3
capacity = 5
service_rate = 1.0

[[servers]]
weight = 0.5
capacity = 0
service_rate = 1.5
"#,
    )
    .unwrap();
    let report = run_simulation(&config).unwrap();

    for server in &report.per_server {
        assert_eq!(
            server.served + server.dropped,
            server.arrivals,
            "server {} leaked jobs",
            server.id
        );
    }
    let routed: u64 = report.per_server.iter().map(|s| s.arrivals).sum();
    assert_eq!(routed, report.arrivals);
    assert_eq!(report.invariant_violations(), 0);
}

#[test]
fn test_capacity_bound_and_single_departure() {
    let config = SimConfig::from_str(
        r#"
[simulation]
horizon = 500.0
arrival_rate = 4.0
seed = 8

[[servers]]
weight = 0.5
capacity = 3
service_rate = 1.0

[[servers]]
weight = 0.5
capacity = 7
service_rate = 2.5
"#,
    )
    .unwrap();
    let report = run_simulation(&config).unwrap();
    assert!(report.summary.dropped > 0);
    assert_eq!(report.invariant_violations(), 0);

    // Drive one server by hand so every intermediate state is observable.
    let mut server = SingleQueueServer::new(0, 3, 1.0);
    let mut clock = EventClock::new();
    let mut variates = SeededVariates::new(Some(3));
    let mut next_arrival = 0.0;
    for _ in 0..5_000 {
        clock.schedule(Event::arrival(next_arrival));
        next_arrival += 0.3;
        while clock.peek().map_or(false, |e| e.time() < next_arrival) {
            let event = clock.pop().unwrap();
            server.process(&event, &mut clock, &mut variates);
            assert!(server.queue_len() <= server.buffer_limit());
            assert!(clock.pending_departures(0) <= 1);
            assert_eq!(server.is_busy(), server.queue_len() >= 1);
        }
    }
}

#[test]
fn test_fifo_departure_order() {
    let mut server = SingleQueueServer::new(0, 100, 1.0);
    let mut clock = EventClock::new();
    let mut variates = SeededVariates::new(Some(21));

    for i in 0..200 {
        clock.schedule(Event::arrival(i as f64 * 0.4));
    }
    let mut admitted = Vec::new();
    let mut departed = Vec::new();
    while let Some(event) = clock.pop() {
        match server.process(&event, &mut clock, &mut variates) {
            Outcome::Admitted { seq, .. } => admitted.push(seq),
            Outcome::Departed(done) => departed.push(done.seq),
            Outcome::Dropped => {}
            Outcome::Violation => panic!("invariant violated"),
        }
    }
    assert_eq!(admitted, departed);
}

#[test]
fn test_empty_system_reports_zero() {
    let config = SimConfig::from_str(
        r#"
[simulation]
horizon = 100.0
arrival_rate = 1.0
seed = 4

[[servers]]
weight = 1.0
capacity = 10
service_rate = 2.0

[[servers]]
weight = 0.0
capacity = 10
service_rate = 2.0
"#,
    )
    .unwrap();
    let report = run_simulation(&config).unwrap();
    let idle = &report.per_server[1];
    assert_eq!(idle.arrivals, 0);
    assert_eq!(idle.served, 0);
    assert_eq!(idle.dropped, 0);

    let engine = SimulationEngine::new(&config).unwrap();
    let summary = engine.report().summary;
    assert_eq!(summary.served, 0);
    assert_eq!(summary.mean_wait_time, 0.0);
    assert_eq!(summary.mean_service_time, 0.0);
}

#[test]
fn test_round_robin_policy_end_to_end() {
    let config = two_server_config(77).with_routing("round_robin");
    let report = run_simulation(&config).unwrap();
    assert_eq!(report.policy, "round_robin");
    let a = report.per_server[0].arrivals;
    let b = report.per_server[1].arrivals;
    assert!(a.abs_diff(b) <= 1, "{} vs {}", a, b);

    let mut engine = SimulationEngine::with_policy(&config, Box::new(RoundRobin::new()));
    assert_eq!(engine.run().unwrap(), report);
}

#[test]
fn test_compare_policies() {
    let config = two_server_config(3);
    let reports =
        queuesim_core::compare_policies(&config, &["weighted_random", "round_robin"]).unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].policy, "weighted_random");
    assert_eq!(reports[1].policy, "round_robin");
}

#[test]
fn test_report_serializes_to_json() {
    let report = run_simulation(&two_server_config(10)).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"mean_wait_time\""));
    let back: queuesim_core::SimulationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.summary.served, report.summary.served);
}
