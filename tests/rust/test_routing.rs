/// Integration tests for routing policies behind the load balancer.
use queuesim_core::config::SimConfig;
use queuesim_core::{run_simulation, Event, EventClock, LoadBalancer, SeededVariates};
use queuesim_routing::*;

#[test]
fn test_routing_fairness_through_balancer() {
    let weights = [0.1, 0.3, 0.6];
    let mut lb = LoadBalancer::with_servers(
        weights.iter().map(|_| (100_000, 1.0)),
        Box::new(WeightedRandom::new(&weights).unwrap()),
    );
    let mut clock = EventClock::new();
    let mut variates = SeededVariates::new(Some(99));

    let n = 20_000;
    for i in 0..n {
        lb.route(&Event::arrival(i as f64), &mut clock, &mut variates)
            .unwrap();
    }
    for (server, weight) in lb.servers().iter().zip(weights) {
        let fraction = server.stats().arrivals as f64 / n as f64;
        assert!(
            (fraction - weight).abs() < 0.02,
            "server {} got {} of arrivals, expected {}",
            server.id(),
            fraction,
            weight
        );
    }
}

#[test]
fn test_uneven_weights_end_to_end() {
    let config = SimConfig::from_str(
        r#"
[simulation]
horizon = 10000.0
arrival_rate = 2.0
seed = 12

[[servers]]
weight = 0.25
capacity = 1000
service_rate = 2.0

[[servers]]
weight = 0.75
capacity = 1000
service_rate = 4.0
"#,
    )
    .unwrap();
    let report = run_simulation(&config).unwrap();
    let fraction = report.per_server[1].arrivals as f64 / report.arrivals as f64;
    assert!((fraction - 0.75).abs() < 0.02, "fraction = {}", fraction);
}

#[test]
fn test_unknown_policy_rejected() {
    assert!(matches!(
        policy_by_name("least_loaded", &[1.0]),
        Err(RoutingError::UnknownPolicy(_))
    ));
}

#[test]
fn test_registry_lists_builtins() {
    let names = available_policies();
    assert!(names.contains(&"weighted_random"));
    assert!(names.contains(&"round_robin"));
    assert!(names.contains(&"least_queue"));
}

#[test]
fn test_least_queue_end_to_end() {
    let config = SimConfig::from_str(
        r#"
[simulation]
horizon = 2000.0
arrival_rate = 3.0
seed = 31
routing = "least_queue"

[[servers]]
weight = 0.5
capacity = 4
service_rate = 2.0

[[servers]]
weight = 0.5
capacity = 4
service_rate = 2.0
"#,
    )
    .unwrap();
    let report = run_simulation(&config).unwrap();
    assert_eq!(report.policy, "least_queue");
    assert!(report.per_server.iter().all(|s| s.arrivals > 0));
    assert_eq!(
        report.summary.served + report.summary.dropped,
        report.arrivals
    );
    assert_eq!(report.rejected, 0);
    assert_eq!(report.invariant_violations(), 0);
}
