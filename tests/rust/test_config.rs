/// Integration tests for configuration loading.
use queuesim_core::config::{ConfigError, SimConfig};
use std::io::Write;

#[test]
fn test_from_file() {
    let dir = std::env::temp_dir().join(format!("queuesim-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("sim.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[simulation]
name = "from-file"
horizon = 50.0
arrival_rate = 0.5
seed = 1

[[servers]]
weight = 1.0
capacity = 3
service_rate = 1.0
"#
    )
    .unwrap();
    drop(file);

    let config = SimConfig::from_file(&path).unwrap();
    assert_eq!(config.simulation.name, "from-file");
    assert_eq!(config.num_servers(), 1);

    let report = queuesim_core::run_simulation(&config).unwrap();
    assert_eq!(
        report.summary.served + report.summary.dropped,
        report.arrivals
    );
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_file() {
    let result = SimConfig::from_file(std::path::Path::new("/nonexistent/queuesim.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_malformed_toml() {
    assert!(matches!(
        SimConfig::from_str("[simulation\nhorizon = 1"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_positional_matches_toml() {
    let positional = SimConfig::from_positional(&[
        "1000", "2", "0.5", "0.5", "1.0", "50", "50", "2.0", "2.0",
    ])
    .unwrap()
    .with_seed(Some(7));
    let toml = SimConfig::from_str(
        r#"
[simulation]
horizon = 1000.0
arrival_rate = 1.0
seed = 7

[[servers]]
weight = 0.5
capacity = 50
service_rate = 2.0

[[servers]]
weight = 0.5
capacity = 50
service_rate = 2.0
"#,
    )
    .unwrap();
    assert_eq!(positional, toml);
    assert_eq!(
        queuesim_core::run_simulation(&positional).unwrap(),
        queuesim_core::run_simulation(&toml).unwrap()
    );
}

#[test]
fn test_positional_rejections() {
    let cases: &[&[&str]] = &[
        &["1000", "2", "0.5", "0.5", "1.0", "50", "50", "2.0"],
        &["1000", "1", "0.9", "1.0", "5", "2.0"],
        &["-5", "1", "1.0", "1.0", "5", "2.0"],
        &["1000", "1", "1.0", "1.0", "5", "0"],
        &["1000", "0"],
        &["1000", "x"],
    ];
    for &args in cases {
        assert!(SimConfig::from_positional(args).is_err(), "{:?}", args);
    }
}
