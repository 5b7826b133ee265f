use std::sync::Arc;

use namedlog::{Builder, LogError, Severity};
use serde_json::Value;

// Installing a facade backend is once per process, so this file holds a
// single test.
#[test]
fn log_macros_reach_the_installed_logger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("facade.json");

    let logger = Builder::new("facade")
        .with_level(Severity::Info)
        .with_json(true)
        .with_file_sink(path.to_string_lossy())
        .build()
        .unwrap();
    let logger = Arc::new(logger);
    Arc::clone(&logger).install().unwrap();

    log::debug!("filtered out");
    let line = line!() + 1;
    log::warn!("disk usage at {}%", 91);
    log::logger().flush();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);

    let value: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["level"], "WARNING");
    assert_eq!(value["name"], "facade");
    assert_eq!(value["message"], "disk usage at 91%");
    assert_eq!(value["line"], line);

    let second = Arc::new(Builder::new("second").build().unwrap());
    assert!(matches!(second.install(), Err(LogError::AlreadyInstalled)));
}
