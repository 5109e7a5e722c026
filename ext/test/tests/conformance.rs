//! Conformance tests that run YAML fixtures through the converter
//!
//! Run with: cargo test -p svcprof-test --test conformance

#![cfg(feature = "fixtures")]

use std::fs;
use std::path::{Path, PathBuf};
use svcprof_test::fixture::Fixture;

/// The fixtures directory lives next to this crate's manifest.
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    assert!(
        dir.exists(),
        "Fixtures directory does not exist: {}",
        dir.display()
    );

    let mut ran = 0;
    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            println!("Running fixture file: {}", path.display());

            let yaml = fs::read_to_string(&path).expect("read yaml");
            let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
                panic!("Failed to parse {}: {}", path.display(), e);
            });

            for fixture in fixtures {
                println!("  Running: {}", fixture.name);
                fixture.run_and_assert();
                ran += 1;
            }
        }
    }

    assert!(ran > 0, "no fixtures found in {}", dir.display());
}

#[test]
fn test_request_matches() {
    run_fixtures_in_dir(&fixtures_dir().join("01_request"));
}

#[test]
fn test_response_matches() {
    run_fixtures_in_dir(&fixtures_dir().join("02_response"));
}

#[test]
fn test_routes() {
    run_fixtures_in_dir(&fixtures_dir().join("03_route"));
}

#[test]
fn test_limits() {
    run_fixtures_in_dir(&fixtures_dir().join("04_limits"));
}
