// tests/pipeline_loader.rs

use std::error::Error;
use std::path::{Path, PathBuf};

use assetdag::errors::AssetdagError;
use assetdag::fs::mock::MockFileSystem;
use assetdag::fs::RealFileSystem;
use assetdag::pipeline::{load_pipeline, parse_pipeline};

type TestResult = Result<(), Box<dyn Error>>;

const DEFINITION: &str = r##"
name = "analytics"
schedule = "0 3 * * *"
start_date = "2024-01-01"

[[notifications.slack]]
channel = "#data-alerts"

[[asset]]
name = "raw.events"
type = "python"
run = "assets/events.py"
tags = ["raw", "hourly"]

[[asset]]
name = "mart.daily_events"
type = "athena.sql"
run = "/abs/daily_events.sql"
depends = ["raw.events"]

[asset.parameters]
database = "analytics"
s3_file_path = "s3://bucket/out"

[asset.slack]
channel = "#marts"
success = false
"##;

#[test]
fn parse_reads_every_section() -> TestResult {
    let p = parse_pipeline(DEFINITION, Path::new(""))?;

    assert_eq!(p.name, "analytics");
    assert_eq!(p.schedule.as_deref(), Some("0 3 * * *"));
    assert_eq!(p.start_date.as_deref(), Some("2024-01-01"));
    assert_eq!(p.notifications.slack.len(), 1);
    assert_eq!(p.notifications.slack[0].channel, "#data-alerts");
    assert!(p.notifications.slack[0].success);

    let assets = p.assets();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[0].tags, vec!["raw", "hourly"]);
    assert_eq!(assets[1].upstreams, vec!["raw.events"]);
    assert_eq!(assets[1].parameter("database"), Some("analytics"));

    let slack = assets[1].slack.as_ref().expect("asset slack block");
    assert_eq!(slack.channel, "#marts");
    assert!(!slack.success);
    assert!(slack.failure);

    // Without a base directory paths stay as written.
    assert_eq!(
        assets[0].executable_file.as_deref(),
        Some(Path::new("assets/events.py"))
    );
    Ok(())
}

#[test]
fn load_resolves_relative_run_paths_against_definition_dir() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("pipeline.toml");
    std::fs::write(&path, DEFINITION)?;

    let p = load_pipeline(&RealFileSystem, &path)?;

    assert_eq!(p.definition_path.as_deref(), Some(path.as_path()));
    assert_eq!(
        p.assets()[0].executable_file,
        Some(dir.path().join("assets/events.py"))
    );
    assert_eq!(
        p.assets()[1].executable_file,
        Some(PathBuf::from("/abs/daily_events.sql"))
    );
    Ok(())
}

#[test]
fn load_goes_through_the_given_filesystem() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("project/pipeline.toml", DEFINITION);

    let p = load_pipeline(&fs, "project/pipeline.toml")?;

    assert_eq!(p.name, "analytics");
    assert_eq!(
        p.assets()[0].executable_file,
        Some(PathBuf::from("project/assets/events.py"))
    );
    Ok(())
}

#[test]
fn missing_definition_is_a_system_error_with_context() {
    let fs = MockFileSystem::new();

    let err = load_pipeline(&fs, "nowhere.toml").unwrap_err();
    let inner = match err {
        AssetdagError::Other(inner) => inner,
        other => panic!("expected wrapped anyhow error, got {other:?}"),
    };

    let chain: Vec<String> = inner.chain().map(|c| c.to_string()).collect();
    assert!(chain[0].contains("loading pipeline definition"));
    assert!(chain.last().unwrap().contains("File not found"));
}

#[test]
fn malformed_toml_is_reported_as_toml_error() {
    let err = parse_pipeline("name = [unclosed", Path::new("")).unwrap_err();
    assert!(matches!(err, AssetdagError::TomlError(_)));
}

#[test]
fn structural_defects_do_not_fail_loading() -> TestResult {
    let p = parse_pipeline(
        r#"
        name = ""

        [[asset]]
        name = "a"
        type = "not-a-type"
        depends = ["a", "ghost"]
        "#,
        Path::new(""),
    )?;

    assert_eq!(p.assets().len(), 1);
    assert_eq!(p.assets()[0].kind(), None);
    Ok(())
}
