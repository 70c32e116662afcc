// tests/error_handling.rs

use anyhow::{anyhow, Context};

use assetdag::errors::{unwrap_all_errors, AssetdagError};

#[test]
fn no_error_flattens_to_nothing() {
    assert!(unwrap_all_errors(None).is_empty());
}

#[test]
fn single_error_is_one_message() {
    let err = anyhow!("single error");
    assert_eq!(unwrap_all_errors(Some(&err)), vec!["single error"]);
}

#[test]
fn nested_errors_are_listed_outermost_first() {
    let inner: anyhow::Result<()> = Err(anyhow!("inner error"));
    let err = inner
        .with_context(|| format!("{} error", "middle"))
        .context("outer error")
        .unwrap_err();

    assert_eq!(
        unwrap_all_errors(Some(&err)),
        vec!["outer error", "middle error", "inner error"]
    );
}

#[test]
fn io_errors_keep_their_cause_in_the_chain() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "pipeline.toml missing");
    let err = anyhow::Error::new(AssetdagError::from(io)).context("loading pipeline");

    assert_eq!(
        unwrap_all_errors(Some(&err)),
        vec![
            "loading pipeline",
            "IO error: pipeline.toml missing",
            "pipeline.toml missing",
        ]
    );
}

#[test]
fn error_variants_render_readably() {
    assert_eq!(
        AssetdagError::ConfigError("bad workers".into()).to_string(),
        "Configuration error: bad workers"
    );
    assert_eq!(
        AssetdagError::AssetNotFound("mart".into()).to_string(),
        "Asset not found: mart"
    );
    assert_eq!(
        AssetdagError::from(anyhow!("plain")).to_string(),
        "plain"
    );
}
