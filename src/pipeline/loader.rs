// src/pipeline/loader.rs

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pipeline::model::{Pipeline, RawPipeline};

/// Load a pipeline definition through the given filesystem.
///
/// This only performs TOML deserialization and path resolution; it does
/// **not** validate the pipeline. Structural problems (cycles, unknown
/// dependencies, bad schedules...) are left for the lint rules to report.
///
/// Relative `run` paths are resolved against the definition's directory.
pub fn load_pipeline(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Pipeline> {
    let path = path.as_ref();
    let contents = fs
        .read_to_string(path)
        .with_context(|| format!("loading pipeline definition {:?}", path))?;

    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let pipeline = parse_pipeline(&contents, &base_dir)?.with_definition_path(path);

    debug!(
        pipeline = %pipeline.name,
        assets = pipeline.assets().len(),
        "loaded pipeline definition"
    );

    Ok(pipeline)
}

/// Parse a pipeline definition from TOML text.
pub fn parse_pipeline(contents: &str, base_dir: &Path) -> Result<Pipeline> {
    let mut raw: RawPipeline = toml::from_str(contents)?;

    for asset in raw.assets.iter_mut() {
        if let Some(file) = asset.executable_file.take() {
            asset.executable_file = Some(resolve(base_dir, file));
        }
    }

    Ok(Pipeline::from(raw))
}

fn resolve(base_dir: &Path, file: PathBuf) -> PathBuf {
    if file.is_absolute() || base_dir.as_os_str().is_empty() {
        file
    } else {
        base_dir.join(file)
    }
}

/// Definition file used when no path is given on the command line.
pub const DEFAULT_DEFINITION_FILE: &str = "pipeline.toml";
