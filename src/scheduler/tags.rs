// src/scheduler/tags.rs

//! Tag-based narrowing of the runnable set.
//!
//! Both functions mutate the scheduler and must run before execution starts.
//! They take `&mut Scheduler`, so callers sharing a scheduler across threads
//! have to hold their own lock around them.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::pipeline::{Asset, Pipeline};
use crate::scheduler::Scheduler;

/// Exclude assets carrying `exclude_tag` from the run.
///
/// - An empty tag does nothing and returns 0.
/// - An empty `subset` means every asset in `pipeline` is considered;
///   otherwise only the assets in `subset` are.
///
/// Returns the number of distinct assets moved from `Pending` to `Excluded`.
/// Repeated tags on one asset, or repeated assets in `subset`, count once;
/// assets that are already excluded are not counted again.
pub fn exclude_assets_by_tag(
    exclude_tag: &str,
    pipeline: &Pipeline,
    scheduler: &mut Scheduler,
    subset: &[&Asset],
) -> usize {
    if exclude_tag.is_empty() {
        return 0;
    }

    let considered: Vec<&Asset> = if subset.is_empty() {
        pipeline.assets().iter().collect()
    } else {
        subset.to_vec()
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut excluded = 0;

    for asset in considered {
        if !asset.has_tag(exclude_tag) || !seen.insert(asset.name.as_str()) {
            continue;
        }
        if scheduler.exclude(&asset.name) {
            excluded += 1;
        }
    }

    info!(tag = %exclude_tag, excluded, "excluded assets by tag");
    excluded
}

/// Keep only assets carrying at least one of `tags`; exclude the rest.
///
/// Returns the number of assets kept. An empty tag list does nothing and
/// returns 0.
pub fn include_assets_by_tags(
    tags: &[String],
    pipeline: &Pipeline,
    scheduler: &mut Scheduler,
) -> usize {
    if tags.is_empty() {
        return 0;
    }

    let mut kept = 0;
    for asset in pipeline.assets() {
        if tags.iter().any(|tag| asset.has_tag(tag)) {
            kept += 1;
        } else {
            scheduler.exclude(&asset.name);
        }
    }

    debug!(?tags, kept, "included assets by tag");
    kept
}

/// Assets carrying at least one of `tags`, in pipeline order.
pub fn assets_with_any_tag<'p>(tags: &[String], pipeline: &'p Pipeline) -> Vec<&'p Asset> {
    pipeline
        .assets()
        .iter()
        .filter(|asset| tags.iter().any(|tag| asset.has_tag(tag)))
        .collect()
}
