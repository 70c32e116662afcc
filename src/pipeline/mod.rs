// src/pipeline/mod.rs

//! Pipeline data model and dependency graph.
//!
//! - [`model`] holds assets, notifications and the [`Pipeline`] container.
//! - [`graph`] is the index-based view used for traversal and cycle search.
//! - [`loader`] reads TOML definitions through the filesystem capability.

pub mod graph;
pub mod loader;
pub mod model;

pub use graph::{AssetGraph, NameGraph};
pub use loader::{load_pipeline, parse_pipeline, DEFAULT_DEFINITION_FILE};
pub use model::{Asset, AssetType, Notifications, Pipeline, RawPipeline, SlackNotification};
