// src/pipeline/model.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::pipeline::graph::{AssetGraph, NameGraph};

/// The closed set of asset kinds the runner knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    BigQuerySql,
    SnowflakeSql,
    PostgresSql,
    RedshiftSql,
    MsSql,
    DatabricksSql,
    AthenaSql,
    Python,
    Shell,
    Ingestr,
    Empty,
}

impl AssetType {
    pub const ALL: [AssetType; 11] = [
        AssetType::BigQuerySql,
        AssetType::SnowflakeSql,
        AssetType::PostgresSql,
        AssetType::RedshiftSql,
        AssetType::MsSql,
        AssetType::DatabricksSql,
        AssetType::AthenaSql,
        AssetType::Python,
        AssetType::Shell,
        AssetType::Ingestr,
        AssetType::Empty,
    ];

    /// Name as written in pipeline definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::BigQuerySql => "bq.sql",
            AssetType::SnowflakeSql => "sf.sql",
            AssetType::PostgresSql => "pg.sql",
            AssetType::RedshiftSql => "rs.sql",
            AssetType::MsSql => "ms.sql",
            AssetType::DatabricksSql => "databricks.sql",
            AssetType::AthenaSql => "athena.sql",
            AssetType::Python => "python",
            AssetType::Shell => "shell",
            AssetType::Ingestr => "ingestr",
            AssetType::Empty => "empty",
        }
    }

    /// Whether assets of this type are backed by a file on disk.
    pub fn requires_executable(&self) -> bool {
        !matches!(self, AssetType::Ingestr | AssetType::Empty)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unsupported asset type: {s:?}"))
    }
}

/// A Slack channel to notify about run results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlackNotification {
    #[serde(default)]
    pub channel: String,

    /// Incoming-webhook identifier; the default workspace connection is used
    /// when absent.
    #[serde(default)]
    pub webhook: Option<String>,

    #[serde(default = "default_true")]
    pub success: bool,

    #[serde(default = "default_true")]
    pub failure: bool,
}

impl SlackNotification {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            webhook: None,
            success: true,
            failure: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `[notifications]` section of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Notifications {
    #[serde(default)]
    pub slack: Vec<SlackNotification>,
}

/// A single unit of work.
///
/// Everything is kept as written, even when invalid, so that the lint rules
/// can report on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub name: String,

    /// Raw type string, see [`AssetType`].
    #[serde(rename = "type", default)]
    pub asset_type: String,

    /// Names of the assets that must finish before this one starts.
    #[serde(rename = "depends", default)]
    pub upstreams: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Script or query file backing this asset.
    #[serde(rename = "run", default)]
    pub executable_file: Option<PathBuf>,

    /// Type-specific settings, e.g. `database` and `s3_file_path` for Athena.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,

    #[serde(default)]
    pub schedule: Option<String>,

    #[serde(default)]
    pub slack: Option<SlackNotification>,

    #[serde(default)]
    pub start_date: Option<String>,
}

impl Asset {
    pub fn new(name: impl Into<String>, asset_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            asset_type: asset_type.into(),
            upstreams: Vec::new(),
            tags: Vec::new(),
            executable_file: None,
            parameters: BTreeMap::new(),
            schedule: None,
            slack: None,
            start_date: None,
        }
    }

    /// Parsed type, or `None` if the raw string is not a supported kind.
    pub fn kind(&self) -> Option<AssetType> {
        self.asset_type.parse().ok()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

/// Pipeline definition exactly as deserialized from TOML.
///
/// ```toml
/// name = "analytics"
/// schedule = "0 3 * * *"
/// start_date = "2024-01-01"
///
/// [[notifications.slack]]
/// channel = "#data-alerts"
///
/// [[asset]]
/// name = "raw.events"
/// type = "python"
/// run = "assets/events.py"
/// tags = ["raw"]
///
/// [[asset]]
/// name = "mart.daily_events"
/// type = "bq.sql"
/// run = "assets/daily_events.sql"
/// depends = ["raw.events"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPipeline {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub schedule: Option<String>,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub notifications: Notifications,

    #[serde(rename = "asset", default)]
    pub assets: Vec<Asset>,
}

/// A loaded pipeline plus its dependency graph.
///
/// The asset list is fixed at construction time; the graph is derived from it
/// once and never changes afterwards.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub name: String,
    pub schedule: Option<String>,
    pub start_date: Option<String>,
    pub notifications: Notifications,
    /// Where the definition was read from, if it came from disk.
    pub definition_path: Option<PathBuf>,
    assets: Vec<Asset>,
    graph: AssetGraph,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, assets: Vec<Asset>) -> Self {
        let graph = AssetGraph::from_assets(&assets);
        Self {
            name: name.into(),
            schedule: None,
            start_date: None,
            notifications: Notifications::default(),
            definition_path: None,
            assets,
            graph,
        }
    }

    pub fn with_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.schedule = Some(schedule.into());
        self
    }

    pub fn with_start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn with_slack(mut self, slack: SlackNotification) -> Self {
        self.notifications.slack.push(slack);
        self
    }

    pub fn with_definition_path(mut self, path: impl AsRef<Path>) -> Self {
        self.definition_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Assets in definition order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn graph(&self) -> &AssetGraph {
        &self.graph
    }

    /// Graph over distinct names, for checks that must see every asset even
    /// when names repeat.
    pub fn name_graph(&self) -> NameGraph {
        NameGraph::from_assets(&self.assets)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.graph.index_of(name).is_some()
    }

    pub fn asset_index(&self, name: &str) -> Option<usize> {
        self.graph.index_of(name)
    }

    /// First asset with the given name.
    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.asset_index(name).map(|i| &self.assets[i])
    }

    /// Direct upstreams that exist in this pipeline.
    pub fn upstreams_of(&self, name: &str) -> Vec<&Asset> {
        self.resolve(name, AssetGraph::upstream_indices)
    }

    /// Direct downstreams (assets that list `name` in their upstreams).
    pub fn downstreams_of(&self, name: &str) -> Vec<&Asset> {
        self.resolve(name, AssetGraph::downstream_indices)
    }

    /// Every asset `name` transitively depends on.
    pub fn ancestors_of(&self, name: &str) -> Vec<&Asset> {
        self.resolve(name, AssetGraph::ancestor_indices)
    }

    /// Every asset that transitively depends on `name`.
    pub fn descendants_of(&self, name: &str) -> Vec<&Asset> {
        self.resolve(name, AssetGraph::descendant_indices)
    }

    /// Assets carrying `tag`, each listed once.
    pub fn assets_by_tag(&self, tag: &str) -> Vec<&Asset> {
        self.assets.iter().filter(|a| a.has_tag(tag)).collect()
    }

    fn resolve(&self, name: &str, query: fn(&AssetGraph, usize) -> Vec<usize>) -> Vec<&Asset> {
        match self.asset_index(name) {
            Some(idx) => query(&self.graph, idx)
                .into_iter()
                .map(|i| &self.assets[i])
                .collect(),
            None => Vec::new(),
        }
    }
}

impl From<RawPipeline> for Pipeline {
    fn from(raw: RawPipeline) -> Self {
        let mut pipeline = Pipeline::new(raw.name, raw.assets);
        pipeline.schedule = raw.schedule;
        pipeline.start_date = raw.start_date;
        pipeline.notifications = raw.notifications;
        pipeline
    }
}
