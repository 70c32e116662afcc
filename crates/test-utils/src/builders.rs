#![allow(dead_code)]

use std::path::PathBuf;

use assetdag::pipeline::{Asset, Pipeline, SlackNotification};

/// Builder for `Pipeline` to simplify test setup.
pub struct PipelineBuilder {
    name: String,
    schedule: Option<String>,
    start_date: Option<String>,
    slack: Vec<SlackNotification>,
    assets: Vec<Asset>,
}

impl PipelineBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            schedule: None,
            start_date: None,
            slack: Vec::new(),
            assets: Vec::new(),
        }
    }

    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn with_schedule(mut self, schedule: &str) -> Self {
        self.schedule = Some(schedule.to_string());
        self
    }

    pub fn with_start_date(mut self, date: &str) -> Self {
        self.start_date = Some(date.to_string());
        self
    }

    pub fn with_slack(mut self, slack: SlackNotification) -> Self {
        self.slack.push(slack);
        self
    }

    pub fn build(self) -> Pipeline {
        let mut pipeline = Pipeline::new(self.name, self.assets);
        pipeline.schedule = self.schedule;
        pipeline.start_date = self.start_date;
        pipeline.notifications.slack = self.slack;
        pipeline
    }
}

/// Builder for `Asset`.
pub struct AssetBuilder {
    asset: Asset,
}

impl AssetBuilder {
    pub fn new(name: &str, asset_type: &str) -> Self {
        Self {
            asset: Asset::new(name, asset_type),
        }
    }

    /// An `empty` asset: needs no executable file, always valid to run.
    pub fn empty(name: &str) -> Self {
        Self::new(name, "empty")
    }

    pub fn depends(mut self, upstream: &str) -> Self {
        self.asset.upstreams.push(upstream.to_string());
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.asset.tags.push(tag.to_string());
        self
    }

    pub fn run(mut self, path: &str) -> Self {
        self.asset.executable_file = Some(PathBuf::from(path));
        self
    }

    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.asset
            .parameters
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn schedule(mut self, schedule: &str) -> Self {
        self.asset.schedule = Some(schedule.to_string());
        self
    }

    pub fn start_date(mut self, date: &str) -> Self {
        self.asset.start_date = Some(date.to_string());
        self
    }

    pub fn slack(mut self, slack: SlackNotification) -> Self {
        self.asset.slack = Some(slack);
        self
    }

    pub fn build(self) -> Asset {
        self.asset
    }
}
