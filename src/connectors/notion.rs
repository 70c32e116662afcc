// src/connectors/notion.rs

use serde::Deserialize;

use super::IngestrConnection;

/// Connection settings for a Notion workspace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotionConfig {
    pub api_key: String,
}

impl IngestrConnection for NotionConfig {
    fn ingestr_uri(&self) -> String {
        format!("notion://?api_key={}", self.api_key)
    }
}
