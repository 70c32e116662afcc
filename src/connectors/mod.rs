// src/connectors/mod.rs

//! Connection descriptors for ingestion connectors.
//!
//! A connector only knows how to describe its connection as a URI; the task
//! runner that performs the ingestion consumes it.

pub mod notion;

pub use notion::NotionConfig;

/// Something that can be turned into an ingestion source/destination URI.
pub trait IngestrConnection {
    fn ingestr_uri(&self) -> String;
}
