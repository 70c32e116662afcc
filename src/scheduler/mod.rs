// src/scheduler/mod.rs

//! Run-state overlay and scheduling decisions.
//!
//! - [`core`] owns the per-asset [`TaskState`]s and decides what runs next.
//! - [`state_manager`] applies the individual state transitions.
//! - [`tags`] narrows the runnable set by tag before execution.
//! - [`task_info`] holds the state enum and per-asset bookkeeping.

pub mod core;
pub mod state_manager;
pub mod tags;
pub mod task_info;

pub use self::core::Scheduler;
pub use tags::{assets_with_any_tag, exclude_assets_by_tag, include_assets_by_tags};
pub use task_info::{ScheduledAsset, TaskState};
