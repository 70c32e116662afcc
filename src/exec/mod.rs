// src/exec/mod.rs

//! Asset execution layer.
//!
//! - [`backend`] defines the [`TaskRunner`] trait the runtime dispatches to.
//! - [`task_runner`] runs Python and shell assets as local processes.
//! - [`clean`] strips escape codes from process output for display.

pub mod backend;
pub mod clean;
pub mod task_runner;

pub use backend::TaskRunner;
pub use clean::clean;
pub use task_runner::CommandRunner;
