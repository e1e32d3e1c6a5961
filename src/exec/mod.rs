// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] provides the `CommandRunner` trait (the subprocess facility
//!   used by the native daemon probe) and the tokio-backed
//!   `SystemCommandRunner`. Tests swap in a fake runner.
//! - [`build`] runs the project's build command through the platform shell
//!   and measures how long it took.

pub mod build;
pub mod runner;

pub use build::{run_build, BuildOutcome};
pub use runner::{CommandRunner, ProbeCommand, SystemCommandRunner};
