//! Command Line Interface (CLI) layer for stackexec.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`): resolve the project work
//! directory from the template, optionally prepare it, then submit and
//! reconcile through `stackexec::api`.
//!
//! If you are embedding stackexec into another application, prefer using
//! the high-level `stackexec::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
