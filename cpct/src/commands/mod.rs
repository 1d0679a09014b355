//! Subcommand implementations for the `cpct` driver.

pub mod build;

pub use build::{run_build, BuildArgs};
