//! CLI module
//!
//! Argument definitions for the `smartfit` binary.

pub mod args;

pub use args::{Cli, Commands};
