//! SmartFit Common - Shared utilities for SmartFit crates
//!
//! This crate provides the ambient plumbing shared by the client library
//! and the command-line front end:
//!
//! - **Initialization**: [`init_tracing`] for consistent logging setup
//! - **Output**: helpers for rendering results as pretty JSON or text
//!
//! # Example
//!
//! ```rust,ignore
//! use smartfit_common::{init_tracing, json_output};
//!
//! init_tracing("smartfit", 1)?;
//! println!("{}", json_output(&result)?);
//! ```

pub mod init;
pub mod output;

// Re-export commonly used items at crate root
pub use init::{init_tracing, verbosity_directive};
pub use output::{json_output, section, OutputFormat};
