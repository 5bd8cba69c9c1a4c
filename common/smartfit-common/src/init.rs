//! Tracing initialization
//!
//! Logs always go to stderr so that stdout stays clean for command output
//! (JSON consumers pipe it straight into other tools).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count to a filter directive for the given crate.
///
/// 0 → warn, 1 → info, 2 → debug, 3+ → trace.
pub fn verbosity_directive(crate_name: &str, verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("{}={}", crate_name, level)
}

/// Initialize tracing/logging
///
/// Sets up logging to stderr with:
/// - Environment-based filtering via RUST_LOG
/// - A per-crate level derived from the verbosity count
///
/// Set `LOG_FORMAT=json` for structured JSON output (useful for log
/// aggregation). Default is human-readable text output.
///
/// # Arguments
///
/// * `crate_name` - The crate whose level is raised (e.g., "smartfit")
/// * `verbose` - Number of `-v` flags given on the command line
pub fn init_tracing(crate_name: &str, verbose: u8) -> anyhow::Result<()> {
    let directive = verbosity_directive(crate_name, verbose);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}
