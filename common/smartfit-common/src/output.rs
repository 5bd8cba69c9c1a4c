//! Output helpers for command results
//!
//! Commands either print pretty JSON (machine consumers) or a plain-text
//! summary built from titled sections.

use serde::Serialize;

/// How a command should render its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Render any serializable value as pretty-printed JSON
///
/// This replaces the common pattern:
/// ```rust,ignore
/// let json = serde_json::to_string_pretty(&data)?;
/// println!("{}", json);
/// ```
pub fn json_output<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Render a titled block of `label: value` lines
///
/// Labels are padded to the widest one so values line up.
pub fn section(title: &str, rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut out = format!("{}\n", title);
    for (label, value) in rows {
        out.push_str(&format!("  {:<width$}  {}\n", label, value, width = width));
    }
    out
}
