//! Render helpers shared by the command handlers.
//!
//! `--output` picks between a tabled view, serde-backed JSON/YAML, and a
//! one-identifier-per-line plain mode. CSV never goes through these
//! dispatchers: each handler owns its column layout and only falls back
//! to plain identifiers here when it has none.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Serialize `data` for the structured formats, or `None` when the
/// format needs a hand-built layout (table, csv, plain).
fn structured<T: serde::Serialize + ?Sized>(format: &OutputFormat, data: &T) -> Option<String> {
    match format {
        OutputFormat::Json => Some(render_json_pretty(data)),
        OutputFormat::JsonCompact => Some(render_json_compact(data)),
        OutputFormat::Yaml => Some(render_yaml(data)),
        OutputFormat::Table | OutputFormat::Csv | OutputFormat::Plain => None,
    }
}

/// Render a slice of items: a rounded table via `row`, a structured
/// dump of the original data, or `ident` per item for plain output.
pub fn render_list<T, R>(
    format: &OutputFormat,
    items: &[T],
    row: impl Fn(&T) -> R,
    ident: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    if let Some(out) = structured(format, items) {
        return out;
    }
    match format {
        OutputFormat::Table => Table::new(items.iter().map(row))
            .with(Style::rounded())
            .to_string(),
        _ => items.iter().map(&ident).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one item: `detail` builds the human view, `ident` the plain
/// one, and the structured formats serialize the item itself.
pub fn render_single<T: serde::Serialize>(
    format: &OutputFormat,
    item: &T,
    detail: impl Fn(&T) -> String,
    ident: impl Fn(&T) -> String,
) -> String {
    if let Some(out) = structured(format, item) {
        return out;
    }
    match format {
        OutputFormat::Table => detail(item),
        _ => ident(item),
    }
}

/// Write to stdout unless `--quiet` suppressed it.
pub fn print_output(rendered: &str, quiet: bool) {
    if !quiet && !rendered.is_empty() {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{rendered}");
    }
}

// Serialization of the domain types cannot fail; an empty string beats
// aborting the whole command over a rendering problem.

pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_default()
}

pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).unwrap_or_default()
}

pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_default()
}

/// Whether ANSI color should be used for table output.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
    }
}
