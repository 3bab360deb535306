//! Output formatting: table, JSON, YAML, CSV, plain.
//!
//! Renders data in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde, CSV flattens through
//! caller-provided row shapes, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `csv`: serializes flattened rows from `to_csv_row`
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R, C>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    to_csv_row: impl Fn(&T) -> C,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
    C: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Csv => {
            let rows: Vec<C> = data.iter().map(to_csv_row).collect();
            render_csv(&rows)?
        }
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

/// Compact single-line JSON.
pub(crate) fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).expect("serialization should not fail")
}

/// YAML output.
pub(crate) fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}

/// CSV with a header row derived from the row struct's field names.
pub(crate) fn render_csv<C: serde::Serialize>(rows: &[C]) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| CliError::Csv(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CliError::Csv(e.to_string()))
}

// ── File output ──────────────────────────────────────────────────────

/// Write a dump to one or more files, choosing the format from each
/// path's extension (`.json` or `.csv`).
pub fn write_output_files<T, C>(
    paths: &[std::path::PathBuf],
    data: &[T],
    to_csv_row: impl Fn(&T) -> C,
) -> Result<(), CliError>
where
    T: serde::Serialize,
    C: serde::Serialize,
{
    for path in paths {
        let rendered = match extension_of(path) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => render_json_pretty(data),
            Some(ext) if ext.eq_ignore_ascii_case("csv") => {
                let rows: Vec<C> = data.iter().map(&to_csv_row).collect();
                render_csv(&rows)?
            }
            _ => {
                return Err(CliError::Validation {
                    field: "output-file".into(),
                    reason: format!(
                        "cannot infer format of {} (expected a .json or .csv extension)",
                        path.display()
                    ),
                });
            }
        };
        std::fs::write(path, rendered)?;
    }
    Ok(())
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}
