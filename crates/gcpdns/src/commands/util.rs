//! Shared helpers for command handlers.

use owo_colors::OwoColorize;
use tabled::Tabled;

use gcpdns_core::{ApplyOptions, BatchReport, OnExisting, RowStatus};

use crate::cli::{BatchOpts, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Translate batch flags into reconciler options.
pub fn apply_options(batch: &BatchOpts) -> ApplyOptions {
    ApplyOptions {
        ignore_errors: batch.ignore_errors,
        on_existing: if batch.replace {
            OnExisting::Replace
        } else if batch.skip_existing {
            OnExisting::Skip
        } else {
            OnExisting::Error
        },
    }
}

// ── Batch report rendering ──────────────────────────────────────────

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Line")]
    line: u64,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn status_label(status: RowStatus) -> &'static str {
    match status {
        RowStatus::Applied => "applied",
        RowStatus::Skipped => "skipped",
        RowStatus::Failed => "FAILED",
    }
}

/// Print the per-row report and summary, then turn a failed batch into
/// a non-zero exit.
pub fn report_and_finish(report: &BatchReport, global: &GlobalOpts) -> Result<(), CliError> {
    let rendered = match global.output {
        OutputFormat::Json => output::render_json_pretty(report),
        OutputFormat::JsonCompact => output::render_json_compact(report),
        OutputFormat::Yaml => output::render_yaml(report),
        _ => {
            let rows: Vec<ReportRow> = report
                .outcomes
                .iter()
                .map(|o| ReportRow {
                    line: o.line,
                    action: o.action.clone(),
                    key: o.key.clone(),
                    status: status_label(o.status).to_owned(),
                    detail: o.detail.clone().unwrap_or_default(),
                })
                .collect();
            tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string()
        }
    };
    output::print_output(&rendered, global.quiet);

    let total = report.outcomes.len();
    let failed = report.failed_count();
    if !global.quiet {
        let color = output::should_color(&global.color);
        if report.is_success() {
            let summary = format!("{total} row(s) processed");
            if color {
                eprintln!("{}", summary.green());
            } else {
                eprintln!("{summary}");
            }
        } else {
            let mut summary = format!("{failed} of {total} attempted row(s) failed");
            if report.aborted {
                summary.push_str(" (run aborted; use --ignore-errors to attempt all rows)");
            }
            if color {
                eprintln!("{}", summary.red());
            } else {
                eprintln!("{summary}");
            }
        }
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::BatchFailed { failed, total })
    }
}
