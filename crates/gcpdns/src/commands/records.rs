//! Record set command handlers.

use std::fs::File;

use serde::Serialize;
use tabled::Tabled;

use gcpdns_core::dump::RecordDump;
use gcpdns_core::{DnsGateway, DnsService, Effect, OnExisting, Reconciler, RecordType};

use crate::cli::{GlobalOpts, RecordArgs, RecordCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn parse_record_type(raw: &str) -> Result<RecordType, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "record_type".into(),
        reason: format!("unsupported record type: {raw}"),
    })
}

// ── Table & CSV rows ────────────────────────────────────────────────

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "TTL")]
    ttl: u32,
    #[tabled(rename = "Data")]
    data: String,
}

impl From<&RecordDump> for RecordRow {
    fn from(r: &RecordDump) -> Self {
        Self {
            name: r.name.clone(),
            record_type: r.record_type.to_string(),
            ttl: r.ttl,
            data: r.data.join(" "),
        }
    }
}

/// Flattened shape for CSV output: data values joined with `|`.
#[derive(Serialize)]
struct RecordCsvRow {
    name: String,
    record_type: String,
    ttl: u32,
    data: String,
}

impl From<&RecordDump> for RecordCsvRow {
    fn from(r: &RecordDump) -> Self {
        Self {
            name: r.name.clone(),
            record_type: r.record_type.to_string(),
            ttl: r.ttl,
            data: r.data.join("|"),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    gateway: &dyn DnsGateway,
    args: RecordArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RecordCommand::Create {
            name,
            record_type,
            data,
            ttl,
            replace,
        } => {
            let record_type = parse_record_type(&record_type)?;
            let on_existing = if replace {
                OnExisting::Replace
            } else {
                OnExisting::Error
            };

            let mut service = DnsService::new(gateway);
            let effect = service
                .create_record_set(&name, record_type, ttl, &data, on_existing)
                .await?;
            if !global.quiet {
                match effect {
                    Effect::Replaced => eprintln!("Record set replaced"),
                    _ => eprintln!("Record set created"),
                }
            }
            Ok(())
        }

        RecordCommand::Delete { name, record_type } => {
            let record_type = parse_record_type(&record_type)?;
            if !util::confirm(
                &format!("Delete record set {name} {record_type}?"),
                global.yes,
            )? {
                return Ok(());
            }

            let mut service = DnsService::new(gateway);
            let effect = service.delete_record_set(&name, record_type).await?;
            if !global.quiet {
                match effect {
                    Effect::SkippedAbsent => eprintln!("Record set not found, nothing to delete"),
                    _ => eprintln!("Record set deleted"),
                }
            }
            Ok(())
        }

        RecordCommand::Dump { zone, output_files } => {
            let mut service = DnsService::new(gateway);
            let records = service.dump_records(&zone).await?;

            if output_files.is_empty() {
                let out = output::render_list(
                    &global.output,
                    &records,
                    |r| RecordRow::from(r),
                    |r| RecordCsvRow::from(r),
                    |r| format!("{} {}", r.name, r.record_type),
                )?;
                output::print_output(&out, global.quiet);
            } else {
                output::write_output_files(&output_files, &records, |r| RecordCsvRow::from(r))?;
            }
            Ok(())
        }

        RecordCommand::Update { csv_path, batch } => {
            let file = File::open(&csv_path)?;
            let mut reconciler = Reconciler::new(gateway, util::apply_options(&batch));
            let report = reconciler.apply_record_sets_csv(file).await?;
            util::report_and_finish(&report, global)
        }
    }
}
