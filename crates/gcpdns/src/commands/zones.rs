//! Zone command handlers.

use std::fs::File;

use serde::Serialize;
use tabled::Tabled;

use gcpdns_core::dump::ZoneDump;
use gcpdns_core::{DnsGateway, DnsService, Effect, OnExisting, Reconciler};

use crate::cli::{GlobalOpts, ZoneArgs, ZoneCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table & CSV rows ────────────────────────────────────────────────

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "DNS name")]
    dns_name: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ZoneDump> for ZoneRow {
    fn from(z: &ZoneDump) -> Self {
        Self {
            dns_name: z.dns_name.clone(),
            name: z.name.clone(),
            created: z.created.map(|t| t.to_rfc3339()).unwrap_or_default(),
            description: z.description.clone().unwrap_or_default(),
        }
    }
}

/// Flattened shape for CSV output: list fields joined with `|`.
#[derive(Serialize)]
struct ZoneCsvRow {
    dns_name: String,
    name: String,
    created: String,
    description: String,
    name_servers: String,
    zone_records: String,
}

impl From<&ZoneDump> for ZoneCsvRow {
    fn from(z: &ZoneDump) -> Self {
        Self {
            dns_name: z.dns_name.clone(),
            name: z.name.clone(),
            created: z.created.map(|t| t.to_rfc3339()).unwrap_or_default(),
            description: z.description.clone().unwrap_or_default(),
            name_servers: z.name_servers.join("|"),
            zone_records: z
                .zone_records
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    gateway: &dyn DnsGateway,
    args: ZoneArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ZoneCommand::Create {
            dns_name,
            gcp_name,
            description,
        } => {
            let mut service = DnsService::new(gateway);
            service
                .create_zone(
                    &dns_name,
                    gcp_name.as_deref(),
                    description.as_deref(),
                    OnExisting::Error,
                )
                .await?;
            if !global.quiet {
                eprintln!("Zone created");
            }
            Ok(())
        }

        ZoneCommand::Delete { name } => {
            if !util::confirm(
                &format!("Delete zone {name} and all of its record sets?"),
                global.yes,
            )? {
                return Ok(());
            }
            let mut service = DnsService::new(gateway);
            let effect = service.delete_zone(&name).await?;
            if !global.quiet {
                match effect {
                    Effect::SkippedAbsent => eprintln!("Zone not found, nothing to delete"),
                    _ => eprintln!("Zone deleted"),
                }
            }
            Ok(())
        }

        ZoneCommand::Dump {
            output_files,
            records,
        } => {
            let mut service = DnsService::new(gateway);
            let zones = service.dump_zones(records).await?;

            if output_files.is_empty() {
                let out = output::render_list(
                    &global.output,
                    &zones,
                    |z| ZoneRow::from(z),
                    |z| ZoneCsvRow::from(z),
                    |z| z.dns_name.clone(),
                )?;
                output::print_output(&out, global.quiet);
            } else {
                output::write_output_files(&output_files, &zones, |z| ZoneCsvRow::from(z))?;
            }
            Ok(())
        }

        ZoneCommand::Update { csv_path, batch } => {
            let file = File::open(&csv_path)?;
            let mut reconciler = Reconciler::new(gateway, util::apply_options(&batch));
            let report = reconciler.apply_zones_csv(file).await?;
            util::report_and_finish(&report, global)
        }
    }
}
