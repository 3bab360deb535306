mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gcpdns_api::{DnsClient, ServiceAccountKey, TransportConfig};
use gcpdns_core::CloudGateway;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need credentials
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "gcpdns", &mut std::io::stdout());
            Ok(())
        }

        // All other commands talk to the Cloud DNS API
        cmd => {
            let gateway = build_gateway(&cli.global)?;
            tracing::debug!(command = ?cmd, project = gateway.project(), "dispatching command");
            commands::dispatch(cmd, &gateway, &cli.global).await
        }
    }
}

/// Build the Cloud DNS gateway from CLI flags and the config profile.
fn build_gateway(global: &cli::GlobalOpts) -> Result<CloudGateway, CliError> {
    let cfg = gcpdns_config::load_config_or_default();
    let profile_name = global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());
    let profile = cfg.profiles.get(&profile_name);

    // Credential chain: --credentials flag (or GCPDNS_CREDENTIALS via
    // clap's env support), then the profile's entry.
    let credentials = match global.credentials {
        Some(ref path) => gcpdns_config::validate_credentials_path(path.clone())?,
        None => {
            let profile = profile.ok_or_else(|| CliError::NoCredentials {
                profile: profile_name.clone(),
                config_path: gcpdns_config::config_path().display().to_string(),
            })?;
            gcpdns_config::resolve_credentials(profile, &profile_name)?
        }
    };

    let key = ServiceAccountKey::from_file(&credentials)?;

    // Timeout precedence: flag/env, then profile, then config default.
    let timeout = global
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(cfg.defaults.timeout);
    let transport = TransportConfig {
        timeout: Duration::from_secs(timeout),
    };

    let project_override = global
        .project
        .clone()
        .or_else(|| profile.and_then(|p| p.project.clone()));

    let client = match project_override {
        Some(ref project) => {
            DnsClient::from_service_account_for_project(key, &transport, project)?
        }
        None => DnsClient::from_service_account(key, &transport)?,
    };

    Ok(CloudGateway::new(client))
}
