//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod config_cmd;
pub mod records;
pub mod util;
pub mod zones;

use gcpdns_core::DnsGateway;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a gateway-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    gateway: &dyn DnsGateway,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Zone(args) => zones::handle(gateway, args, global).await,
        Command::Record(args) => records::handle(gateway, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
