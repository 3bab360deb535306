//! Configuration command handlers (no API connection required).

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(
                &gcpdns_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = gcpdns_config::load_config_or_default();
            let rendered = toml::to_string_pretty(&cfg)
                .map_err(|e| CliError::Internal(format!("failed to render config: {e}")))?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
