//! Clap derive structures for the `gcpdns` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gcpdns -- manage zones and resource record sets on Google Cloud DNS
#[derive(Debug, Parser)]
#[command(
    name = "gcpdns",
    version,
    about = "Manage Google Cloud DNS zones and record sets from the command line",
    long_about = "A CLI for managing zones and resource record sets on Google Cloud DNS.\n\n\
        Authenticates with a service-account key file and supports bulk\n\
        zone/record synchronization from CSV tables.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Service-account key file (overrides profile)
    #[arg(long, short = 'C', env = "GCPDNS_CREDENTIALS", global = true)]
    pub credentials: Option<PathBuf>,

    /// Configuration profile to use
    #[arg(long, short = 'p', env = "GCPDNS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Project id (overrides the key file's project)
    #[arg(long, env = "GCPDNS_PROJECT", global = true)]
    pub project: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GCPDNS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "GCPDNS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// CSV with a header row
    Csv,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage DNS zones
    #[command(alias = "zones", alias = "z")]
    Zone(ZoneArgs),

    /// Manage DNS resource record sets
    #[command(alias = "records", alias = "r")]
    Record(RecordArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ZONES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ZoneArgs {
    #[command(subcommand)]
    pub command: ZoneCommand,
}

#[derive(Debug, Subcommand)]
pub enum ZoneCommand {
    /// Create a DNS zone
    Create {
        /// The zone's DNS name (e.g. "example.com")
        dns_name: String,

        /// The zone's name in GCP (defaults to the DNS name with dashes)
        #[arg(long)]
        gcp_name: Option<String>,

        /// A description of the zone
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a DNS zone and all its resource records
    Delete {
        /// Zone name or DNS name
        name: String,
    },

    /// Dump a list of DNS zones
    Dump {
        /// One or more output file paths ending in .csv or .json
        /// (suppresses screen output)
        #[arg(long = "output-file", short = 'O')]
        output_files: Vec<PathBuf>,

        /// Include each zone's record names and types
        #[arg(long, short = 'r')]
        records: bool,
    },

    /// Create, replace, and delete zones using a CSV file
    Update {
        /// CSV file with columns: action, dns_name, gcp_name, description
        csv_path: PathBuf,

        #[command(flatten)]
        batch: BatchOpts,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RECORDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Create a resource record set (data fields separated by |)
    Create {
        /// Fully-qualified domain name
        name: String,

        /// DNS record type (A, AAAA, CNAME, TXT, MX, ...)
        record_type: String,

        /// Record data, multiple values separated by |
        data: String,

        /// DNS time to live (in seconds)
        #[arg(long, short = 't', default_value = "300", value_name = "seconds")]
        ttl: u32,

        /// Replace any conflicting resource record set
        #[arg(long, short = 'r')]
        replace: bool,
    },

    /// Delete a resource record set
    Delete {
        /// Fully-qualified domain name
        name: String,

        /// DNS record type
        record_type: String,
    },

    /// Dump a list of DNS resource records for a zone
    Dump {
        /// Zone name or DNS name
        zone: String,

        /// One or more output file paths ending in .csv or .json
        /// (suppresses screen output)
        #[arg(long = "output-file", short = 'O')]
        output_files: Vec<PathBuf>,
    },

    /// Create, replace, and delete record sets using a CSV file
    Update {
        /// CSV file with columns: action, name, record_type, ttl, data
        csv_path: PathBuf,

        #[command(flatten)]
        batch: BatchOpts,
    },
}

// ── Shared Batch Arguments ───────────────────────────────────────────

/// Flags shared by the CSV batch commands.
#[derive(Debug, Args)]
pub struct BatchOpts {
    /// Continue processing rows when errors occur
    #[arg(long)]
    pub ignore_errors: bool,

    /// Replace entities that already exist instead of failing
    #[arg(long, conflicts_with = "skip_existing")]
    pub replace: bool,

    /// Skip create rows whose entity already exists instead of failing
    #[arg(long)]
    pub skip_existing: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration file path
    Path,

    /// Show the resolved configuration
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
