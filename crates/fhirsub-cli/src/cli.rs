use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fhirsub")]
#[command(about = "Submit HLA typing records to a FHIR endpoint, or bundle them offline")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides config and FHIRSUB_URL env var)
    #[arg(short, long, global = true, env = "FHIRSUB_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "FHIRSUB_PROFILE", default_value = "default")]
    pub profile: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit subject trees to the configured endpoint
    Submit(SubmitArgs),
    /// Assemble self-contained collection bundles (no network)
    Bundle(BundleArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct SubmitArgs {
    /// Path to a JSON file with subjects (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
    /// Width of the per-specimen observation worker pool
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[derive(clap::Args)]
pub struct BundleArgs {
    /// Path to a JSON file with subjects (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
    /// Write the bundles to this path instead of stdout
    #[arg(long)]
    pub out: Option<String>,
    /// Drop empty placeholder entries instead of emitting them
    #[arg(long)]
    pub skip_empty: bool,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server)
    pub key: String,
    /// Value
    pub value: String,
}
