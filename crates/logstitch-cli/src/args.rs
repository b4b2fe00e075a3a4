use crate::types::{LogLevel, TiePolicyName};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logstitch")]
#[command(about = "Export controller event logs to CSV without gaps or duplicates", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, env = "LOGSTITCH_CONFIG", global = true)]
    pub config: Option<String>,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export event logs between two timestamps, newest first
    Export(ExportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[arg(short = 'c', long, help = "FQDN or IP address of the controller")]
    pub controller: Option<String>,

    #[arg(short = 'u', long, help = "API username [default: admin]")]
    pub user: Option<String>,

    #[arg(
        short = 'p',
        long,
        env = "LOGSTITCH_PASSWORD",
        hide_env_values = true,
        help = "API password"
    )]
    pub password: Option<String>,

    #[arg(short = 't', long, help = "Tenant [default: admin]")]
    pub tenant: Option<String>,

    #[arg(
        short = 'x',
        long,
        visible_alias = "apiversion",
        help = "API version (discovered from the controller if omitted)"
    )]
    pub api_version: Option<String>,

    #[arg(
        short = 'f',
        long,
        visible_alias = "filename",
        help = "Output CSV file (output is discarded if omitted)"
    )]
    pub output: Option<PathBuf>,

    #[arg(long = "filter", visible_alias = "filterstring", help = "Filter string, may be repeated")]
    pub filters: Vec<String>,

    #[arg(long = "field", help = "Field to export as a CSV column, may be repeated")]
    pub fields: Vec<String>,

    #[arg(long, help = "Records per request (1-10000) [default: 10000]")]
    pub page_size: Option<usize>,

    #[arg(long, help = "Handling of pages that sit on a single timestamp [default: stop]")]
    pub tie_policy: Option<TiePolicyName>,

    #[arg(long, help = "Accept self-signed controller certificates")]
    pub insecure: bool,

    #[arg(help = "Start of the export window, ISO-8601 (e.g. 2024-01-01T00:00)")]
    pub start: String,

    #[arg(help = "End of the export window, ISO-8601 (e.g. 2024-01-02T00:00)")]
    pub end: String,
}
