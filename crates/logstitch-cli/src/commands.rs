use super::args::{Cli, Commands};
use super::handlers;
use crate::config::{Config, resolve_config_path};
use crate::types::LogLevel;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.log_level);

    let config_path = resolve_config_path(cli.config.as_deref())?;
    let config = Config::load_from(&config_path)?;

    match cli.command {
        Commands::Export(args) => handlers::export::handle(&config, args),
    }
}

/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: LogLevel) {
    let env = env_logger::Env::default().default_filter_or(level.to_string());
    // A logger may already be installed when running inside tests.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
