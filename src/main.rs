//! Mizan command line entry point

use anyhow::Context;

mod cli;

use cli::config::CliConfig;

fn main() -> anyhow::Result<()> {
    // Help, version and usage errors are printed and exited by clap.
    let config = CliConfig::load().unwrap_or_else(|error| error.exit());

    cli::logging::init_subscriber(&config.logging).context("initializing logging")?;

    cli::run_to_stdout(&config)
}
