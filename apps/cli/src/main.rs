//! agentsmd CLI: analyze a documentation folder, extract the metadata an
//! `AGENTS.md` index is built from, and validate generated indexes.

mod commands;

use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
