//! dirsum CLI: hash a directory tree and write its digest manifest.

use anyhow::Result;
use clap::Parser;
use dirsum::engine::arg_parser::Cli;
use dirsum::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
