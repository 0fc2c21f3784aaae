//! CLI command handler: hash DIR and write its manifest unless one already exists.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::progress::{create_counter, finish_bar, progress_callback, refresh_bar};
use crate::manifest::{ManifestOutcome, create_manifest};
use crate::utils::{apply_file_to_opts, load_dirsum_toml, setup_logging};

/// Overwrite opts field from a CLI flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field {
            $opts.$opts_field = v;
        }
    };
}

/// Build opts: defaults, then `.dirsum.toml` in DIR, then CLI flags.
pub fn setup_opts(cli: &Cli) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = load_dirsum_toml(&cli.dir) {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(ref name) = cli.manifest {
        opts.manifest_name = Some(name.clone());
    }
    if cli.threads.is_some() {
        opts.num_threads = cli.threads;
    }
    apply_cli_opt!(cli, opts, follow_links => follow_links);
    apply_cli_opt!(cli, opts, parallel_walk => use_parallel_walk);
    apply_cli_opt!(cli, opts, verbose => verbose);
    apply_cli_opt!(cli, opts, quiet => quiet);
    opts
}

/// Install a Ctrl+C handler that raises `flag`.
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;
    Ok(flag)
}

/// Run the CLI: refuse if the manifest exists, otherwise hash and write it.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let mut opts = setup_opts(cli);
    setup_logging(opts.verbose);
    opts.interrupt = Some(install_interrupt_handler()?);
    debug!("{} CONFIG: {:#?}", env!("CARGO_PKG_NAME").to_uppercase(), opts);

    let bar = opts.verbose.then(|| {
        let b = create_counter("Hashing");
        refresh_bar(&b);
        b
    });
    let outcome = create_manifest(&cli.dir, &opts, progress_callback(&bar));
    if let Some(ref b) = bar {
        finish_bar(b);
    }

    match outcome? {
        ManifestOutcome::AlreadyProcessed(path) => {
            info!(
                "{} exists. This directory already processed. Exiting.",
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            );
        }
        ManifestOutcome::Written {
            path,
            entries,
            contents,
        } => {
            if !opts.quiet {
                let mut stdout = std::io::stdout().lock();
                // Banner is the first line; only the entries are echoed.
                for line in contents.lines().skip(1) {
                    writeln!(stdout, "{line}").context("write to stdout")?;
                }
            }
            info!("Wrote {} entries to {}", entries, path.display());
        }
    }
    Ok(())
}
