//! Load `.dirsum.toml` from the target directory (CLI only). The lib takes [`DigestOpts`](crate::DigestOpts) directly.

use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct DirsumToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    manifest: Option<String>,
    threads: Option<usize>,
    follow_links: Option<bool>,
    parallel_walk: Option<bool>,
    verbose: Option<bool>,
    quiet: Option<bool>,
}

/// Load `.dirsum.toml` from `dir` if present. Returns None if the file is missing, unreadable,
/// or does not parse (the parse error is logged).
pub fn load_dirsum_toml(dir: &Path) -> Option<DirsumToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_dirsum_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub fn parse_dirsum_toml(s: &str) -> Result<DirsumToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &DirsumToml, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(ref name) = sec.manifest {
        opts.manifest_name = Some(name.clone());
    }
    if let Some(n) = sec.threads {
        opts.num_threads = Some(n);
    }
    apply_file_opt!(sec, opts, follow_links => follow_links);
    apply_file_opt!(sec, opts, parallel_walk => use_parallel_walk);
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, quiet => quiet);
}
