use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Hash every file under a directory and write a sorted digest manifest.
#[derive(Clone, Debug, Parser)]
#[command(name = "dirsum", version)]
#[command(about = "Hash every file under DIR and write the sorted list to DIR/.md5list.")]
pub struct Cli {
    /// Directory to process. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Manifest file name inside DIR. Default: `.md5list`.
    #[arg(long = "manifest", short = 'o', value_name = "NAME")]
    pub manifest: Option<String>,

    /// Number of digest worker threads. Default: available cores, capped by the FD limit.
    #[arg(long, short = 'j', value_name = "N", value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Walk directories in parallel (jwalk). Output order is unaffected.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub parallel_walk: Option<bool>,

    /// Verbose output: debug logs and a progress counter.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Do not print manifest lines to stdout.
    #[arg(long, short = 'q', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub quiet: Option<bool>,
}
