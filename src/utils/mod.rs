pub mod config;
pub mod dirsum_toml;
pub mod fd_limit;
pub mod logger;
pub mod tempfiles;

pub use config::*;
pub use dirsum_toml::{DirsumToml, apply_file_to_opts, load_dirsum_toml, parse_dirsum_toml};
pub use fd_limit::{FDS_PER_WORKER, max_open_fds, max_workers_by_fd_limit};
pub use logger::setup_logging;
pub use tempfiles::{rename_temp_to_final, temp_path_for, write_temp};
