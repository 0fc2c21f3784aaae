//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    manifest_filename: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                manifest_filename: ".md5list",
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    /// Default manifest file name written inside the hashed root.
    pub fn manifest_filename(&self) -> &str {
        self.manifest_filename
    }

    /// Per-directory settings file read by the CLI.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Manifest ----

/// First line of every manifest.
pub const MANIFEST_BANNER: &str = "blake3 hash of directory contents v1.0";

// ---- Worker threads ----

/// Thread limits for the digest worker pool.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Floor: never run fewer workers than this.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }
}

// ---- Hashing ----

/// Hashing I/O thresholds and buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// File size above which hashing uses memory-mapped I/O (bytes). 100 MB.
    pub const HASH_MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;
    /// Chunk size for reading files below mmap threshold (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}

// ---- Channels ----

/// Capacity of the walk → worker path channel. The walk may block on a full channel; it
/// races that send against cancellation, so a small buffer only bounds memory.
pub const PATH_CHANNEL_CAP: usize = 4096;

/// Capacity of the worker → collector result channel. Zero: every delivery is a rendezvous
/// with the collector, so a slow collector throttles workers.
pub const RESULT_CHANNEL_CAP: usize = 0;
