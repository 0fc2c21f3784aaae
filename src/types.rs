//! Public and internal types for the dirsum API and pipeline.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::DigestError;

/// BLAKE3 digest of a file's contents.
pub type Digest = [u8; 32];

/// Map of path → digest for every regular file under the root.
///
/// Keys are relative to the root with `/` separators (`sub/b.txt`). When the root is itself a
/// regular file, its key is the file name.
pub type DigestMap = HashMap<String, Digest>;

/// Produced once per discovered regular file by a digest worker; consumed once by the collector.
#[derive(Debug)]
pub struct FileResult {
    pub path: String,
    pub digest: Result<Digest, DigestError>,
}

/// Lib-only options for [`compute_tree_digests_with_opts`](crate::compute_tree_digests_with_opts).
#[derive(Clone, Debug, Default)]
pub struct DigestOpts {
    /// Override worker thread count. When None, uses rayon's thread count capped by the FD limit.
    pub num_threads: Option<usize>,
    /// Follow symbolic links.
    pub follow_links: bool,
    /// Walk with jwalk (parallel directory reads) instead of walkdir.
    pub use_parallel_walk: bool,
    /// When set to true by someone else (e.g. a Ctrl+C handler), the walk stops with
    /// [`DigestError::Interrupted`].
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl From<&Opts> for DigestOpts {
    fn from(o: &Opts) -> Self {
        DigestOpts {
            num_threads: o.num_threads,
            follow_links: o.follow_links,
            use_parallel_walk: o.use_parallel_walk,
            interrupt: o.interrupt.clone(),
        }
    }
}

/// Full options (CLI and manifest). Use [`DigestOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Manifest file name inside the root. When None, uses `.md5list`.
    pub manifest_name: Option<String>,
    /// Override worker thread count.
    pub num_threads: Option<usize>,
    /// Follow symbolic links.
    pub follow_links: bool,
    /// Walk with jwalk instead of walkdir.
    pub use_parallel_walk: bool,
    /// Show progress counter and debug logs.
    pub verbose: bool,
    /// Do not echo manifest lines to stdout.
    pub quiet: bool,
    /// Interrupt flag shared with the Ctrl+C handler.
    pub interrupt: Option<Arc<AtomicBool>>,
}
