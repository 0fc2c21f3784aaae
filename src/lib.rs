//! dirsum: hash every regular file under a directory in parallel and produce a sorted manifest.
//!
//! The core is [`compute_tree_digests`]: one walk thread feeds a pool of digest workers, whose
//! results fan in to a collector on the calling thread. The first failure raises a shared
//! cancellation signal and is returned on its own; no partial map ever leaves the call.

pub mod engine;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::DigestError;
pub use types::*;

use log::debug;
use std::path::Path;

/// Result alias used by the manifest and CLI layers
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Digest every regular file reachable from `root` with default options.
///
/// Keys are paths relative to `root` with `/` separators. A missing or unreadable root is a
/// [`DigestError::Access`]; a file that cannot be read is a [`DigestError::Read`].
pub fn compute_tree_digests(root: &Path) -> std::result::Result<DigestMap, DigestError> {
    compute_tree_digests_with_opts(root, &DigestOpts::default(), None::<fn(usize)>)
}

/// Same as [`compute_tree_digests`] with explicit options.
///
/// `on_progress` is called with 1 for every file digested, on the calling thread. Keep it fast.
pub fn compute_tree_digests_with_opts<F>(
    root: &Path,
    opts: &DigestOpts,
    on_progress: Option<F>,
) -> std::result::Result<DigestMap, DigestError>
where
    F: FnMut(usize),
{
    debug!(
        "{} CONFIG: {:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    pipeline::compute_digests(root, opts, on_progress)
}
