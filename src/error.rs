//! Error type for the walk + digest pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`compute_tree_digests`](crate::compute_tree_digests).
///
/// Only [`Access`](DigestError::Access) and [`Read`](DigestError::Read) are real causes.
/// [`Canceled`](DigestError::Canceled) is what the walker reports when it is told to stop
/// because something else already failed; it never reaches the caller as the primary error.
#[derive(Debug, Error)]
pub enum DigestError {
    /// A directory could not be listed, or an entry could not be stat'ed.
    #[error("cannot access {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A regular file was selected for digesting but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("walk canceled")]
    Canceled,

    /// The caller's interrupt flag was set (Ctrl+C in the CLI).
    #[error("interrupted")]
    Interrupted,

    /// The walk thread exited without reporting its outcome.
    #[error("walk thread exited without reporting an outcome")]
    WalkerLost,

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

impl DigestError {
    /// True for the internal "walk canceled" sentinel.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Access { path, .. } | Self::Read { path, .. } => Some(path),
            _ => None,
        }
    }
}
