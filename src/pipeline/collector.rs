//! Collector: fan-in of worker results into the digest map.

use crossbeam_channel::Receiver;
use log::debug;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::{DigestError, DigestMap, FileResult};

use super::cancel::{CancelSource, interrupt_set};
use super::context::WalkResult;

/// Read results until the stream closes, then the walk outcome.
///
/// The first error result raises `cancel` and is returned at once; the partial map is dropped and
/// no further results are awaited. After a clean close the walk outcome decides: its error wins
/// over the map. A set `interrupt` flag, seen after any result or once the stream closes, raises
/// `cancel` and fails the run with [`DigestError::Interrupted`]. `on_result` is called with 1 for
/// every digest accepted.
pub fn collect_results<F>(
    result_rx: &Receiver<FileResult>,
    walk_rx: &Receiver<WalkResult>,
    cancel: &mut CancelSource,
    interrupt: &Option<Arc<AtomicBool>>,
    mut on_result: Option<F>,
) -> Result<DigestMap, DigestError>
where
    F: FnMut(usize),
{
    let mut digests = DigestMap::new();
    for result in result_rx.iter() {
        if interrupt_set(interrupt) {
            cancel.raise();
            return Err(DigestError::Interrupted);
        }
        match result.digest {
            Ok(digest) => {
                digests.insert(result.path, digest);
                if let Some(ref mut f) = on_result {
                    f(1);
                }
            }
            Err(err) => {
                cancel.raise();
                return Err(err);
            }
        }
    }

    // Workers stop early on interrupt, and the walker may still be blocked on a full path channel.
    if interrupt_set(interrupt) {
        cancel.raise();
        return Err(DigestError::Interrupted);
    }

    match walk_rx.recv() {
        Ok(Ok(dispatched)) => {
            debug!(
                "collector: stream closed, {} digests for {} dispatched files",
                digests.len(),
                dispatched
            );
            Ok(digests)
        }
        Ok(Err(err)) => Err(err),
        Err(_) => Err(DigestError::WalkerLost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hashing::hash_bytes;
    use crossbeam_channel::bounded;
    use std::io;
    use std::path::PathBuf;

    fn ok(path: &str) -> FileResult {
        FileResult {
            path: path.to_string(),
            digest: Ok(hash_bytes(path.as_bytes())),
        }
    }

    fn no_progress() -> Option<fn(usize)> {
        None
    }

    #[test]
    fn test_complete() {
        let mut cancel = CancelSource::new();
        let (tx, rx) = bounded(4);
        let (walk_tx, walk_rx) = bounded(1);
        tx.send(ok("a")).unwrap();
        tx.send(ok("b")).unwrap();
        drop(tx);
        walk_tx.send(Ok(2)).unwrap();
        let mut seen = 0;
        let map = collect_results(&rx, &walk_rx, &mut cancel, &None, Some(|n| seen += n)).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], hash_bytes(b"a"));
        assert_eq!(seen, 2);
        assert!(!cancel.is_raised());
    }

    #[test]
    fn test_file_error_raises_cancel_without_waiting() {
        let mut cancel = CancelSource::new();
        let token = cancel.token();
        let (tx, rx) = bounded(4);
        let (_walk_tx, walk_rx) = bounded::<WalkResult>(1);
        tx.send(ok("a")).unwrap();
        tx.send(FileResult {
            path: "b".to_string(),
            digest: Err(DigestError::Read {
                path: PathBuf::from("/r/b"),
                source: io::Error::new(io::ErrorKind::NotFound, "gone"),
            }),
        })
        .unwrap();
        tx.send(ok("c")).unwrap();
        // tx is kept open and the walk never reports: the collector must not wait for either.
        let err = collect_results(&rx, &walk_rx, &mut cancel, &None, no_progress()).unwrap_err();
        assert!(matches!(err, DigestError::Read { .. }));
        assert!(token.is_raised());
        drop(tx);
    }

    #[test]
    fn test_walk_error_wins_over_map() {
        let mut cancel = CancelSource::new();
        let (tx, rx) = bounded(4);
        let (walk_tx, walk_rx) = bounded(1);
        tx.send(ok("a")).unwrap();
        drop(tx);
        walk_tx
            .send(Err(DigestError::Access {
                path: PathBuf::from("/r/locked"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            }))
            .unwrap();
        let err = collect_results(&rx, &walk_rx, &mut cancel, &None, no_progress()).unwrap_err();
        assert!(matches!(err, DigestError::Access { .. }));
    }

    #[test]
    fn test_interrupt_after_stream_closes_fails_run() {
        let mut cancel = CancelSource::new();
        let token = cancel.token();
        let flag = Some(Arc::new(AtomicBool::new(false)));
        let (tx, rx) = bounded(4);
        let (walk_tx, walk_rx) = bounded(1);
        tx.send(ok("a")).unwrap();
        drop(tx);
        walk_tx.send(Ok(1)).unwrap();
        let mut on_result = |_: usize| {
            if let Some(f) = &flag {
                f.store(true, std::sync::atomic::Ordering::Relaxed);
            }
        };
        let err = collect_results(&rx, &walk_rx, &mut cancel, &flag, Some(&mut on_result))
            .unwrap_err();
        assert!(matches!(err, DigestError::Interrupted));
        assert!(token.is_raised());
    }

    #[test]
    fn test_interrupt_stops_before_next_result() {
        let mut cancel = CancelSource::new();
        let flag = Some(Arc::new(AtomicBool::new(true)));
        let (tx, rx) = bounded(4);
        let (_walk_tx, walk_rx) = bounded::<WalkResult>(1);
        tx.send(ok("a")).unwrap();
        // Stream left open: the collector must not wait for it.
        let err = collect_results(&rx, &walk_rx, &mut cancel, &flag, no_progress()).unwrap_err();
        assert!(matches!(err, DigestError::Interrupted));
        assert!(cancel.is_raised());
        drop(tx);
    }

    #[test]
    fn test_lost_walker() {
        let mut cancel = CancelSource::new();
        let (tx, rx) = bounded::<FileResult>(1);
        let (walk_tx, walk_rx) = bounded::<WalkResult>(1);
        drop(tx);
        drop(walk_tx);
        let err = collect_results(&rx, &walk_rx, &mut cancel, &None, no_progress()).unwrap_err();
        assert!(matches!(err, DigestError::WalkerLost));
    }
}
