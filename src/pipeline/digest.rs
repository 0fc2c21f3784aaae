//! Digest worker pool: each worker takes paths from the walk, hashes the file, and offers one
//! [`FileResult`] to the collector, racing every blocking step against cancellation.

use crossbeam_channel::{Receiver, Sender, select};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread::{self, JoinHandle};

use crate::engine::tools::path_key;
use crate::{Digest, DigestError, FileResult};

use super::cancel::{CancelToken, interrupt_set};

/// Digest one file. The pipeline uses [`hash_file`](crate::engine::hashing::hash_file).
pub trait FileDigester: Fn(&Path) -> io::Result<Digest> + Send + Sync + 'static {}

impl<F> FileDigester for F where F: Fn(&Path) -> io::Result<Digest> + Send + Sync + 'static {}

/// Digest `abs_path` into a result keyed relative to `root`. Read failures become data.
pub fn digest_path<D: FileDigester + ?Sized>(abs_path: PathBuf, root: &Path, digester: &D) -> FileResult {
    let path = path_key(&abs_path, root);
    let digest = digester(&abs_path).map_err(|source| DigestError::Read {
        path: abs_path,
        source,
    });
    FileResult { path, digest }
}

/// Single digest worker: receive paths until the walk is done, cancellation is raised, or the
/// interrupt flag is set. If cancellation wins the race to deliver a result, the result is
/// discarded.
fn digest_worker_loop<D: FileDigester>(
    path_rx: Receiver<PathBuf>,
    result_tx: Sender<FileResult>,
    root: PathBuf,
    cancel: CancelToken,
    interrupt: Option<Arc<AtomicBool>>,
    digester: Arc<D>,
) {
    loop {
        let abs_path = select! {
            recv(path_rx) -> msg => match msg {
                Ok(p) => p,
                Err(_) => break,
            },
            recv(cancel.done()) -> _ => break,
        };
        // The collector sees the flag once the stream closes and reports the interrupt.
        if interrupt_set(&interrupt) {
            break;
        }
        let result = digest_path(abs_path, &root, digester.as_ref());
        select! {
            send(result_tx, result) -> res => {
                if res.is_err() {
                    break;
                }
            }
            recv(cancel.done()) -> _ => break,
        }
    }
}

/// Spawn `num_threads` digest workers. Each holds a clone of `result_tx`; the result channel
/// closes once the caller drops its own sender and every worker has exited.
pub fn spawn_digest_workers<D: FileDigester>(
    path_rx: Receiver<PathBuf>,
    result_tx: &Sender<FileResult>,
    root: &Path,
    cancel: &CancelToken,
    interrupt: &Option<Arc<AtomicBool>>,
    digester: Arc<D>,
    num_threads: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_threads.max(1))
        .map(|_| {
            let path_rx = path_rx.clone();
            let result_tx = result_tx.clone();
            let root = root.to_path_buf();
            let cancel = cancel.clone();
            let interrupt = interrupt.clone();
            let digester = Arc::clone(&digester);
            thread::spawn(move || {
                digest_worker_loop(path_rx, result_tx, root, cancel, interrupt, digester)
            })
        })
        .collect()
}
