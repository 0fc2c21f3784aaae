//! Pipeline context and tuning: shared data passed into the walk thread and worker pool.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread::JoinHandle;

use crate::utils::config::{PATH_CHANNEL_CAP, RESULT_CHANNEL_CAP};
use crate::{DigestError, DigestOpts, FileResult};

use super::cancel::{CancelSource, CancelToken};

/// Outcome of the walk: number of files dispatched, or the error that stopped it.
pub type WalkResult = Result<usize, DigestError>;

/// Worker count and walk mode for one run.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    pub num_threads: usize,
    pub parallel_walk: bool,
}

/// Shared context for the walk loop: root, walk options, and the stop signals it observes.
pub struct PipelineContext {
    pub root: PathBuf,
    pub follow_links: bool,
    pub cancel: CancelToken,
    pub interrupt: Option<Arc<AtomicBool>>,
}

/// Handles returned by [`run_pipeline`](super::run_pipeline): the collector reads `result_rx`
/// until it closes, then `walk_rx`. `cancel` is owned here so dropping the handles raises it.
pub struct PipelineHandles {
    pub result_rx: Receiver<FileResult>,
    pub walk_rx: Receiver<WalkResult>,
    pub walk_handle: JoinHandle<usize>,
    pub worker_handles: Vec<JoinHandle<()>>,
    pub cancel: CancelSource,
}

/// Channels for one run. Walk thread gets path_tx, walk_tx, ctx; workers get path_rx, result_tx.
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub result_tx: Sender<FileResult>,
    pub result_rx: Receiver<FileResult>,
    pub walk_tx: Sender<WalkResult>,
    pub walk_rx: Receiver<WalkResult>,
    pub cancel: CancelSource,
    pub ctx: PipelineContext,
}

pub fn create_pipeline_channels(root: &Path, opts: &DigestOpts) -> PipelineChannels {
    let (path_tx, path_rx) = bounded::<PathBuf>(PATH_CHANNEL_CAP);
    let (result_tx, result_rx) = bounded::<FileResult>(RESULT_CHANNEL_CAP);
    // Single slot: the walk thread reports once and never blocks doing so.
    let (walk_tx, walk_rx) = bounded::<WalkResult>(1);
    let cancel = CancelSource::new();

    let ctx = PipelineContext {
        root: root.to_path_buf(),
        follow_links: opts.follow_links,
        cancel: cancel.token(),
        interrupt: opts.interrupt.clone(),
    };

    PipelineChannels {
        path_tx,
        path_rx,
        result_tx,
        result_rx,
        walk_tx,
        walk_rx,
        cancel,
        ctx,
    }
}
