use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::engine::hashing::hash_file;
use crate::pipeline;
use crate::pipeline::digest::FileDigester;
use crate::utils::config::WorkerThreadLimits;
use crate::utils::fd_limit::max_workers_by_fd_limit;
use crate::{DigestError, DigestMap, DigestOpts};

/// Start the walk thread and the digest worker pool. The caller collects from `result_rx`
/// and then `walk_rx`; dropping the returned handles raises cancellation.
pub fn run_pipeline<D: FileDigester>(
    root: &Path,
    opts: &DigestOpts,
    digester: Arc<D>,
) -> Result<pipeline::PipelineHandles, DigestError> {
    let (root, tuning) = setup_pipeline_root_and_tuning(root, opts)?;

    let channels = pipeline::create_pipeline_channels(&root, opts);
    let token = channels.cancel.token();

    let walk_handle = pipeline::spawn_walk_thread(
        channels.path_tx,
        channels.walk_tx,
        channels.ctx,
        tuning.parallel_walk,
    );

    let worker_handles = pipeline::spawn_digest_workers(
        channels.path_rx,
        &channels.result_tx,
        &root,
        &token,
        &opts.interrupt,
        digester,
        tuning.num_threads,
    );

    // Dropping the last sender closes the result stream once every worker has exited.
    drop(channels.result_tx);

    Ok(pipeline::PipelineHandles {
        result_rx: channels.result_rx,
        walk_rx: channels.walk_rx,
        walk_handle,
        worker_handles,
        cancel: channels.cancel,
    })
}

/// Join walk and worker threads. Only call once the result stream has closed, when every
/// thread has already finished.
pub fn shutdown_pipeline_handles(
    walk_handle: JoinHandle<usize>,
    worker_handles: Vec<JoinHandle<()>>,
) -> Result<(), DigestError> {
    walk_handle
        .join()
        .map_err(|_| DigestError::ThreadPanicked("walk"))?;
    for h in worker_handles {
        h.join()
            .map_err(|_| DigestError::ThreadPanicked("digest worker"))?;
    }
    Ok(())
}

/// Canonicalize root and compute the worker count.
pub fn setup_pipeline_root_and_tuning(
    root: &Path,
    opts: &DigestOpts,
) -> Result<(PathBuf, pipeline::PipelineTuning), DigestError> {
    let root = root.canonicalize().map_err(|source| DigestError::Access {
        path: root.to_path_buf(),
        source,
    })?;

    let limits = WorkerThreadLimits::current();
    let requested = opts.num_threads.unwrap_or(limits.all_threads);
    let num_threads = match max_workers_by_fd_limit() {
        Some(fd_cap) if fd_cap < requested => {
            debug!("Capping threads {} -> {} (FD limit ~80%)", requested, fd_cap);
            fd_cap
        }
        _ => requested,
    }
    .max(limits.floor);

    if opts.use_parallel_walk {
        debug!("Walking in parallel, {} digest workers", num_threads);
    } else {
        debug!("Walking serially, {} digest workers", num_threads);
    }

    let tuning = pipeline::PipelineTuning {
        num_threads,
        parallel_walk: opts.use_parallel_walk,
    };
    Ok((root, tuning))
}

/// Walk → path channel → digest workers → result channel → map.
///
/// Returns the full map, or the first error. On error the remaining threads are not awaited:
/// cancellation is raised and they exit on their own after at most the read in progress.
pub fn collect_digests<D, F>(
    root: &Path,
    opts: &DigestOpts,
    digester: Arc<D>,
    on_progress: Option<F>,
) -> Result<DigestMap, DigestError>
where
    D: FileDigester,
    F: FnMut(usize),
{
    let pipeline::PipelineHandles {
        result_rx,
        walk_rx,
        walk_handle,
        worker_handles,
        mut cancel,
    } = run_pipeline(root, opts, digester)?;

    // `cancel` is dropped on every return below, which raises it on the success path too.
    let digests = pipeline::collect_results(
        &result_rx,
        &walk_rx,
        &mut cancel,
        &opts.interrupt,
        on_progress,
    )?;
    shutdown_pipeline_handles(walk_handle, worker_handles)?;
    debug!("main: result stream closed, {} digests", digests.len());
    Ok(digests)
}

/// [`collect_digests`] with blake3 file hashing.
pub fn compute_digests<F>(
    root: &Path,
    opts: &DigestOpts,
    on_progress: Option<F>,
) -> Result<DigestMap, DigestError>
where
    F: FnMut(usize),
{
    collect_digests(root, opts, Arc::new(hash_file), on_progress)
}
