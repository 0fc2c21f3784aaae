//! Walk loop: consumes an iterator of walk outcomes, dispatches regular files to the worker pool,
//! and reports its own outcome once on the walk channel.

use crossbeam_channel::{Sender, select};
use std::io;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::DigestError;

use super::cancel::interrupt_set;
use super::context::{PipelineContext, WalkResult};

/// One item from a directory walk.
pub enum WalkOutcome {
    /// A regular file: dispatch it.
    File(PathBuf),
    /// Directory, symlink, device, fifo, socket: nothing to digest.
    Skip,
    /// The entry could not be accessed.
    Err {
        path: Option<PathBuf>,
        source: io::Error,
    },
}

/// Convert a jwalk result into [`WalkOutcome`].
pub fn to_outcome_jwalk(r: Result<jwalk::DirEntry<((), ())>, jwalk::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.path()),
        Ok(_) => WalkOutcome::Skip,
        Err(err) => {
            let path = err.path().map(PathBuf::from);
            let msg = err.to_string();
            WalkOutcome::Err {
                path,
                source: err.into_io_error().unwrap_or_else(|| io::Error::other(msg)),
            }
        }
    }
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(_) => WalkOutcome::Skip,
        Err(err) => {
            let path = err.path().map(PathBuf::from);
            let msg = err.to_string();
            WalkOutcome::Err {
                path,
                source: err.into_io_error().unwrap_or_else(|| io::Error::other(msg)),
            }
        }
    }
}

fn jwalk_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use jwalk::Parallelism;
    use std::time::Duration;
    Box::new(
        jwalk::WalkDir::new(&ctx.root)
            .follow_links(ctx.follow_links)
            .skip_hidden(false)
            .sort(true)
            .parallelism(Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_secs(60),
            })
            .into_iter()
            .map(to_outcome_jwalk),
    )
}

fn walkdir_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use walkdir::WalkDir;
    Box::new(
        WalkDir::new(&ctx.root)
            .follow_links(ctx.follow_links)
            .sort_by_file_name()
            .into_iter()
            .map(to_outcome_walkdir),
    )
}

pub fn spawn_walk_thread(
    path_tx: Sender<PathBuf>,
    walk_tx: Sender<WalkResult>,
    ctx: PipelineContext,
    parallel_walk: bool,
) -> JoinHandle<usize> {
    thread::spawn(move || {
        let iter: Box<dyn Iterator<Item = WalkOutcome>> = match parallel_walk {
            true => jwalk_iter(&ctx),
            false => walkdir_iter(&ctx),
        };
        run_walk_loop(path_tx, walk_tx, &ctx, iter)
    })
}

/// Run the walk loop to completion, then drop `path_tx` (workers drain what is queued and exit)
/// and report the outcome on `walk_tx`. Returns the number of files dispatched.
pub fn run_walk_loop<I>(
    path_tx: Sender<PathBuf>,
    walk_tx: Sender<WalkResult>,
    ctx: &PipelineContext,
    iter: I,
) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    let outcome = dispatch_files(&path_tx, ctx, iter, &mut count);
    drop(path_tx);
    // Capacity 1 and a single send: never blocks.
    let _ = walk_tx.send(outcome.map(|()| count));
    count
}

fn check_stop(ctx: &PipelineContext) -> Result<(), DigestError> {
    if ctx.cancel.is_raised() {
        return Err(DigestError::Canceled);
    }
    if interrupt_set(&ctx.interrupt) {
        return Err(DigestError::Interrupted);
    }
    Ok(())
}

fn dispatch_files<I>(
    path_tx: &Sender<PathBuf>,
    ctx: &PipelineContext,
    iter: I,
    count: &mut usize,
) -> Result<(), DigestError>
where
    I: Iterator<Item = WalkOutcome>,
{
    for outcome in iter {
        check_stop(ctx)?;
        match outcome {
            WalkOutcome::Skip => {}
            WalkOutcome::Err { path, source } => {
                return Err(DigestError::Access {
                    path: path.unwrap_or_else(|| ctx.root.clone()),
                    source,
                });
            }
            WalkOutcome::File(path) => {
                select! {
                    send(path_tx, path) -> res => {
                        // Every worker has exited, which only happens once cancellation is raised.
                        if res.is_err() {
                            return Err(DigestError::Canceled);
                        }
                    }
                    recv(ctx.cancel.done()) -> _ => return Err(DigestError::Canceled),
                }
                *count += 1;
            }
        }
    }
    Ok(())
}
