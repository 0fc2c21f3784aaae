//! Pipeline components: cancellation, context, walk loop, digest workers, collector.

pub mod cancel;
pub mod collector;
pub mod context;
pub mod digest;
pub mod orchestrator;
pub mod walk;

pub use cancel::{CancelSource, CancelToken};
pub use collector::collect_results;
pub use context::{
    PipelineChannels, PipelineContext, PipelineHandles, PipelineTuning, WalkResult,
    create_pipeline_channels,
};
pub use digest::{FileDigester, digest_path, spawn_digest_workers};
pub use orchestrator::{
    collect_digests, compute_digests, run_pipeline, setup_pipeline_root_and_tuning,
    shutdown_pipeline_handles,
};
pub use walk::{WalkOutcome, run_walk_loop, spawn_walk_thread, to_outcome_jwalk, to_outcome_walkdir};
