//! Session pipeline module.

mod orchestrator;
mod stats;

pub use orchestrator::{PreparedSession, SessionPipeline, SkippedDriver};
pub use stats::{PipelineStats, PlaybackStats};
