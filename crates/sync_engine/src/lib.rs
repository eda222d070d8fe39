//! # Sync Engine
//!
//! Timeline synchronization for lap telemetry.
//!
//! Responsibilities:
//! - Shared, fixed-rate time grid over the shortest common lap duration
//! - Piecewise-linear resampling of every driver's channels onto that grid
//! - Indexed frame access and pairwise gap derivation
//! - Display readouts (standings, speed leader, lap ranking, gap phrasing)
//!
//! ## Usage Example
//!
//! ```ignore
//! use sync_engine::{TimelineSynchronizer, TimelineConfig};
//!
//! let dataset = TimelineSynchronizer::new(TimelineConfig::new(frame_count)).build(&laps)?;
//!
//! for i in 0..dataset.len() {
//!     let gap = dataset.gap(&ver, &lec, i);
//!     // Hand frame i to the renderer
//! }
//! ```

mod dataset;
mod engine;
mod interpolate;
mod readout;
mod timeline;

// Re-exports
pub use contracts::{Gap, SpeedUnit, SyncedFrame, TimelineConfig};
pub use dataset::{DriverTrack, SyncedDataset};
pub use engine::{common_duration, TimelineSynchronizer};
pub use interpolate::{interpolate_at, resample, LapCursor};
pub use readout::{GapReadout, LapRank, SpeedLeader, Standing};
pub use timeline::SharedTimeline;
