//! Pipeline and playback statistics.

use std::time::Duration;

use observability::GapMetricsAggregator;
use serde::Serialize;

/// Statistics from preparing a session
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    /// Drivers picked by lap selection
    pub drivers_selected: usize,

    /// Drivers that made it onto the timeline
    pub drivers_tracked: usize,

    /// Frames per driver
    pub frames: usize,

    /// Raw samples handed to the normalizer
    pub samples_received: usize,

    /// Samples discarded as duplicates, reversals or non-finite
    pub samples_dropped: usize,

    /// Wall time spent loading and synchronizing
    #[serde(skip)]
    pub prepare_duration: Duration,
}

impl PipelineStats {
    /// Share of received samples that were dropped, in percent
    pub fn drop_rate(&self) -> f64 {
        if self.samples_received > 0 {
            self.samples_dropped as f64 / self.samples_received as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Statistics from a playback run
#[derive(Debug, Clone, Default)]
pub struct PlaybackStats {
    /// Frames shown
    pub frames_played: usize,

    /// Wall time of the run
    pub duration: Duration,

    /// Stopped by a shutdown signal
    pub interrupted: bool,

    /// Ghost-pair gap statistics
    pub gap_metrics: GapMetricsAggregator,
}

impl PlaybackStats {
    /// Achieved frames per second
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_played as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self, pipeline: &PipelineStats) {
        println!("\n=== Playback Statistics ===\n");
        println!("Overview");
        println!("   Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   Frames played: {} / {}", self.frames_played, pipeline.frames);
        println!("   FPS: {:.2}", self.fps());
        println!("   Drivers: {}", pipeline.drivers_tracked);
        println!(
            "   Samples dropped: {} ({:.2}%)",
            pipeline.samples_dropped,
            pipeline.drop_rate()
        );
        if self.interrupted {
            println!("   Stopped early by shutdown signal");
        }

        if self.gap_metrics.total_frames > 0 {
            println!("\n{}", self.gap_metrics.summary());
        }
    }
}
