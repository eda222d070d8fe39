//! `play` command implementation.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::load_blueprint;
use crate::cli::PlayArgs;
use crate::pipeline::{PlaybackStats, PreparedSession, SessionPipeline};

const MIN_TICK: Duration = Duration::from_micros(100);
const MAX_TICK: Duration = Duration::from_secs(60);

/// Playback pacing and output settings
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaybackOptions {
    pub fps: u32,
    pub speed: f64,
    /// 0 = whole timeline
    pub max_frames: usize,
    /// 0 = once per second of timeline
    pub print_every: usize,
    pub side_by_side_m: f64,
}

impl PlaybackOptions {
    fn tick(&self) -> Duration {
        let rate = f64::from(self.fps.max(1)) * self.speed;
        Duration::try_from_secs_f64(1.0 / rate)
            .map_or(MAX_TICK, |tick| tick.clamp(MIN_TICK, MAX_TICK))
    }

    fn print_every(&self) -> usize {
        if self.print_every == 0 {
            self.fps.max(1) as usize
        } else {
            self.print_every
        }
    }
}

/// Execute the `play` command
pub async fn run_play(args: &PlayArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");
    let blueprint = load_blueprint(&args.config)?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    let session = SessionPipeline::new(blueprint.clone())
        .prepare()
        .context("Failed to synchronize session")?;

    let options = PlaybackOptions {
        fps: blueprint.playback.fps,
        speed: args.speed,
        max_frames: args.max_frames,
        print_every: args.print_every,
        side_by_side_m: blueprint.gap.side_by_side_m,
    };

    info!(
        session = %session.label,
        frames = session.dataset.len(),
        speed = args.speed,
        "Starting playback..."
    );

    let stats = play(&session, options, shutdown_signal()).await;
    stats.print_summary(&session.stats);

    info!("Lap Replay finished");
    Ok(())
}

/// Step through the timeline at the configured rate until it ends, the
/// frame limit is hit, or `shutdown` resolves.
pub(crate) async fn play(
    session: &PreparedSession,
    options: PlaybackOptions,
    shutdown: impl Future<Output = ()>,
) -> PlaybackStats {
    let dataset = &session.dataset;
    let limit = match options.max_frames {
        0 => dataset.len(),
        n => n.min(dataset.len()),
    };
    let every = options.print_every();
    let pair_label = session
        .pair
        .as_ref()
        .map(|(a, b)| format!("{a}-{b}"))
        .unwrap_or_default();

    let mut stats = PlaybackStats::default();
    let mut ticker = interval(options.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let started = Instant::now();
    tokio::pin!(shutdown);

    for i in 0..limit {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                warn!(frame = i, "Received shutdown signal, stopping playback...");
                stats.interrupted = true;
                break;
            }
            _ = ticker.tick() => {}
        }

        observability::record_playback_frame(i);
        stats.frames_played += 1;

        let gap = session
            .pair
            .as_ref()
            .and_then(|(a, b)| dataset.gap(a, b, i));
        if let Some(ref gap) = gap {
            observability::record_gap(&pair_label, gap);
            stats.gap_metrics.update(gap, options.side_by_side_m);
        }

        if i % every == 0 || i + 1 == limit {
            println!("{}", frame_line(session, i, options.side_by_side_m));
        } else {
            debug!(frame = i, "frame shown");
        }
    }

    stats.duration = started.elapsed();
    stats
}

/// One readout line: time, speed leader, running leader and pair gap
fn frame_line(session: &PreparedSession, i: usize, side_by_side_m: f64) -> String {
    let dataset = &session.dataset;
    let mut line = format!("t={:>8.3}s", dataset.time_at(i).unwrap_or_default());

    if let Some(top) = dataset.max_speed_at(i) {
        line.push_str(&format!(
            " | top speed {} {:.1} {}",
            top.driver_id,
            top.speed,
            dataset.speed_unit().label()
        ));
    }
    if let Some(leader) = dataset.standings_at(i).first() {
        line.push_str(&format!(" | leader {}", leader.driver_id));
    }
    if let Some(readout) = session
        .pair
        .as_ref()
        .and_then(|(a, b)| dataset.gap_readout(a, b, i, side_by_side_m))
    {
        line.push_str(&format!(" | {readout}"));
    }
    line
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
