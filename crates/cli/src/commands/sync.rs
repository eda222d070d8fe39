//! `sync` command implementation.

use anyhow::{Context, Result};
use contracts::{DriverId, SessionBlueprint};
use serde::Serialize;
use sync_engine::{LapRank, Standing};
use tracing::info;

use super::load_blueprint;
use crate::cli::SyncArgs;
use crate::pipeline::{PipelineStats, PreparedSession, SessionPipeline, SkippedDriver};

/// Session summary for output
#[derive(Debug, Serialize)]
pub(crate) struct SyncSummary {
    session: String,
    drivers: Vec<DriverId>,
    frames: usize,
    fps: u32,
    common_duration_s: f64,
    speed_unit: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedDriver>,
    lap_ranking: Vec<LapRank>,
    final_standings: Vec<Standing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_gap: Option<GapSummary>,
    stats: PipelineStats,
}

#[derive(Debug, Serialize)]
struct GapSummary {
    pair: (DriverId, DriverId),
    distance_m: f64,
    time_s: Option<f64>,
    readout: String,
}

/// Execute the `sync` command
pub fn run_sync(args: &SyncArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");
    let blueprint = load_blueprint(&args.config)?;

    info!(
        session = %blueprint.session_label(),
        provider = ?blueprint.source.provider,
        fps = blueprint.playback.fps,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        println!("Configuration is valid: {}", args.config.display());
        return Ok(());
    }

    let session = SessionPipeline::new(blueprint.clone())
        .prepare()
        .context("Failed to synchronize session")?;
    let summary = summarize(&blueprint, &session);

    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

pub(crate) fn summarize(blueprint: &SessionBlueprint, session: &PreparedSession) -> SyncSummary {
    let dataset = &session.dataset;
    let last = dataset.len().saturating_sub(1);

    let final_gap = session.pair.as_ref().and_then(|(a, b)| {
        let gap = dataset.gap(a, b, last)?;
        let readout = dataset.gap_readout(a, b, last, blueprint.gap.side_by_side_m)?;
        Some(GapSummary {
            pair: (a.clone(), b.clone()),
            distance_m: gap.distance_m,
            time_s: gap.time_s,
            readout: readout.to_string(),
        })
    });

    SyncSummary {
        session: session.label.clone(),
        drivers: dataset.driver_ids().cloned().collect(),
        frames: dataset.len(),
        fps: blueprint.playback.fps,
        common_duration_s: dataset.common_duration(),
        speed_unit: dataset.speed_unit().label(),
        skipped: session.skipped.clone(),
        lap_ranking: dataset.lap_ranking(),
        final_standings: dataset.standings_at(last),
        final_gap,
        stats: session.stats.clone(),
    }
}

fn print_summary(summary: &SyncSummary) {
    println!("\n=== {} ===\n", summary.session);
    println!("Timeline:");
    println!("  Drivers: {}", summary.drivers.len());
    println!("  Frames: {} @ {} fps", summary.frames, summary.fps);
    println!("  Common duration: {:.3}s", summary.common_duration_s);
    println!(
        "  Samples dropped: {} of {}",
        summary.stats.samples_dropped, summary.stats.samples_received
    );

    if !summary.skipped.is_empty() {
        println!("\nSkipped ({}):", summary.skipped.len());
        for skipped in &summary.skipped {
            println!("  - {}: {}", skipped.driver_id, skipped.reason);
        }
    }

    println!("\nLap ranking:");
    for rank in &summary.lap_ranking {
        println!(
            "  {:>2}. {:<4} {:>8.3}s",
            rank.position, rank.driver_id, rank.lap_time_s
        );
    }

    println!("\nAt the end of the common duration:");
    for standing in &summary.final_standings {
        println!(
            "  {:>2}. {:<4} {:>9.1} m  (-{:.1} m)",
            standing.position, standing.driver_id, standing.distance_m, standing.behind_leader_m
        );
    }

    if let Some(ref gap) = summary.final_gap {
        println!("\n{} ({} vs {})", gap.readout, gap.pair.0, gap.pair.1);
    }
    println!();
}
