//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{DriverId, SessionBlueprint};
use serde::Serialize;
use tracing::info;

use super::load_blueprint;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    session: SessionInfo,
    source: SourceInfo,
    drivers: DriverInfo,
    playback: PlaybackInfo,
    gap: GapInfo,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fastest_laps: Vec<LapInfo>,
}

#[derive(Serialize)]
struct SessionInfo {
    year: u16,
    event: String,
    kind: String,
}

#[derive(Serialize)]
struct SourceInfo {
    provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mock_drivers: Option<usize>,
}

#[derive(Serialize)]
struct DriverInfo {
    count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include: Vec<DriverId>,
    on_insufficient: String,
}

#[derive(Serialize)]
struct PlaybackInfo {
    fps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_s: Option<f64>,
    speed_unit: &'static str,
}

#[derive(Serialize)]
struct GapInfo {
    side_by_side_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pair: Option<(DriverId, DriverId)>,
}

#[derive(Serialize)]
struct LapInfo {
    driver: DriverId,
    #[serde(skip_serializing_if = "Option::is_none")]
    lap_number: Option<u32>,
    lap_time_s: f64,
    samples: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");
    let blueprint = load_blueprint(&args.config)?;

    let fastest_laps = if args.laps {
        fastest_laps(&blueprint)?
    } else {
        Vec::new()
    };
    let info = build_config_info(&blueprint, fastest_laps);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

/// Fastest lap of every driver the provider knows about
fn fastest_laps(blueprint: &SessionBlueprint) -> Result<Vec<LapInfo>> {
    let provider = ingestion::provider_from_blueprint(blueprint)
        .context("Failed to open session data provider")?;
    let laps = provider.laps().context("Failed to read laps")?;

    Ok(ingestion::fastest_lap_per_driver(laps)
        .into_iter()
        .map(|lap| LapInfo {
            samples: lap.samples.len(),
            lap_time_s: lap.lap_time.unwrap_or(f64::NAN),
            lap_number: lap.lap_number,
            driver: lap.driver_id,
        })
        .collect())
}

fn build_config_info(blueprint: &SessionBlueprint, fastest_laps: Vec<LapInfo>) -> ConfigInfo {
    let source = &blueprint.source;
    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        session: SessionInfo {
            year: blueprint.session.year,
            event: blueprint.session.event.clone(),
            kind: blueprint.session.kind.clone(),
        },
        source: SourceInfo {
            provider: format!("{:?}", source.provider),
            path: source.path.as_ref().map(|p| p.display().to_string()),
            mock_drivers: (source.provider == contracts::ProviderKind::Mock)
                .then_some(source.mock_drivers),
        },
        drivers: DriverInfo {
            count: blueprint.drivers.count,
            include: blueprint.drivers.include.clone(),
            on_insufficient: format!("{:?}", blueprint.drivers.on_insufficient),
        },
        playback: PlaybackInfo {
            fps: blueprint.playback.fps,
            duration_s: blueprint.playback.duration_s,
            speed_unit: blueprint.playback.speed_unit.label(),
        },
        gap: GapInfo {
            side_by_side_m: blueprint.gap.side_by_side_m,
            pair: blueprint.gap.pair.clone(),
        },
        fastest_laps,
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("\n=== Session Configuration ===\n");
    println!("Version: {}", info.version);

    println!("\nSession:");
    println!("  Year: {}", info.session.year);
    println!("  Event: {}", info.session.event);
    println!("  Kind: {}", info.session.kind);

    println!("\nSource:");
    println!("  Provider: {}", info.source.provider);
    if let Some(ref path) = info.source.path {
        println!("  Path: {}", path);
    }
    if let Some(n) = info.source.mock_drivers {
        println!("  Mock drivers: {}", n);
    }

    println!("\nDrivers:");
    if info.drivers.include.is_empty() {
        println!("  Fastest {} laps", info.drivers.count);
    } else {
        let codes: Vec<&str> = info.drivers.include.iter().map(DriverId::as_str).collect();
        println!("  Included: {}", codes.join(", "));
    }
    println!("  On insufficient data: {}", info.drivers.on_insufficient);

    println!("\nPlayback:");
    println!("  FPS: {}", info.playback.fps);
    match info.playback.duration_s {
        Some(d) => println!("  Duration: {:.1}s", d),
        None => println!("  Duration: common lap duration"),
    }
    println!("  Speed unit: {}", info.playback.speed_unit);

    println!("\nGap:");
    println!("  Side by side below: {:.1} m", info.gap.side_by_side_m);
    if let Some((ref a, ref b)) = info.gap.pair {
        println!("  Pair: {} vs {}", a, b);
    }

    if !info.fastest_laps.is_empty() {
        println!("\nFastest laps ({}):", info.fastest_laps.len());
        for (pos, lap) in info.fastest_laps.iter().enumerate() {
            println!(
                "  {:>2}. {:<4} {:>8.3}s  ({} samples)",
                pos + 1,
                lap.driver,
                lap.lap_time_s,
                lap.samples
            );
        }
    }

    println!();
}
