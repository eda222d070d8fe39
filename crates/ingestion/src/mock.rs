//! Mock session provider
//!
//! Synthesizes a deterministic session for runs without recorded data.
//! Every driver laps the same elliptical circuit with a slightly different
//! lap time, on a jittered sample clock, with one duplicate sample and one
//! swapped pair injected per lap so the normalizer has work to do.

use std::f64::consts::PI;

use contracts::{ContractError, DriverId, RawLap, RawSample, SessionDataProvider};
use tracing::debug;

use crate::distance::fill_distance_from_positions;

const DRIVER_CODES: [&str; 20] = [
    "VER", "PER", "LEC", "SAI", "HAM", "RUS", "NOR", "PIA", "ALO", "STR", "GAS", "OCO", "ALB",
    "SAR", "BOT", "ZHO", "MAG", "HUL", "TSU", "DEV",
];

/// Semi-axes of the circuit (metres)
const TRACK_A: f64 = 900.0;
const TRACK_B: f64 = 500.0;

/// Pace variation around the lap (fraction of a revolution)
const PACE_WOBBLE: f64 = 0.05;

/// Mock session configuration
#[derive(Debug, Clone)]
pub struct MockSessionConfig {
    /// Session label reported by the provider
    pub label: String,

    /// Number of drivers
    pub drivers: usize,

    /// Laps per driver; lap 1 is an untimed out lap
    pub laps_per_driver: u32,

    /// Nominal sample rate (Hz)
    pub sample_hz: f64,

    /// Lap time of the fastest driver (seconds)
    pub base_lap_time: f64,
}

impl Default for MockSessionConfig {
    fn default() -> Self {
        Self {
            label: "Mock Session".to_string(),
            drivers: 10,
            laps_per_driver: 2,
            sample_hz: 10.0,
            base_lap_time: 72.0,
        }
    }
}

/// Mock session provider
///
/// Speeds are reported in km/h, positions and distances in metres.
pub struct MockSessionProvider {
    config: MockSessionConfig,
}

impl MockSessionProvider {
    /// Create a provider from a config
    pub fn new(config: MockSessionConfig) -> Self {
        Self { config }
    }

    /// Default session with `drivers` drivers
    pub fn with_drivers(drivers: usize) -> Self {
        Self::new(MockSessionConfig {
            drivers,
            ..Default::default()
        })
    }

    /// Get config
    pub fn config(&self) -> &MockSessionConfig {
        &self.config
    }

    /// Driver code for the i-th synthetic driver
    pub fn driver_code(index: usize) -> DriverId {
        match DRIVER_CODES.get(index) {
            Some(code) => DriverId::new(code),
            None => DriverId::new(&format!("D{:02}", index + 1)),
        }
    }

    /// Official lap time of driver `index` on lap `lap_number` (`None` for the out lap)
    pub fn lap_time(&self, index: usize, lap_number: u32) -> Option<f64> {
        if lap_number <= 1 {
            return None;
        }
        Some(self.config.base_lap_time + 0.15 * index as f64 + 0.2 * f64::from(lap_number - 2))
    }

    fn generate_lap(&self, index: usize, lap_number: u32) -> RawLap {
        let lap_time = self.lap_time(index, lap_number);
        // Out laps are driven slower and never timed
        let duration = lap_time.unwrap_or(self.config.base_lap_time + 8.0);
        let mut samples = sample_circuit(duration, self.config.sample_hz, index);
        fill_distance_from_positions(&mut samples);
        inject_faults(&mut samples);

        RawLap {
            driver_id: Self::driver_code(index),
            lap_number: Some(lap_number),
            lap_time,
            samples,
        }
    }
}

impl Default for MockSessionProvider {
    fn default() -> Self {
        Self::new(MockSessionConfig::default())
    }
}

impl SessionDataProvider for MockSessionProvider {
    fn session_label(&self) -> String {
        self.config.label.clone()
    }

    fn laps(&self) -> Result<Vec<RawLap>, ContractError> {
        let laps: Vec<RawLap> = (0..self.config.drivers)
            .flat_map(|index| {
                (1..=self.config.laps_per_driver).map(move |lap| self.generate_lap(index, lap))
            })
            .collect();
        debug!(
            drivers = self.config.drivers,
            laps = laps.len(),
            "mock session generated"
        );
        Ok(laps)
    }
}

/// One lap of the ellipse, lap-relative time from 0 to `duration`.
fn sample_circuit(duration: f64, sample_hz: f64, index: usize) -> Vec<RawSample> {
    let intervals = (duration * sample_hz).ceil().max(1.0) as usize;
    let dt = duration / intervals as f64;
    let phase = index as f64;

    (0..=intervals)
        .map(|k| {
            let t = if k == 0 {
                0.0
            } else if k == intervals {
                duration
            } else {
                // |jitter| < dt / 2, so the clock stays monotone
                k as f64 * dt + 0.3 * dt * (1.7 * k as f64 + phase).sin()
            };
            position_at(t, duration)
        })
        .collect()
}

fn position_at(t: f64, duration: f64) -> RawSample {
    let u = t / duration;
    let theta = 2.0 * PI * u + PACE_WOBBLE * (4.0 * PI * u).sin();
    let theta_rate = (2.0 * PI + 4.0 * PI * PACE_WOBBLE * (4.0 * PI * u).cos()) / duration;
    let (sin, cos) = theta.sin_cos();
    let speed_mps = theta_rate * (TRACK_A * TRACK_A * sin * sin + TRACK_B * TRACK_B * cos * cos).sqrt();

    RawSample {
        timestamp: t,
        x: TRACK_A * cos,
        y: TRACK_B * sin,
        speed: speed_mps * 3.6,
        distance: 0.0,
    }
}

/// Repeat one sample and swap one adjacent pair.
fn inject_faults(samples: &mut Vec<RawSample>) {
    let n = samples.len();
    if n < 6 {
        return;
    }
    let dup = n / 3;
    let repeated = samples[dup];
    samples.insert(dup + 1, repeated);
    let swap = 2 * n / 3;
    samples.swap(swap, swap + 1);
}
