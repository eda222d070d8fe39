//! Per-frame readouts for a display layer.

use std::fmt;

use contracts::{DriverId, Gap};
use serde::Serialize;

/// Gap between a driver pair, phrased for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GapReadout {
    /// Closer than the side-by-side threshold
    SideBySide,
    /// One driver leads; `seconds` is `None` when the time gap is undefined
    Ahead {
        leader: DriverId,
        trailer: DriverId,
        seconds: Option<f64>,
    },
}

impl GapReadout {
    /// Phrase the gap of `a` relative to `b`.
    pub fn from_gap(a: &DriverId, b: &DriverId, gap: Gap, side_by_side_m: f64) -> Self {
        if gap.distance_m.abs() < side_by_side_m {
            return GapReadout::SideBySide;
        }
        let (leader, trailer) = if gap.distance_m >= 0.0 { (a, b) } else { (b, a) };
        GapReadout::Ahead {
            leader: leader.clone(),
            trailer: trailer.clone(),
            seconds: gap.time_s.map(f64::abs),
        }
    }
}

impl fmt::Display for GapReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapReadout::SideBySide => write!(f, "Gap: side by side"),
            GapReadout::Ahead {
                leader,
                seconds: Some(s),
                ..
            } => write!(f, "Gap: {leader} ahead by {s:.3}s"),
            GapReadout::Ahead { leader, .. } => write!(f, "Gap: {leader} ahead by —"),
        }
    }
}

/// Running order at one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based position
    pub position: usize,
    pub driver_id: DriverId,
    pub distance_m: f64,
    /// Distance behind the leader (0 for the leader)
    pub behind_leader_m: f64,
}

/// Entry of the lap-time ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapRank {
    pub position: usize,
    pub driver_id: DriverId,
    pub lap_number: Option<u32>,
    pub lap_time_s: f64,
}

/// Fastest driver at one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedLeader {
    pub driver_id: DriverId,
    pub speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (DriverId, DriverId) {
        ("VER".into(), "LEC".into())
    }

    #[test]
    fn test_side_by_side_below_threshold() {
        let (a, b) = ids();
        let gap = Gap {
            distance_m: -0.4,
            time_s: Some(-0.01),
        };
        let readout = GapReadout::from_gap(&a, &b, gap, 1.0);
        assert_eq!(readout, GapReadout::SideBySide);
        assert_eq!(readout.to_string(), "Gap: side by side");
    }

    #[test]
    fn test_leader_follows_sign() {
        let (a, b) = ids();
        let gap = Gap {
            distance_m: -8.2,
            time_s: Some(-0.123),
        };
        let readout = GapReadout::from_gap(&a, &b, gap, 1.0);
        assert_eq!(readout.to_string(), "Gap: LEC ahead by 0.123s");

        let reversed = GapReadout::from_gap(&b, &a, gap.reversed(), 1.0);
        assert_eq!(reversed, readout);
    }

    #[test]
    fn test_undefined_time_renders_dash() {
        let (a, b) = ids();
        let gap = Gap {
            distance_m: 5.0,
            time_s: None,
        };
        assert_eq!(
            GapReadout::from_gap(&a, &b, gap, 1.0).to_string(),
            "Gap: VER ahead by —"
        );
    }
}
