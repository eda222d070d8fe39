//! Distance back-fill for sources without a distance channel.

use contracts::RawSample;

/// Fill `distance` with the cumulative path length through (x, y),
/// starting at 0 on the earliest sample.
///
/// Accumulation follows timestamp order, not slice order, so an unsorted
/// lap still gets monotone distances along the driven line. Non-finite
/// timestamps sort last and contribute no length.
pub fn fill_distance_from_positions(samples: &mut [RawSample]) {
    let mut order: Vec<usize> = (0..samples.len()).collect();
    order.sort_by(|&a, &b| samples[a].timestamp.total_cmp(&samples[b].timestamp));

    let mut travelled = 0.0;
    let mut previous: Option<(f64, f64)> = None;
    for idx in order {
        let sample = &mut samples[idx];
        if let Some((px, py)) = previous {
            let step = (sample.x - px).hypot(sample.y - py);
            if step.is_finite() {
                travelled += step;
            }
        }
        sample.distance = travelled;
        previous = Some((sample.x, sample.y));
    }
}
