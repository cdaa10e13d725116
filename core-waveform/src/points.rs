//! Point marker replacement.

use crate::error::Result;
use bridge_traits::waveform::{PointMarker, WaveformSurface};
use tracing::warn;

/// Drop markers the rendering library would reject (non-finite or negative
/// times), keeping the order of the rest.
pub fn sanitize(points: &[PointMarker]) -> Vec<PointMarker> {
    points
        .iter()
        .filter(|point| {
            let valid = point.time.is_finite() && point.time >= 0.0;
            if !valid {
                warn!(label = %point.label, time = point.time, "Dropping invalid point marker");
            }
            valid
        })
        .cloned()
        .collect()
}

/// Replace every marker on `surface` with `points`. No diffing.
pub fn replace_points(surface: &mut dyn WaveformSurface, points: &[PointMarker]) -> Result<()> {
    surface.remove_all_points()?;
    if !points.is_empty() {
        surface.add_points(points)?;
    }
    Ok(())
}
