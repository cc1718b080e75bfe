use super::calculations::average_soil_moisture;
use crate::models::{SensorReading, Trend};

/// Entries in each comparison window.
pub const WINDOW: usize = 3;

/// Moisture trend from a most-recent-first history.
///
/// Compares the mean of the three newest readings against the three before
/// them. Only the first six entries are examined. With three to five entries
/// there is no older window and the result is `Stable`.
pub fn compute_trend(history: &[SensorReading], delta: f64) -> Trend {
    if history.len() < WINDOW {
        return Trend::None;
    }

    let Some(avg_recent) = average_soil_moisture(&history[..WINDOW]) else {
        return Trend::None;
    };

    if history.len() < WINDOW * 2 {
        return Trend::Stable;
    }

    let Some(avg_older) = average_soil_moisture(&history[WINDOW..WINDOW * 2]) else {
        return Trend::Stable;
    };

    let diff = avg_recent - avg_older;
    if diff > delta {
        Trend::Increasing
    } else if diff < -delta {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}
