use crate::logic::thresholds::FertilizationPolicy;
use crate::models::{FertilizationDecision, SensorReading};

/// Fertilization schedule check.
///
/// The number of history entries stands in for days since the last feeding.
/// This is a record count, not a calendar computation: a sensor reporting
/// hourly crosses the interval in well under a day.
pub fn evaluate_fertilization(
    _reading: &SensorReading,
    history: &[SensorReading],
    policy: &FertilizationPolicy,
) -> FertilizationDecision {
    let elapsed = history.len();

    if elapsed > policy.interval_readings {
        FertilizationDecision::recommended(
            policy.fertilizer_type.clone(),
            policy.amount_kg,
            format!(
                "Based on time elapsed, {} fertilization recommended ({:.1} kg). \
                 Actual needs depend on soil analysis and crop type.",
                policy.fertilizer_type, policy.amount_kg
            ),
        )
    } else {
        FertilizationDecision::not_needed(
            "No fertilization needed at this time. Monitor plant health and soil conditions.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn readings(n: usize) -> Vec<SensorReading> {
        (0..n)
            .map(|_| SensorReading::new("S1", 50.0, 20.0, 50.0, Utc::now()))
            .collect()
    }

    #[test]
    fn fifteen_entries_triggers_fertilization() {
        let history = readings(15);
        let d = evaluate_fertilization(&history[0], &history, &FertilizationPolicy::default());
        assert!(d.needed);
        assert_eq!(d.fertilizer_type.as_deref(), Some("balanced_NPK"));
        assert_eq!(d.amount_kg, 2.5);
        assert!(d.explanation.contains("balanced_NPK fertilization recommended (2.5 kg)"));
        assert!(d.explanation.contains("soil analysis"));
    }

    #[test]
    fn fourteen_entries_is_not_enough() {
        let history = readings(14);
        let d = evaluate_fertilization(&history[0], &history, &FertilizationPolicy::default());
        assert!(!d.needed);
        assert!(d.fertilizer_type.is_none());
        assert_eq!(d.amount_kg, 0.0);
    }

    #[test]
    fn empty_history_not_needed() {
        let reading = SensorReading::new("S1", 50.0, 20.0, 50.0, Utc::now());
        let d = evaluate_fertilization(&reading, &[], &FertilizationPolicy::default());
        assert!(!d.needed);
    }

    #[test]
    fn policy_is_configurable() {
        let policy = FertilizationPolicy {
            interval_readings: 3,
            fertilizer_type: "high_N".into(),
            amount_kg: 1.0,
        };
        let history = readings(4);
        let d = evaluate_fertilization(&history[0], &history, &policy);
        assert!(d.needed);
        assert_eq!(d.fertilizer_type.as_deref(), Some("high_N"));
        assert_eq!(d.amount_kg, 1.0);
        assert!(d.explanation.contains("high_N fertilization recommended (1.0 kg)"));
        assert!(!d.explanation.contains("balanced"));
    }
}
