use crate::models::{Recommendation, SensorReading, StoredRecommendation};
use std::fmt::Write;

/// Plain-text rendering of a recommendation for the terminal.
pub fn recommendation(rec: &Recommendation) -> String {
    let mut out = String::new();
    let irrigation = &rec.irrigation;
    let fertilization = &rec.fertilization;

    let _ = writeln!(
        out,
        "Sensor {}  ({})",
        rec.sensor_id,
        rec.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{} Irrigation: {} [{} priority, {} strategy]",
        irrigation.priority.symbol(),
        irrigation.action,
        irrigation.priority,
        irrigation.strategy
    );
    if irrigation.action.is_watering() {
        let _ = writeln!(
            out,
            "  Volume: {} mL ({:.1} L)",
            irrigation.volume_ml,
            irrigation.volume_liters()
        );
    }
    let _ = writeln!(out, "  {}", irrigation.explanation);
    let _ = writeln!(out);

    match fertilization.fertilizer_type {
        Some(ref kind) if fertilization.needed => {
            let _ = writeln!(
                out,
                "Fertilization: {:.1} kg {}",
                fertilization.amount_kg, kind
            );
        }
        _ => {
            let _ = writeln!(out, "Fertilization: not needed");
        }
    }
    let _ = writeln!(out, "  {}", fertilization.explanation);

    if !rec.alerts.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Alerts ({}):", rec.alerts.len());
        for alert in &rec.alerts {
            let _ = writeln!(out, "  ⚠ {}", alert);
        }
    }

    out
}

pub fn reading_row(reading: &SensorReading) -> String {
    format!(
        "{:<20} {}  moisture {:>5.1}%  temp {:>5.1}°C  humidity {:>5.1}%",
        reading.sensor_id,
        reading.timestamp.format("%Y-%m-%d %H:%M:%S"),
        reading.soil_moisture,
        reading.temperature_c,
        reading.humidity
    )
}

pub fn audit_row(record: &StoredRecommendation) -> String {
    let rec = &record.recommendation;
    format!(
        "#{:<6} {}  {:<17} {:>7} mL  fertilize: {:<3}  alerts: {}",
        record.id,
        rec.generated_at.format("%Y-%m-%d %H:%M:%S"),
        rec.irrigation.action.as_str(),
        rec.irrigation.volume_ml,
        if rec.fertilization.needed { "yes" } else { "no" },
        rec.alerts.len()
    )
}
