use super::reading::Trend;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationAction {
    WaterImmediately,
    Water,
    StopWatering,
    Monitor,
}

impl IrrigationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationAction::WaterImmediately => "water_immediately",
            IrrigationAction::Water => "water",
            IrrigationAction::StopWatering => "stop_watering",
            IrrigationAction::Monitor => "monitor",
        }
    }

    pub fn is_watering(&self) -> bool {
        matches!(
            self,
            IrrigationAction::WaterImmediately | IrrigationAction::Water
        )
    }
}

impl std::fmt::Display for IrrigationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Priority::Low => "→",
            Priority::Medium => "⚠",
            Priority::High => "!",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Irrigation outcome for one reading.
///
/// `volume_ml` is non-zero exactly when `action.is_watering()`; the
/// constructors are the only way rule code builds one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrigationDecision {
    pub action: IrrigationAction,
    pub volume_ml: u64,
    pub priority: Priority,
    pub explanation: String,
    /// Id of the strategy that produced this decision.
    pub strategy: String,
}

impl IrrigationDecision {
    /// A watering decision. Volumes below 1 mL are raised to 1 mL so the
    /// action and volume never disagree.
    pub fn watering(
        strategy: &str,
        action: IrrigationAction,
        volume_ml: u64,
        priority: Priority,
        explanation: impl Into<String>,
    ) -> Self {
        debug_assert!(action.is_watering());
        Self {
            action,
            volume_ml: volume_ml.max(1),
            priority,
            explanation: explanation.into(),
            strategy: strategy.to_string(),
        }
    }

    pub fn hold(strategy: &str, action: IrrigationAction, explanation: impl Into<String>) -> Self {
        debug_assert!(!action.is_watering());
        Self {
            action,
            volume_ml: 0,
            priority: Priority::Low,
            explanation: explanation.into(),
            strategy: strategy.to_string(),
        }
    }

    pub fn volume_liters(&self) -> f64 {
        self.volume_ml as f64 / 1000.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizationDecision {
    pub needed: bool,
    #[serde(rename = "type")]
    pub fertilizer_type: Option<String>,
    pub amount_kg: f64,
    pub explanation: String,
}

impl FertilizationDecision {
    pub fn recommended(
        fertilizer_type: impl Into<String>,
        amount_kg: f64,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            needed: true,
            fertilizer_type: Some(fertilizer_type.into()),
            amount_kg,
            explanation: explanation.into(),
        }
    }

    pub fn not_needed(explanation: impl Into<String>) -> Self {
        Self {
            needed: false,
            fertilizer_type: None,
            amount_kg: 0.0,
            explanation: explanation.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    DroughtRisk,
    OverwateringRisk,
    HeatStress,
    ColdStress,
    LowHumidity,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::DroughtRisk => "Drought Risk",
            AlertKind::OverwateringRisk => "Overwatering Risk",
            AlertKind::HeatStress => "Heat Stress",
            AlertKind::ColdStress => "Cold Stress",
            AlertKind::LowHumidity => "Low Humidity",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub sensor_id: String,
    pub generated_at: DateTime<Utc>,
    pub trend: Trend,
    pub irrigation: IrrigationDecision,
    pub fertilization: FertilizationDecision,
    pub alerts: Vec<Alert>,
}

impl Recommendation {
    #[cfg(test)]
    pub fn has_alert(&self, kind: AlertKind) -> bool {
        self.alerts.iter().any(|a| a.kind == kind)
    }
}

/// A recommendation as read back from the audit table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecommendation {
    pub id: i64,
    pub sensor_id: String,
    pub recommendation: Recommendation,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watering_actions() {
        assert!(IrrigationAction::WaterImmediately.is_watering());
        assert!(IrrigationAction::Water.is_watering());
        assert!(!IrrigationAction::StopWatering.is_watering());
        assert!(!IrrigationAction::Monitor.is_watering());
    }

    #[test]
    fn watering_decision_never_has_zero_volume() {
        let d = IrrigationDecision::watering(
            "standard",
            IrrigationAction::Water,
            0,
            Priority::Medium,
            "x",
        );
        assert_eq!(d.volume_ml, 1);
    }

    #[test]
    fn hold_decision_is_low_priority_and_dry() {
        let d = IrrigationDecision::hold("standard", IrrigationAction::Monitor, "ok");
        assert_eq!(d.volume_ml, 0);
        assert_eq!(d.priority, Priority::Low);
        assert_eq!(d.volume_liters(), 0.0);
    }

    #[test]
    fn fertilization_type_present_iff_needed() {
        let yes = FertilizationDecision::recommended("balanced_NPK", 2.5, "x");
        assert!(yes.needed);
        assert_eq!(yes.fertilizer_type.as_deref(), Some("balanced_NPK"));

        let no = FertilizationDecision::not_needed("y");
        assert!(!no.needed);
        assert!(no.fertilizer_type.is_none());
        assert_eq!(no.amount_kg, 0.0);
    }

    #[test]
    fn serializes_snake_case_labels() {
        let d = IrrigationDecision::watering(
            "standard",
            IrrigationAction::WaterImmediately,
            5000,
            Priority::High,
            "now",
        );
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["action"], "water_immediately");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["volume_ml"], 5000);

        let f = serde_json::to_value(FertilizationDecision::not_needed("n")).unwrap();
        assert!(f["type"].is_null());
    }
}
