pub mod calculations;
pub mod rules;
pub mod thresholds;
pub mod trend;

pub use rules::DecisionEngine;
