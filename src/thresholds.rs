use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfiguration {
    pub glucose_critical_low: f64,
    pub glucose_low: f64,
    pub glucose_critical_high: f64,
    pub glucose_diabetes_fasting: f64,
    pub glucose_diabetes_postprandial: f64,
    pub lactate_critical: f64,
    pub lactate_elevated: f64,
}

pub const FIELD_NAMES: [&str; 7] = [
    "glucose_critical_low",
    "glucose_low",
    "glucose_critical_high",
    "glucose_diabetes_fasting",
    "glucose_diabetes_postprandial",
    "lactate_critical",
    "lactate_elevated",
];

impl Default for ThresholdConfiguration {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ThresholdConfiguration {
    pub fn baseline() -> Self {
        Self {
            glucose_critical_low: 50.0,
            glucose_low: 70.0,
            glucose_critical_high: 400.0,
            glucose_diabetes_fasting: 126.0,
            glucose_diabetes_postprandial: 200.0,
            lactate_critical: 8.0,
            lactate_elevated: 4.0,
        }
    }

    pub fn optimized_v1() -> Self {
        Self {
            glucose_critical_low: 45.0,
            glucose_low: 65.0,
            glucose_critical_high: 350.0,
            glucose_diabetes_fasting: 160.0,
            glucose_diabetes_postprandial: 250.0,
            lactate_critical: 6.0,
            lactate_elevated: 3.0,
        }
    }

    pub fn from_values(v: [f64; 7]) -> Self {
        Self {
            glucose_critical_low: v[0],
            glucose_low: v[1],
            glucose_critical_high: v[2],
            glucose_diabetes_fasting: v[3],
            glucose_diabetes_postprandial: v[4],
            lactate_critical: v[5],
            lactate_elevated: v[6],
        }
    }

    pub fn values(&self) -> [f64; 7] {
        [
            self.glucose_critical_low,
            self.glucose_low,
            self.glucose_critical_high,
            self.glucose_diabetes_fasting,
            self.glucose_diabetes_postprandial,
            self.lactate_critical,
            self.lactate_elevated,
        ]
    }

    pub fn changes_from(&self, other: &ThresholdConfiguration) -> Vec<String> {
        self.values()
            .iter()
            .zip(other.values().iter())
            .zip(FIELD_NAMES.iter())
            .filter(|((a, b), _)| a != b)
            .map(|((a, _), name)| format!("{}={}", name, a))
            .collect()
    }

    pub fn field_index(name: &str) -> Option<usize> {
        FIELD_NAMES.iter().position(|f| *f == name)
    }
}
