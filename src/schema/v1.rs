use serde::{Deserialize, Serialize};

use crate::thresholds::ThresholdConfiguration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub records: Option<u64>,
    pub fasting: Option<u64>,
    pub with_conditions: Option<u64>,
    pub true_danger: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confusion {
    pub tp: u64,
    pub fp: u64,
    pub tn: u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rates {
    pub sensitivity: f64,
    pub specificity: f64,
    pub precision: f64,
    pub false_alarm_rate: f64,
    pub accuracy: f64,
    pub f1_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageCounts {
    pub processed: u64,
    pub danger: u64,
    pub normal: u64,
    pub forwarded: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeRow {
    pub patient_id: String,
    pub final_decision: String,
    pub final_confidence: f64,
    pub stages_executed: u8,
    pub predicted_danger: bool,
    pub true_danger: bool,
    pub reasons: Vec<String>,
    pub recommended_action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeSection {
    pub screening: StageCounts,
    pub confirmation: StageCounts,
    pub review_processed: u64,
    pub confusion: Confusion,
    pub rates: Rates,
    pub retest_rate: f64,
    pub expert_review_rate: f64,
    pub per_patient_tsv_path: Option<String>,
    pub per_patient: Vec<OutcomeRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEntry {
    pub rank: Option<u64>,
    pub config: ThresholdConfiguration,
    pub rates: Rates,
    pub emergency_count: u64,
    pub changes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: String,
    pub baseline: f64,
    pub best: f64,
    pub improvement: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSection {
    pub min_sensitivity: f64,
    pub grid_size: u64,
    pub survivors: u64,
    pub baseline: SearchEntry,
    pub reference: SearchEntry,
    pub top: Vec<SearchEntry>,
    pub deltas: Vec<MetricDelta>,
    pub recommended: Option<ThresholdConfiguration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioTriageV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub cascade: Option<CascadeSection>,
    pub search: Option<SearchSection>,
}

impl BioTriageV1 {
    pub fn empty(tool_version: &str) -> Self {
        Self {
            tool: "kira-biotriage".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            input_meta: InputMeta {
                records: None,
                fasting: None,
                with_conditions: None,
                true_danger: None,
            },
            cascade: None,
            search: None,
        }
    }
}
