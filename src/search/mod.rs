use std::cmp::Ordering;

use serde::Serialize;
use tracing::info;

use crate::metrics::ConfusionMatrix;
use crate::model::{PatientDescriptor, PatientRecord};
use crate::thresholds::ThresholdConfiguration;

pub mod grid;

pub use grid::SearchGrid;

#[cfg(feature = "mt")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRecord {
    pub patient: PatientDescriptor,
    pub glucose: f64,
    pub lactate: f64,
    pub is_true_danger: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LabeledRecord>,
}

impl Dataset {
    pub fn new(records: Vec<LabeledRecord>) -> Self {
        Self { records }
    }

    pub fn from_patient_records(records: &[PatientRecord]) -> Self {
        Self::new(
            records
                .iter()
                .map(|r| LabeledRecord {
                    patient: r.patient.clone(),
                    glucose: r.reading.glucose,
                    lactate: r.reading.lactate,
                    is_true_danger: r.truth.is_danger(),
                })
                .collect(),
        )
    }

    pub fn records(&self) -> &[LabeledRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn danger_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_true_danger).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub config: ThresholdConfiguration,
    pub sensitivity: f64,
    pub specificity: f64,
    pub precision: f64,
    pub false_alarm_rate: f64,
    pub accuracy: f64,
    pub f1_score: f64,
    pub emergency_count: u64,
    pub confusion: ConfusionMatrix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFlags {
    pub emergency: bool,
    pub warning: bool,
}

impl RecordFlags {
    pub fn predicted_danger(&self) -> bool {
        self.emergency || self.warning
    }
}

pub fn classify(config: &ThresholdConfiguration, record: &LabeledRecord) -> RecordFlags {
    let g = record.glucose;
    let l = record.lactate;

    let mut emergency =
        g < config.glucose_critical_low || g < config.glucose_low || g > config.glucose_critical_high;
    let mut warning = if record.patient.fasting {
        g >= config.glucose_diabetes_fasting
    } else {
        g >= config.glucose_diabetes_postprandial
    };
    if l > config.lactate_critical {
        emergency = true;
    } else if l > config.lactate_elevated {
        warning = true;
    }

    RecordFlags { emergency, warning }
}

pub fn evaluate(config: &ThresholdConfiguration, dataset: &Dataset) -> SearchResult {
    let mut confusion = ConfusionMatrix::default();
    let mut emergency_count = 0u64;
    for record in dataset.records() {
        let flags = classify(config, record);
        if flags.emergency {
            emergency_count += 1;
        }
        confusion.record(record.is_true_danger, flags.predicted_danger());
    }

    SearchResult {
        config: *config,
        sensitivity: confusion.sensitivity(),
        specificity: confusion.specificity(),
        precision: confusion.precision(),
        false_alarm_rate: confusion.false_alarm_rate(),
        accuracy: confusion.accuracy(),
        f1_score: confusion.f1(),
        emergency_count,
        confusion,
    }
}

/// Precision desc, false-alarm rate asc, sensitivity desc, then the seven
/// configuration values ascending.
pub fn rank_order(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.precision
        .total_cmp(&a.precision)
        .then_with(|| a.false_alarm_rate.total_cmp(&b.false_alarm_rate))
        .then_with(|| b.sensitivity.total_cmp(&a.sensitivity))
        .then_with(|| {
            let av = a.config.values();
            let bv = b.config.values();
            av.iter()
                .zip(bv.iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
}

pub struct ThresholdSearch {
    dataset: Dataset,
    threads: usize,
}

impl ThresholdSearch {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset, threads: 0 }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn evaluate(&self, config: &ThresholdConfiguration) -> SearchResult {
        evaluate(config, &self.dataset)
    }

    pub fn search(&self, grid: &SearchGrid, min_sensitivity: f64) -> Vec<SearchResult> {
        let total = grid.len();
        if total == 0 || self.dataset.is_empty() {
            info!(
                grid = total,
                records = self.dataset.len(),
                "search_skipped_empty_input"
            );
            return Vec::new();
        }

        let mut survivors = self.sweep(grid, min_sensitivity);
        survivors.sort_by(rank_order);
        info!(
            grid = total,
            survivors = survivors.len(),
            min_sensitivity,
            "search_ready"
        );
        survivors
    }

    fn sweep(&self, grid: &SearchGrid, min_sensitivity: f64) -> Vec<SearchResult> {
        crate::pool::install(self.threads, || {
            #[cfg(feature = "mt")]
            let indices = (0..grid.len()).into_par_iter();
            #[cfg(not(feature = "mt"))]
            let indices = 0..grid.len();

            indices
                .filter_map(|i| grid.configuration(i))
                .map(|cfg| self.evaluate(&cfg))
                .filter(|r| r.sensitivity >= min_sensitivity)
                .collect()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDelta {
    pub metric: &'static str,
    pub baseline: f64,
    pub best: f64,
    pub improvement: f64,
}

pub fn compare_with_baseline(baseline: &SearchResult, best: &SearchResult) -> Vec<MetricDelta> {
    let up = |metric, base: f64, new: f64| MetricDelta {
        metric,
        baseline: base,
        best: new,
        improvement: (new - base) / base.max(0.0001),
    };
    vec![
        up("sensitivity", baseline.sensitivity, best.sensitivity),
        up("precision", baseline.precision, best.precision),
        up("specificity", baseline.specificity, best.specificity),
        up("f1_score", baseline.f1_score, best.f1_score),
        MetricDelta {
            metric: "false_alarm_rate",
            baseline: baseline.false_alarm_rate,
            best: best.false_alarm_rate,
            improvement: (baseline.false_alarm_rate - best.false_alarm_rate)
                / baseline.false_alarm_rate.max(0.0001),
        },
        up("accuracy", baseline.accuracy, best.accuracy),
    ]
}
