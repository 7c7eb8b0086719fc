use serde::Serialize;

use crate::cascade::{CascadeOutcome, Decision};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub tp: u64,
    pub fp: u64,
    pub tn: u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
}

impl ConfusionMatrix {
    pub fn record(&mut self, actual: bool, predicted: bool) {
        match (actual, predicted) {
            (true, true) => self.tp += 1,
            (true, false) => self.fn_ += 1,
            (false, true) => self.fp += 1,
            (false, false) => self.tn += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.tp + self.fp + self.tn + self.fn_
    }

    pub fn sensitivity(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.tn, self.tn + self.fp)
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn false_alarm_rate(&self) -> f64 {
        ratio(self.fp, self.tn + self.fp)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.sensitivity();
        2.0 * p * r / (p + r).max(0.001)
    }
}

pub fn ratio(num: u64, denom: u64) -> f64 {
    num as f64 / denom.max(1) as f64
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CascadeStats {
    pub total: u64,
    pub screening_danger: u64,
    pub screening_normal: u64,
    pub screening_retest: u64,
    pub confirmation_processed: u64,
    pub confirmation_danger: u64,
    pub confirmation_normal: u64,
    pub confirmation_expert: u64,
    pub review_processed: u64,
    pub confusion: ConfusionMatrix,
}

impl CascadeStats {
    pub fn from_outcomes(outcomes: &[CascadeOutcome]) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            stats.total += 1;
            match outcome.screening.decision {
                Decision::Danger => stats.screening_danger += 1,
                Decision::Normal => stats.screening_normal += 1,
                Decision::RetestRequired | Decision::ExpertReviewRequired | Decision::Pending => {
                    stats.screening_retest += 1
                }
            }
            if let Some(s2) = &outcome.confirmation {
                stats.confirmation_processed += 1;
                match s2.decision {
                    Decision::Danger => stats.confirmation_danger += 1,
                    Decision::Normal => stats.confirmation_normal += 1,
                    Decision::RetestRequired
                    | Decision::ExpertReviewRequired
                    | Decision::Pending => stats.confirmation_expert += 1,
                }
            }
            if outcome.review.is_some() {
                stats.review_processed += 1;
            }
            stats
                .confusion
                .record(outcome.is_true_danger, outcome.predicted_danger);
        }
        stats
    }

    pub fn retest_rate(&self) -> f64 {
        ratio(self.screening_retest, self.total)
    }

    pub fn expert_review_rate(&self) -> f64 {
        ratio(self.review_processed, self.total)
    }

    pub fn screening_resolution_rate(&self) -> f64 {
        ratio(self.screening_danger + self.screening_normal, self.total)
    }

    pub fn confirmation_resolution_rate(&self) -> f64 {
        ratio(
            self.confirmation_danger + self.confirmation_normal,
            self.confirmation_processed,
        )
    }
}
