use serde::Serialize;
use tracing::debug;

use crate::model::{GroundTruth, PatientDescriptor, PatientRecord};

pub mod confirm;
pub mod review;
pub mod screen;

pub use confirm::Confirmer;
pub use review::{ClinicalRule, ExpertReview, RuleVote};
pub use screen::Screener;

#[cfg(feature = "mt")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Screening,
    Confirmation,
    ExpertReview,
}

impl StageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Screening => "screening",
            Self::Confirmation => "confirmation",
            Self::ExpertReview => "expert_review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Danger,
    Normal,
    RetestRequired,
    ExpertReviewRequired,
    Pending,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Normal => "normal",
            Self::RetestRequired => "retest_required",
            Self::ExpertReviewRequired => "expert_review_required",
            Self::Pending => "pending",
        }
    }

    pub fn is_conclusive(&self) -> bool {
        match self {
            Self::Danger | Self::Normal => true,
            Self::RetestRequired | Self::ExpertReviewRequired | Self::Pending => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageVerdict {
    pub patient_id: String,
    pub stage: StageId,
    pub decision: Decision,
    pub confidence: f64,
    pub uncertainty: f64,
    pub reasons: Vec<String>,
    pub recommended_action: String,
}

impl StageVerdict {
    pub(crate) fn new(
        patient: &PatientDescriptor,
        stage: StageId,
        decision: Decision,
        confidence: f64,
        uncertainty: f64,
        reasons: Vec<String>,
        recommended_action: &str,
    ) -> Self {
        Self {
            patient_id: patient.id.clone(),
            stage,
            decision,
            confidence,
            uncertainty,
            reasons,
            recommended_action: recommended_action.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeOutcome {
    pub patient_id: String,
    pub screening: StageVerdict,
    pub confirmation: Option<StageVerdict>,
    pub review: Option<StageVerdict>,
    pub final_decision: Decision,
    pub final_confidence: f64,
    pub is_true_danger: bool,
    pub predicted_danger: bool,
    pub stages_executed: u8,
}

impl CascadeOutcome {
    pub fn last_verdict(&self) -> &StageVerdict {
        self.review
            .as_ref()
            .or(self.confirmation.as_ref())
            .unwrap_or(&self.screening)
    }
}

pub struct Cascade {
    screener: Screener,
    confirmer: Confirmer,
    review: ExpertReview,
}

impl Default for Cascade {
    fn default() -> Self {
        Self::new()
    }
}

impl Cascade {
    pub fn new() -> Self {
        Self {
            screener: Screener::new(),
            confirmer: Confirmer::new(),
            review: ExpertReview::new(),
        }
    }

    pub fn with_review(mut self, review: ExpertReview) -> Self {
        self.review = review;
        self
    }

    /// `truth` is used only to label the outcome; no stage sees it.
    pub fn validate(
        &self,
        patient: &PatientDescriptor,
        truth: &GroundTruth,
        glucose: f64,
        lactate: f64,
        unc_glucose: f64,
        unc_lactate: f64,
    ) -> CascadeOutcome {
        let screening = self
            .screener
            .screen(patient, glucose, lactate, unc_glucose, unc_lactate);

        let mut confirmation = None;
        let mut review = None;
        let mut stages_executed = 1u8;

        let (final_decision, final_confidence) = if screening.decision.is_conclusive() {
            (screening.decision, screening.confidence)
        } else {
            stages_executed = 2;
            let s2 = self
                .confirmer
                .confirm(patient, glucose, lactate, unc_glucose, unc_lactate);
            if s2.decision.is_conclusive() {
                let out = (s2.decision, s2.confidence);
                confirmation = Some(s2);
                out
            } else {
                stages_executed = 3;
                let s3 = self.review.review(patient, glucose, lactate, &s2);
                let out = (s3.decision, s3.confidence);
                confirmation = Some(s2);
                review = Some(s3);
                out
            }
        };

        debug!(
            patient = %patient.id,
            decision = final_decision.as_str(),
            stages = stages_executed,
            "cascade_verdict"
        );

        CascadeOutcome {
            patient_id: patient.id.clone(),
            screening,
            confirmation,
            review,
            final_decision,
            final_confidence,
            is_true_danger: truth.is_danger(),
            predicted_danger: final_decision == Decision::Danger,
            stages_executed,
        }
    }

    pub fn validate_record(&self, record: &PatientRecord) -> CascadeOutcome {
        let r = &record.reading;
        self.validate(
            &record.patient,
            &record.truth,
            r.glucose,
            r.lactate,
            r.unc_glucose,
            r.unc_lactate,
        )
    }

    pub fn validate_batch(&self, records: &[PatientRecord]) -> Vec<CascadeOutcome> {
        #[cfg(feature = "mt")]
        {
            records
                .par_iter()
                .map(|r| self.validate_record(r))
                .collect()
        }

        #[cfg(not(feature = "mt"))]
        {
            records.iter().map(|r| self.validate_record(r)).collect()
        }
    }
}
