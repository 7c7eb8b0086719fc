use std::ops::Range;

use crate::cascade::{Decision, StageId, StageVerdict};
use crate::model::{Condition, PatientDescriptor};

const BASE_HYPO_GLUCOSE: f64 = 65.0;
const BASE_HYPER_GLUCOSE: f64 = 350.0;
const BASE_LACTATE: f64 = 3.0;

const SCORE_HYPO_GLUCOSE: f64 = 70.0;
const SCORE_HYPER_GLUCOSE: f64 = 300.0;
const SCORE_LACTATE: f64 = 2.5;
const SCORE_DANGER: f64 = 1.5;

/// mg/dL added to the hypo bound (and removed from the hyper bound) at 100 %
/// glucose uncertainty.
const UNCERTAINTY_GLUCOSE_SPAN: f64 = 20.0;

pub const HIGH_RISK_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeMargin {
    pub glucose: f64,
    pub lactate: f64,
}

impl AgeMargin {
    pub const NEUTRAL: AgeMargin = AgeMargin {
        glucose: 0.0,
        lactate: 0.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedBounds {
    pub hypo: f64,
    pub hyper: f64,
    pub lactate: f64,
}

impl AdjustedBounds {
    fn from_margin(margin: AgeMargin) -> Self {
        Self {
            hypo: BASE_HYPO_GLUCOSE + margin.glucose,
            hyper: BASE_HYPER_GLUCOSE - margin.glucose * 2.0,
            lactate: BASE_LACTATE + margin.lactate,
        }
    }

    fn exceeded(&self, glucose: f64, lactate: f64) -> bool {
        glucose < self.hypo || glucose > self.hyper || lactate > self.lactate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnsembleVotes {
    pub absolute: bool,
    pub risk_score: bool,
    pub uncertainty: bool,
}

impl EnsembleVotes {
    pub fn danger_count(&self) -> u8 {
        [self.absolute, self.risk_score, self.uncertainty]
            .iter()
            .filter(|&&v| v)
            .count() as u8
    }
}

#[derive(Debug, Clone)]
pub struct Confirmer {
    age_margins: Vec<(Range<u32>, AgeMargin)>,
}

impl Default for Confirmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirmer {
    pub fn new() -> Self {
        let margin = |glucose, lactate| AgeMargin { glucose, lactate };
        Self {
            age_margins: vec![
                (0..18, margin(10.0, 0.3)),
                (18..40, margin(5.0, 0.2)),
                (40..60, margin(0.0, 0.0)),
                (60..80, margin(-5.0, -0.2)),
                (80..120, margin(-10.0, -0.3)),
            ],
        }
    }

    pub fn age_margin(&self, age: u32) -> AgeMargin {
        self.age_margins
            .iter()
            .find(|(range, _)| range.contains(&age))
            .map(|(_, m)| *m)
            .unwrap_or(AgeMargin::NEUTRAL)
    }

    pub fn condition_weight(condition: &Condition) -> f64 {
        match condition {
            Condition::Type1Diabetes => 1.5,
            Condition::HeartDisease => 1.4,
            Condition::Type2Diabetes | Condition::KidneyDisease => 1.3,
            Condition::Prediabetes => 1.2,
            Condition::None
            | Condition::Hypertension
            | Condition::LiverDisease
            | Condition::Obesity
            | Condition::Hyperlipidemia
            | Condition::Other(_) => 1.0,
        }
    }

    pub fn risk_multiplier(patient: &PatientDescriptor) -> f64 {
        patient
            .conditions()
            .iter()
            .map(Self::condition_weight)
            .fold(1.0, f64::max)
    }

    pub fn adjusted_bounds(&self, patient: &PatientDescriptor) -> AdjustedBounds {
        AdjustedBounds::from_margin(self.age_margin(patient.age))
    }

    pub fn votes(
        &self,
        patient: &PatientDescriptor,
        glucose: f64,
        lactate: f64,
        unc_glucose: f64,
        unc_lactate: f64,
    ) -> EnsembleVotes {
        let bounds = self.adjusted_bounds(patient);
        let risk = Self::risk_multiplier(patient);

        let absolute = bounds.exceeded(glucose, lactate);

        let mut score = 0.0;
        if glucose < SCORE_HYPO_GLUCOSE {
            score += (SCORE_HYPO_GLUCOSE - glucose) / 10.0 * risk;
        }
        if glucose > SCORE_HYPER_GLUCOSE {
            score += (glucose - SCORE_HYPER_GLUCOSE) / 50.0 * risk;
        }
        if lactate > SCORE_LACTATE {
            score += (lactate - SCORE_LACTATE) / 2.0 * risk;
        }
        let risk_score = score > SCORE_DANGER;

        let margin = unc_glucose / 100.0 * UNCERTAINTY_GLUCOSE_SPAN;
        let compensated = AdjustedBounds {
            hypo: bounds.hypo + margin,
            hyper: bounds.hyper - margin,
            lactate: bounds.lactate - unc_lactate / 100.0,
        };
        let uncertainty = compensated.exceeded(glucose, lactate);

        EnsembleVotes {
            absolute,
            risk_score,
            uncertainty,
        }
    }

    pub fn confirm(
        &self,
        patient: &PatientDescriptor,
        glucose: f64,
        lactate: f64,
        unc_glucose: f64,
        unc_lactate: f64,
    ) -> StageVerdict {
        let risk = Self::risk_multiplier(patient);
        let votes = self
            .votes(patient, glucose, lactate, unc_glucose, unc_lactate)
            .danger_count();
        let risk_reason = format!("risk multiplier: {:.2}", risk);

        // votes == 2 with a low multiplier deliberately lands with votes == 1.
        let (decision, confidence, uncertainty, reasons, action) = match votes {
            3 => (
                Decision::Danger,
                0.98,
                0.02,
                vec![format!("ensemble unanimous ({}/3 danger)", votes), risk_reason],
                "Immediate medical attention",
            ),
            2 if risk >= HIGH_RISK_MULTIPLIER => (
                Decision::Danger,
                0.95,
                0.05,
                vec![
                    format!("ensemble majority with high risk ({}/3 danger)", votes),
                    risk_reason,
                ],
                "Immediate medical attention",
            ),
            0 => (
                Decision::Normal,
                0.92,
                0.08,
                vec![
                    "ensemble consensus (0/3 danger)".to_string(),
                    "patient-specific thresholds applied".to_string(),
                ],
                "Continue monitoring",
            ),
            _ => (
                Decision::ExpertReviewRequired,
                0.6,
                0.4,
                vec![format!("ensemble split ({}/3 danger)", votes), risk_reason],
                "Expert review required",
            ),
        };

        StageVerdict::new(
            patient,
            StageId::Confirmation,
            decision,
            confidence,
            uncertainty,
            reasons,
            action,
        )
    }
}
