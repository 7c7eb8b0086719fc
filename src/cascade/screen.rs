use crate::cascade::{Decision, StageId, StageVerdict};
use crate::model::PatientDescriptor;

// Danger and normal bounds leave a gap on purpose; readings in the gap
// are forwarded to confirmation.
pub const CRITICAL_HYPO_GLUCOSE: f64 = 55.0;
pub const CLEAR_HYPO_GLUCOSE: f64 = 60.0;
pub const CRITICAL_HYPER_GLUCOSE: f64 = 380.0;
pub const CRITICAL_LACTATE: f64 = 7.0;

pub const NORMAL_GLUCOSE_LOW: f64 = 85.0;
pub const NORMAL_GLUCOSE_HIGH_FASTING: f64 = 115.0;
pub const NORMAL_GLUCOSE_HIGH_POSTPRANDIAL: f64 = 160.0;
pub const NORMAL_LACTATE_HIGH: f64 = 2.0;

pub const LOW_UNCERTAINTY_PCT: f64 = 8.0;
pub const HIGH_UNCERTAINTY_PCT: f64 = 10.0;

#[derive(Debug, Clone, Default)]
pub struct Screener;

impl Screener {
    pub fn new() -> Self {
        Self
    }

    pub fn normal_glucose_high(fasting: bool) -> f64 {
        if fasting {
            NORMAL_GLUCOSE_HIGH_FASTING
        } else {
            NORMAL_GLUCOSE_HIGH_POSTPRANDIAL
        }
    }

    pub fn screen(
        &self,
        patient: &PatientDescriptor,
        glucose: f64,
        lactate: f64,
        unc_glucose: f64,
        unc_lactate: f64,
    ) -> StageVerdict {
        if let Some(verdict) = clear_danger(patient, glucose, lactate) {
            return verdict;
        }

        let glucose_normal = (NORMAL_GLUCOSE_LOW..=Self::normal_glucose_high(patient.fasting))
            .contains(&glucose);
        let lactate_normal = lactate <= NORMAL_LACTATE_HIGH;

        if glucose_normal
            && lactate_normal
            && unc_glucose < LOW_UNCERTAINTY_PCT
            && unc_lactate < LOW_UNCERTAINTY_PCT
            && !patient.has_risk_conditions()
        {
            return StageVerdict::new(
                patient,
                StageId::Screening,
                Decision::Normal,
                0.95,
                0.05,
                vec!["clear normal range with low uncertainty, no risk factors".to_string()],
                "Continue regular monitoring",
            );
        }

        let mut reasons = Vec::new();
        if !glucose_normal {
            reasons.push(format!("glucose {:.1} near threshold", glucose));
        }
        if !lactate_normal {
            reasons.push(format!("lactate {:.2} near threshold", lactate));
        }
        if unc_glucose >= HIGH_UNCERTAINTY_PCT {
            reasons.push(format!("high glucose uncertainty ({:.1}%)", unc_glucose));
        }
        if unc_lactate >= HIGH_UNCERTAINTY_PCT {
            reasons.push(format!("high lactate uncertainty ({:.1}%)", unc_lactate));
        }
        if reasons.is_empty() {
            reasons.push("borderline case".to_string());
        }

        StageVerdict::new(
            patient,
            StageId::Screening,
            Decision::RetestRequired,
            0.6,
            0.4,
            reasons,
            "Proceed to confirmation",
        )
    }
}

fn clear_danger(patient: &PatientDescriptor, glucose: f64, lactate: f64) -> Option<StageVerdict> {
    let (confidence, uncertainty, reason, action) = if glucose < CRITICAL_HYPO_GLUCOSE {
        (
            0.99,
            0.01,
            "critical hypoglycemia",
            "EMERGENCY: administer glucose immediately",
        )
    } else if glucose < CLEAR_HYPO_GLUCOSE {
        (
            0.99,
            0.01,
            "clear hypoglycemia",
            "EMERGENCY: administer glucose immediately",
        )
    } else if glucose > CRITICAL_HYPER_GLUCOSE {
        (
            0.99,
            0.01,
            "critical hyperglycemia",
            "EMERGENCY: medical attention required",
        )
    } else if lactate > CRITICAL_LACTATE {
        (
            0.98,
            0.02,
            "critical lactate",
            "EMERGENCY: check for lactic acidosis",
        )
    } else {
        return None;
    };

    Some(StageVerdict::new(
        patient,
        StageId::Screening,
        Decision::Danger,
        confidence,
        uncertainty,
        vec![reason.to_string()],
        action,
    ))
}
