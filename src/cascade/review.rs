use tracing::debug;

use crate::cascade::{Decision, StageId, StageVerdict};
use crate::model::PatientDescriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleVote {
    Danger(String),
    Normal(String),
    NotApplicable,
}

pub trait ClinicalRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, patient: &PatientDescriptor, glucose: f64, lactate: f64) -> RuleVote;
}

pub struct DiabeticHypoRule;

impl ClinicalRule for DiabeticHypoRule {
    fn name(&self) -> &'static str {
        "diabetic_hypo"
    }

    fn evaluate(&self, patient: &PatientDescriptor, glucose: f64, _lactate: f64) -> RuleVote {
        if patient.is_diabetic() && glucose < 90.0 {
            return RuleVote::Danger("diabetic patient with glucose < 90 mg/dL".to_string());
        }
        if glucose < 75.0 {
            return RuleVote::Danger("glucose < 75 mg/dL".to_string());
        }
        RuleVote::NotApplicable
    }
}

pub struct ElderlyHyperRule;

impl ClinicalRule for ElderlyHyperRule {
    fn name(&self) -> &'static str {
        "elderly_hyper"
    }

    fn evaluate(&self, patient: &PatientDescriptor, glucose: f64, _lactate: f64) -> RuleVote {
        if patient.age >= 60 && glucose > 280.0 {
            return RuleVote::Danger("senior (60+) with glucose > 280 mg/dL".to_string());
        }
        if glucose > 320.0 {
            return RuleVote::Danger("glucose > 320 mg/dL".to_string());
        }
        RuleVote::NotApplicable
    }
}

/// Moderately raised lactate in a young patient without conditions is
/// read as post-exercise. Never votes danger.
pub struct ExerciseLactateRule;

impl ClinicalRule for ExerciseLactateRule {
    fn name(&self) -> &'static str {
        "exercise_lactate"
    }

    fn evaluate(&self, patient: &PatientDescriptor, _glucose: f64, lactate: f64) -> RuleVote {
        let conditions = patient.conditions();
        let healthy = conditions.len() == 1 && conditions[0].is_none();
        if patient.age < 40 && healthy && lactate > 3.0 && lactate < 5.0 {
            return RuleVote::Normal("healthy young adult, may be post-exercise".to_string());
        }
        RuleVote::NotApplicable
    }
}

pub struct CombinedRiskRule;

impl ClinicalRule for CombinedRiskRule {
    fn name(&self) -> &'static str {
        "combined_risk"
    }

    fn evaluate(&self, patient: &PatientDescriptor, glucose: f64, lactate: f64) -> RuleVote {
        let factors = [
            glucose < 75.0 || glucose > 220.0,
            lactate > 3.5,
            patient.age > 55,
            patient.has_risk_conditions(),
        ]
        .iter()
        .filter(|&&f| f)
        .count();

        if factors >= 2 {
            return RuleVote::Danger(format!("multiple risk factors ({})", factors));
        }
        if lactate > 3.8 {
            return RuleVote::Danger(format!("elevated lactate ({:.2} mmol/L)", lactate));
        }
        RuleVote::NotApplicable
    }
}

pub struct ExpertReview {
    rules: Vec<Box<dyn ClinicalRule>>,
}

impl Default for ExpertReview {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpertReview {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(DiabeticHypoRule),
                Box::new(ElderlyHyperRule),
                Box::new(ExerciseLactateRule),
                Box::new(CombinedRiskRule),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: Box<dyn ClinicalRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn review(
        &self,
        patient: &PatientDescriptor,
        glucose: f64,
        lactate: f64,
        confirmation: &StageVerdict,
    ) -> StageVerdict {
        let mut danger = Vec::new();
        let mut normal = Vec::new();
        for rule in &self.rules {
            match rule.evaluate(patient, glucose, lactate) {
                RuleVote::Danger(msg) => danger.push(msg),
                RuleVote::Normal(msg) => normal.push(msg),
                RuleVote::NotApplicable => {}
            }
        }
        debug!(
            patient = %patient.id,
            confirmation = confirmation.decision.as_str(),
            danger_rules = danger.len(),
            normal_hints = normal.len(),
            "expert_review"
        );

        if !danger.is_empty() {
            return StageVerdict::new(
                patient,
                StageId::ExpertReview,
                Decision::Danger,
                0.98,
                0.02,
                danger,
                "Clinical intervention required",
            );
        }
        if !normal.is_empty() {
            return StageVerdict::new(
                patient,
                StageId::ExpertReview,
                Decision::Normal,
                0.90,
                0.10,
                normal,
                "Continue monitoring with caution",
            );
        }
        // Unresolved cases are never treated as safe.
        StageVerdict::new(
            patient,
            StageId::ExpertReview,
            Decision::Danger,
            0.75,
            0.25,
            vec!["borderline case, no rule applicable".to_string()],
            "Medical consultation recommended",
        )
    }
}
